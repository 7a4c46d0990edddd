use log::debug;
use rustc_hash::FxHashSet;

use crate::slots::{PreFilledMap, Slot, SlotId};
use crate::words::WordIndex;

/// True when `word` matches every pre-filled letter under `slot`.
pub(crate) fn matches_prefilled(slot: &Slot, word: &str, prefilled: &PreFilledMap) -> bool {
    slot.positions
        .iter()
        .enumerate()
        .all(|(i, pos)| match prefilled.get(pos) {
            Some(&letter) => word.as_bytes()[i] as char == letter,
            None => true,
        })
}

/// Per-slot candidate sets.
///
/// Domains shrink monotonically under arc consistency and transiently during
/// search; [`prune`](DomainStore::prune) hands back the removed words so the
/// search can restore them exactly on backtrack. An empty domain is a valid
/// state meaning "unsolvable as laid out", never an error.
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: Vec<FxHashSet<String>>,
}

impl DomainStore {
    /// Filters the word index down to candidates of the right length that
    /// agree with every pre-filled letter in the slot.
    pub fn build(slots: &[Slot], prefilled: &PreFilledMap, index: &WordIndex) -> DomainStore {
        let domains = slots
            .iter()
            .map(|slot| {
                let domain: FxHashSet<String> = index
                    .of_length(slot.len())
                    .iter()
                    .filter(|word| matches_prefilled(slot, word, prefilled))
                    .cloned()
                    .collect();
                debug!("{}: {} candidates", slot, domain.len());
                domain
            })
            .collect();
        DomainStore { domains }
    }

    pub fn domain(&self, slot: SlotId) -> &FxHashSet<String> {
        &self.domains[slot]
    }

    pub fn size(&self, slot: SlotId) -> usize {
        self.domains[slot].len()
    }

    /// Domain sizes indexed by slot, for diagnostics.
    pub fn sizes(&self) -> Vec<usize> {
        self.domains.iter().map(|domain| domain.len()).collect()
    }

    /// Slots whose domains are already empty.
    pub fn empty_slots(&self) -> Vec<SlotId> {
        self.domains
            .iter()
            .enumerate()
            .filter(|(_, domain)| domain.is_empty())
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Removes every word failing `keep` and returns the removed words.
    pub(crate) fn prune<F>(&mut self, slot: SlotId, keep: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let domain = &mut self.domains[slot];
        let removed: Vec<String> = domain
            .iter()
            .filter(|word| !keep(word))
            .cloned()
            .collect();
        for word in &removed {
            domain.remove(word);
        }
        removed
    }

    /// Puts words removed by [`prune`](DomainStore::prune) back.
    pub(crate) fn restore(&mut self, slot: SlotId, words: Vec<String>) {
        self.domains[slot].extend(words);
    }
}
