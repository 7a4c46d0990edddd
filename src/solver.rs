use std::cmp::Reverse;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cached::{Cached, SizedCache};
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHasher};

use crate::ac3::{ac3, Ac3Outcome};
use crate::constraints::{overlap_agrees, ConstraintGraph};
use crate::domains::{matches_prefilled, DomainStore};
use crate::grid::{Cell, Grid};
use crate::slots::{extract_slots, PreFilledMap, Slot, SlotId};
use crate::words::WordIndex;

/// Cloneable handle for aborting a solve in progress. Checked at every arc
/// revision and every recursive search step; tripping it mid-solve never
/// publishes a partial solution.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A complete, consistent assignment of words to slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    words: FxHashMap<SlotId, String>,
}

impl Solution {
    pub fn word(&self, slot: SlotId) -> Option<&str> {
        self.words.get(&slot).map(|word| word.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &str)> {
        self.words.iter().map(|(&slot, word)| (slot, word.as_str()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Writes the solution back onto the grid. Only `Empty` and `Number`
    /// cells are overwritten; pre-filled letters stay as they are.
    pub fn apply(&self, grid: &mut Grid, slots: &[Slot]) {
        for (slot_id, word) in &self.words {
            for (i, pos) in slots[*slot_id].positions.iter().enumerate() {
                match grid.cell(pos.row, pos.col) {
                    Cell::Letter(_) => {}
                    _ => grid.set(pos.row, pos.col, Cell::Letter(word.as_bytes()[i] as char)),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsolvableReason {
    /// Slots with zero candidates straight after domain construction: no
    /// word of the right length and pattern exists at all.
    EmptyDomains(Vec<SlotId>),
    /// Arc consistency wiped out the named slot's domain.
    ArcInconsistent(SlotId),
    /// Backtracking explored every branch without success.
    SearchExhausted,
}

impl fmt::Display for UnsolvableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsolvableReason::EmptyDomains(slots) => {
                write!(f, "{} slot(s) have no candidate words", slots.len())
            }
            UnsolvableReason::ArcInconsistent(slot) => {
                write!(f, "arc consistency ruled out every word for slot {}", slot)
            }
            UnsolvableReason::SearchExhausted => write!(f, "search exhausted all branches"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(Solution),
    /// The grid yields no slots at all; distinct from a vacuous success.
    NothingToSolve,
    Unsolvable(UnsolvableReason),
    Cancelled,
}

/// Diagnostics collected across a solve, for progress displays and tuning.
#[derive(Debug, Clone, Default)]
pub struct SolveReport {
    pub slot_count: usize,
    /// Domain size per slot right after construction.
    pub initial_domain_sizes: Vec<usize>,
    /// Domain size per slot after the arc-consistency pass.
    pub ac3_domain_sizes: Vec<usize>,
    pub ac3_time: Duration,
    pub search_time: Duration,
    pub recursive_calls: u64,
}

enum Search {
    Solved,
    Exhausted,
    Cancelled,
}

type Assignment = FxHashMap<SlotId, String>;

/// Backtracking CSP solver over one grid snapshot.
///
/// Variable order is minimum remaining values, tie-broken by highest
/// constraint degree and then by creation order; value order is least
/// constraining value by conflict count, tie-broken lexicographically. Both
/// orders are fully deterministic, so a given grid and word list always
/// produce the same outcome.
pub struct Solver {
    slots: Vec<Slot>,
    prefilled: PreFilledMap,
    graph: ConstraintGraph,
    domains: DomainStore,
    cancel: CancelToken,
    report: SolveReport,
    recursive_calls: u64,
    // Signatures of partial assignments already proven dead. Domains at a
    // search node are a pure function of the assignment set, so a repeated
    // signature can be rejected without re-searching.
    failed_states: SizedCache<u64, ()>,
}

impl Solver {
    /// Extracts slots, builds the constraint graph and the initial domains.
    pub fn prepare(grid: &Grid, index: &WordIndex) -> Solver {
        let (slots, prefilled) = extract_slots(grid);
        let graph = ConstraintGraph::build(&slots);
        let domains = DomainStore::build(&slots, &prefilled, index);
        info!(
            "prepared {} slots with {} constraint arcs",
            slots.len(),
            graph.arc_count()
        );

        Solver {
            slots,
            prefilled,
            graph,
            domains,
            cancel: CancelToken::new(),
            report: SolveReport::default(),
            recursive_calls: 0,
            failed_states: SizedCache::with_size(10_000),
        }
    }

    /// Handle for cancelling this solve from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn report(&self) -> &SolveReport {
        &self.report
    }

    /// Runs the full pipeline: structural checks, arc consistency, then
    /// backtracking search.
    pub fn solve(&mut self) -> SolveOutcome {
        if self.cancel.is_cancelled() {
            return SolveOutcome::Cancelled;
        }
        if self.slots.is_empty() {
            info!("grid has no slots; nothing to solve");
            return SolveOutcome::NothingToSolve;
        }

        self.report.slot_count = self.slots.len();
        self.report.initial_domain_sizes = self.domains.sizes();

        let empty = self.domains.empty_slots();
        if !empty.is_empty() {
            for &slot in &empty {
                debug!("no candidate words for {}", self.slots[slot]);
            }
            return SolveOutcome::Unsolvable(UnsolvableReason::EmptyDomains(empty));
        }

        let ac3_start = Instant::now();
        let outcome = ac3(
            &mut self.domains,
            &self.graph,
            &self.slots,
            &self.prefilled,
            &self.cancel,
        );
        self.report.ac3_time = ac3_start.elapsed();
        self.report.ac3_domain_sizes = self.domains.sizes();
        info!("arc consistency finished in {:?}", self.report.ac3_time);

        match outcome {
            Ac3Outcome::Cancelled => return SolveOutcome::Cancelled,
            Ac3Outcome::Inconsistent(slot) => {
                return SolveOutcome::Unsolvable(UnsolvableReason::ArcInconsistent(slot))
            }
            Ac3Outcome::Consistent => {}
        }

        let search_start = Instant::now();
        let mut assignment = Assignment::default();
        let result = self.backtrack(&mut assignment);
        self.report.search_time = search_start.elapsed();
        self.report.recursive_calls = self.recursive_calls;

        match result {
            Search::Solved => {
                info!(
                    "solved in {:?} with {} recursive calls",
                    self.report.search_time, self.report.recursive_calls
                );
                SolveOutcome::Solved(Solution { words: assignment })
            }
            Search::Exhausted => {
                info!(
                    "search exhausted after {} recursive calls",
                    self.report.recursive_calls
                );
                SolveOutcome::Unsolvable(UnsolvableReason::SearchExhausted)
            }
            Search::Cancelled => SolveOutcome::Cancelled,
        }
    }

    fn backtrack(&mut self, assignment: &mut Assignment) -> Search {
        if assignment.len() == self.slots.len() {
            return Search::Solved;
        }
        if self.cancel.is_cancelled() {
            return Search::Cancelled;
        }

        let signature = state_signature(assignment);
        if self.failed_states.cache_get(&signature).is_some() {
            return Search::Exhausted;
        }

        let slot = self.select_slot(assignment);
        debug!(
            "trying {} ({} candidates, depth {})",
            self.slots[slot],
            self.domains.size(slot),
            assignment.len()
        );

        for word in self.order_candidates(slot, assignment) {
            if !self.is_consistent(slot, &word, assignment) {
                continue;
            }

            let journal = match self.forward_check(slot, &word, assignment) {
                Some(journal) => journal,
                // Some neighbor's domain would be wiped out; this branch is
                // dead before recursing.
                None => continue,
            };

            self.recursive_calls += 1;
            assignment.insert(slot, word);
            match self.backtrack(assignment) {
                Search::Solved => return Search::Solved,
                Search::Cancelled => return Search::Cancelled,
                Search::Exhausted => {}
            }
            assignment.remove(&slot);
            self.undo(journal);
        }

        self.failed_states.cache_set(signature, ());
        Search::Exhausted
    }

    /// Minimum remaining values, then highest degree, then creation order.
    fn select_slot(&self, assignment: &Assignment) -> SlotId {
        (0..self.slots.len())
            .filter(|slot| !assignment.contains_key(slot))
            .min_by_key(|&slot| {
                (
                    self.domains.size(slot),
                    Reverse(self.graph.degree(slot)),
                    slot,
                )
            })
            .expect("an unassigned slot exists below the completeness check")
    }

    /// Least constraining value: candidates sorted by how many words they
    /// would knock out of unassigned neighbors' domains, ties broken
    /// lexicographically.
    fn order_candidates(&self, slot: SlotId, assignment: &Assignment) -> Vec<String> {
        let mut scored: Vec<(usize, String)> = self
            .domains
            .domain(slot)
            .iter()
            .map(|word| (self.conflict_count(slot, word, assignment), word.clone()))
            .collect();
        scored.sort();
        scored.into_iter().map(|(_, word)| word).collect()
    }

    fn conflict_count(&self, slot: SlotId, word: &str, assignment: &Assignment) -> usize {
        self.graph
            .edges(slot)
            .filter(|(neighbor, _)| !assignment.contains_key(neighbor))
            .map(|(neighbor, overlaps)| {
                self.domains
                    .domain(neighbor)
                    .iter()
                    .filter(|other| !overlap_agrees(word, other, overlaps))
                    .count()
            })
            .sum()
    }

    /// Rejects a candidate that breaks a pre-filled letter, disagrees with an
    /// assigned neighbor, or leaves some unassigned neighbor with no
    /// compatible word at all.
    fn is_consistent(&self, slot: SlotId, word: &str, assignment: &Assignment) -> bool {
        if !matches_prefilled(&self.slots[slot], word, &self.prefilled) {
            return false;
        }
        for (neighbor, overlaps) in self.graph.edges(slot) {
            match assignment.get(&neighbor) {
                Some(assigned) => {
                    if !overlap_agrees(word, assigned, overlaps) {
                        return false;
                    }
                }
                None => {
                    let supported = self
                        .domains
                        .domain(neighbor)
                        .iter()
                        .any(|other| overlap_agrees(word, other, overlaps));
                    if !supported {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Prunes every unassigned neighbor's domain down to words compatible
    /// with `word`, journalling removals per neighbor. A wiped-out neighbor
    /// aborts the whole check and rolls back what was already pruned, so
    /// domains are untouched on `None`.
    fn forward_check(
        &mut self,
        slot: SlotId,
        word: &str,
        assignment: &Assignment,
    ) -> Option<Vec<(SlotId, Vec<String>)>> {
        let mut journal: Vec<(SlotId, Vec<String>)> = Vec::new();
        let mut wiped = false;

        for (neighbor, overlaps) in self.graph.edges(slot) {
            if assignment.contains_key(&neighbor) {
                continue;
            }
            let removed = self
                .domains
                .prune(neighbor, |other| overlap_agrees(word, other, overlaps));
            let emptied = self.domains.size(neighbor) == 0;
            journal.push((neighbor, removed));

            if emptied {
                wiped = true;
                break;
            }
        }

        if wiped {
            self.undo(journal);
            return None;
        }
        Some(journal)
    }

    fn undo(&mut self, journal: Vec<(SlotId, Vec<String>)>) {
        for (slot, removed) in journal.into_iter().rev() {
            self.domains.restore(slot, removed);
        }
    }
}

fn state_signature(assignment: &Assignment) -> u64 {
    let mut entries: Vec<(SlotId, &String)> =
        assignment.iter().map(|(&slot, word)| (slot, word)).collect();
    entries.sort();

    let mut hasher = FxHasher::default();
    for (slot, word) in entries {
        slot.hash(&mut hasher);
        word.hash(&mut hasher);
    }
    hasher.finish()
}
