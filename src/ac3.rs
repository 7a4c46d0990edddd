use std::collections::VecDeque;

use log::debug;

use crate::constraints::{overlap_agrees, ConstraintGraph};
use crate::domains::{matches_prefilled, DomainStore};
use crate::slots::{PreFilledMap, Slot, SlotId};
use crate::solver::CancelToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ac3Outcome {
    /// Every arc is consistent. The puzzle is not necessarily solvable;
    /// search still has to run.
    Consistent,
    /// The named slot's domain was wiped out: no solution under the current
    /// constraints.
    Inconsistent(SlotId),
    Cancelled,
}

/// Enforces arc consistency over the domains, in place.
///
/// Standard AC-3 with a FIFO work queue seeded with every ordered arc. When a
/// revision shrinks `x`, the arcs `(z, x)` for every other neighbor `z` go
/// back on the queue. Domains only ever shrink, so the pass terminates; a
/// wiped-out domain short-circuits the whole run.
pub fn ac3(
    domains: &mut DomainStore,
    graph: &ConstraintGraph,
    slots: &[Slot],
    prefilled: &PreFilledMap,
    cancel: &CancelToken,
) -> Ac3Outcome {
    let mut queue: VecDeque<(SlotId, SlotId)> = graph.arcs().into();

    while let Some((x, y)) = queue.pop_front() {
        if cancel.is_cancelled() {
            return Ac3Outcome::Cancelled;
        }
        if revise(domains, graph, slots, prefilled, x, y) {
            if domains.size(x) == 0 {
                debug!("arc consistency emptied {}", slots[x]);
                return Ac3Outcome::Inconsistent(x);
            }
            for z in graph.neighbors(x) {
                if z != y {
                    queue.push_back((z, x));
                }
            }
        }
    }

    Ac3Outcome::Consistent
}

/// Drops from `x` every word with no supporting word left in `y`, plus any
/// word that violates `x`'s own pre-filled letters. Returns whether anything
/// was removed.
fn revise(
    domains: &mut DomainStore,
    graph: &ConstraintGraph,
    slots: &[Slot],
    prefilled: &PreFilledMap,
    x: SlotId,
    y: SlotId,
) -> bool {
    let overlaps = match graph.overlaps(x, y) {
        Some(overlaps) => overlaps,
        None => return false,
    };

    let support: Vec<String> = domains.domain(y).iter().cloned().collect();
    let slot_x = &slots[x];

    let removed = domains.prune(x, |wx| {
        matches_prefilled(slot_x, wx, prefilled)
            && support.iter().any(|wy| overlap_agrees(wx, wy, overlaps))
    });
    !removed.is_empty()
}

#[cfg(test)]
mod tests {
    use super::{ac3, Ac3Outcome};
    use crate::constraints::ConstraintGraph;
    use crate::domains::DomainStore;
    use crate::grid::Grid;
    use crate::slots::extract_slots;
    use crate::solver::CancelToken;
    use crate::words::WordIndex;

    fn index(words: &[&str]) -> WordIndex {
        WordIndex::build(words.iter().map(|w| w.to_string()).collect())
    }

    /// 1-Across spans the top row and crosses 2-Down at the across slot's
    /// second cell.
    fn bent_pair() -> (Grid, Vec<crate::slots::Slot>, crate::slots::PreFilledMap) {
        let grid = Grid::parse("..\n#.").unwrap();
        let (slots, prefilled) = extract_slots(&grid);
        assert_eq!(2, slots.len());
        (grid, slots, prefilled)
    }

    #[test]
    fn prunes_unsupported_words() {
        let (_, slots, prefilled) = bent_pair();
        let graph = ConstraintGraph::build(&slots);
        let index = index(&["AT", "TA", "AS"]);
        let mut domains = DomainStore::build(&slots, &prefilled, &index);

        let outcome = ac3(&mut domains, &graph, &slots, &prefilled, &CancelToken::new());
        assert_eq!(Ac3Outcome::Consistent, outcome);

        // "AS" across would need a down word starting with S; none exists.
        assert!(domains.domain(0).contains("AT"));
        assert!(domains.domain(0).contains("TA"));
        assert!(!domains.domain(0).contains("AS"));
        assert_eq!(3, domains.size(1));
    }

    #[test]
    fn is_idempotent() {
        let (_, slots, prefilled) = bent_pair();
        let graph = ConstraintGraph::build(&slots);
        let index = index(&["AT", "TA", "AS", "IT"]);
        let mut domains = DomainStore::build(&slots, &prefilled, &index);
        let cancel = CancelToken::new();

        assert_eq!(
            Ac3Outcome::Consistent,
            ac3(&mut domains, &graph, &slots, &prefilled, &cancel)
        );
        let after_first = domains.sizes();
        let first_domains: Vec<_> = (0..slots.len())
            .map(|slot| domains.domain(slot).clone())
            .collect();

        assert_eq!(
            Ac3Outcome::Consistent,
            ac3(&mut domains, &graph, &slots, &prefilled, &cancel)
        );
        assert_eq!(after_first, domains.sizes());
        for (slot, before) in first_domains.iter().enumerate() {
            assert_eq!(before, domains.domain(slot));
        }
    }

    #[test]
    fn reports_wiped_domain() {
        // The across slot is pre-filled to start with Q; the only word list
        // entries make the crossing impossible.
        let grid = Grid::parse("Q.\n#.").unwrap();
        let (slots, prefilled) = extract_slots(&grid);
        let graph = ConstraintGraph::build(&slots);
        let index = index(&["QI", "AT", "TA"]);
        let mut domains = DomainStore::build(&slots, &prefilled, &index);
        assert_eq!(1, domains.size(0));

        // "QI" across needs a down word starting with I; there is none, so
        // the across domain empties.
        let outcome = ac3(&mut domains, &graph, &slots, &prefilled, &CancelToken::new());
        assert_eq!(Ac3Outcome::Inconsistent(0), outcome);
        assert_eq!(0, domains.size(0));
    }

    #[test]
    fn cancellation_stops_the_pass() {
        let (_, slots, prefilled) = bent_pair();
        let graph = ConstraintGraph::build(&slots);
        let index = index(&["AT", "TA"]);
        let mut domains = DomainStore::build(&slots, &prefilled, &index);

        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = ac3(&mut domains, &graph, &slots, &prefilled, &cancel);
        assert_eq!(Ac3Outcome::Cancelled, outcome);
    }
}
