use log::debug;

use crate::slots::{Slot, SlotId};

#[derive(Debug, Clone)]
struct Edge {
    neighbor: SlotId,
    overlaps: Vec<(usize, usize)>,
}

/// Letter-overlap constraints between every pair of intersecting slots.
///
/// For slots `a` and `b` sharing a cell, `overlaps(a, b)` lists the index
/// pairs `(ia, ib)` where the chosen words must agree: `wa[ia] == wb[ib]`.
/// The graph is symmetric, so `overlaps(b, a)` holds the mirrored pairs.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    edges: Vec<Vec<Edge>>,
}

impl ConstraintGraph {
    /// Pairwise position comparison over all slot pairs. Quadratic in total
    /// cell count, which is fine at crossword sizes.
    pub fn build(slots: &[Slot]) -> ConstraintGraph {
        let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); slots.len()];

        for a in 0..slots.len() {
            for b in (a + 1)..slots.len() {
                let mut overlaps = Vec::new();
                for (ia, pa) in slots[a].positions.iter().enumerate() {
                    for (ib, pb) in slots[b].positions.iter().enumerate() {
                        if pa == pb {
                            overlaps.push((ia, ib));
                        }
                    }
                }
                if !overlaps.is_empty() {
                    let mirrored = overlaps.iter().map(|&(ia, ib)| (ib, ia)).collect();
                    edges[a].push(Edge {
                        neighbor: b,
                        overlaps,
                    });
                    edges[b].push(Edge {
                        neighbor: a,
                        overlaps: mirrored,
                    });
                }
            }
        }

        let graph = ConstraintGraph { edges };
        debug!("constraint graph has {} arcs", graph.arc_count());
        graph
    }

    /// Neighbors of `slot` paired with the overlap indices, in ascending
    /// neighbor order.
    pub fn edges(&self, slot: SlotId) -> impl Iterator<Item = (SlotId, &[(usize, usize)])> {
        self.edges[slot]
            .iter()
            .map(|edge| (edge.neighbor, edge.overlaps.as_slice()))
    }

    pub fn neighbors(&self, slot: SlotId) -> impl Iterator<Item = SlotId> + '_ {
        self.edges[slot].iter().map(|edge| edge.neighbor)
    }

    pub fn overlaps(&self, a: SlotId, b: SlotId) -> Option<&[(usize, usize)]> {
        self.edges[a]
            .iter()
            .find(|edge| edge.neighbor == b)
            .map(|edge| edge.overlaps.as_slice())
    }

    /// Number of constraint edges touching `slot`.
    pub fn degree(&self, slot: SlotId) -> usize {
        self.edges[slot].len()
    }

    /// Every ordered arc `(x, y)`, both directions of each edge.
    pub fn arcs(&self) -> Vec<(SlotId, SlotId)> {
        let mut arcs = Vec::with_capacity(self.arc_count());
        for (slot, edges) in self.edges.iter().enumerate() {
            for edge in edges {
                arcs.push((slot, edge.neighbor));
            }
        }
        arcs
    }

    pub fn arc_count(&self) -> usize {
        self.edges.iter().map(|edges| edges.len()).sum()
    }
}

/// True when `a` and `b` agree at every overlap index pair. Words are ASCII,
/// so byte indexing is safe.
pub(crate) fn overlap_agrees(a: &str, b: &str, overlaps: &[(usize, usize)]) -> bool {
    overlaps
        .iter()
        .all(|&(ia, ib)| a.as_bytes()[ia] == b.as_bytes()[ib])
}
