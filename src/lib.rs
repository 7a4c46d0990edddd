//! Crossword-grid constraint solver.
//!
//! Given a grid of blocked cells, open cells, and optional pre-filled
//! letters, assigns a dictionary word to every slot so that all crossing
//! slots agree on their shared letters. Domains are pre-pruned with AC-3
//! arc consistency, then searched with backtracking under MRV/degree
//! variable ordering, least-constraining-value ordering, and forward
//! checking.
//!
//! ```
//! use xsolve::{Grid, SolveOutcome, Solver, WordIndex};
//!
//! let grid = Grid::parse("..\n.#").unwrap();
//! let index = WordIndex::build(vec!["AT".into(), "AS".into(), "TA".into()]);
//! let mut solver = Solver::prepare(&grid, &index);
//! match solver.solve() {
//!     SolveOutcome::Solved(solution) => assert_eq!(2, solution.len()),
//!     other => panic!("expected a fill, got {:?}", other),
//! }
//! ```

pub mod ac3;
pub mod constraints;
pub mod domains;
pub mod grid;
pub mod slots;
pub mod solver;
pub mod words;

pub use crate::ac3::{ac3, Ac3Outcome};
pub use crate::constraints::ConstraintGraph;
pub use crate::domains::DomainStore;
pub use crate::grid::{Cell, Grid, GridError};
pub use crate::slots::{extract_slots, Direction, Position, PreFilledMap, Slot, SlotId};
pub use crate::solver::{
    CancelToken, SolveOutcome, SolveReport, Solution, Solver, UnsolvableReason,
};
pub use crate::words::{fallback_words, parse_word_list, WordIndex, WordListError};
