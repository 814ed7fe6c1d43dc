//! Step-list choreography: diff a running stack of display rows and play the difference.

pub mod matching;
pub mod runner;
pub mod steps;

pub use matching::{PartMatching, match_parts};
pub use runner::{StepOptions, place_row, run_steps};
pub use steps::{CallStack, Row, RowOp, Step};
