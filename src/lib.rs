pub mod cards;
pub mod compact;
pub mod drill;
pub mod grid;
pub mod hands;
pub mod range;
pub mod scenario;
pub mod trainer;
pub mod web;

pub use hands::{HandClass, HandLabel, classify, enumerate_hands};
pub use range::{Action, ActionOrder, HandRangeTable, RangeSummary, expand};
pub use trainer::{Trainer, TrainerConfig};
