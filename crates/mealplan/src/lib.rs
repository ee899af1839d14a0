//! Normalizes meal plan payloads from the Mealie API into a gap-free,
//! chronologically ordered run of calendar days starting today.

mod calendar;
mod date;
mod group;
mod link;
mod payload;
mod planner;
mod range;
mod view;

pub use calendar::*;
pub use date::*;
pub use group::*;
pub use link::*;
pub use payload::*;
pub use planner::*;
pub use range::*;
pub use view::*;
