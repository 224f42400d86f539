//! This crate turns multi-card FreeCell move requests into ordered lists of
//! legal single-card steps, using freecells and empty columns as temporary
//! storage that is restored by the end of every plan.

mod capacity;
mod planner;
mod sweep;

pub use crate::capacity::{count_empty_columns, count_empty_freecells, max_movable};
pub use crate::planner::{Plan, PlanError, PlanRequest, check, plan};
pub use crate::sweep::{is_safe_to_send, plan_foundation_sweep};
