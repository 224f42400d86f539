pub mod board;
pub mod rules;
pub mod step;
