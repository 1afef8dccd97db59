/// Whole-instruction stepping and end-to-end programs.
pub mod execution;
