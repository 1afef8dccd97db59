
/// Execute stage results and flag updates.
pub mod execute;
