//! Core data models for runmd
//!
//! Extracted blocks, process results, per-block run state and the
//! aggregate result of a batch run.

pub mod batch;
pub mod block;
pub mod exec_result;
pub mod run_state;

// Re-exports for convenience
pub use batch::{BatchResult, BlockResult};
pub use block::ExtractedBlock;
pub use exec_result::ExecResult;
pub use run_state::{BlockRunState, BlockState};
