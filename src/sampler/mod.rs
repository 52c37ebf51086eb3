//! Node sampling and round orchestration
//!
//! This module provides:
//! - Two-snapshot per-node sampling with cooperative cancellation
//! - The fixed output-row schema shared by every node in a round
//! - Concurrent fan-out across cluster nodes with per-node failure
//!   isolation

pub mod node_sampler;
pub mod orchestrator;
pub mod row;

pub use node_sampler::{build_row, NodeSampler, Snapshot};
pub use orchestrator::SampleOrchestrator;
pub use row::{CellValue, SampleRow};
