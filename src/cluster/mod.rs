//! Cluster topology and node discovery
//!
//! This module provides:
//! - Standalone vs cluster-mode detection via the general status query
//! - CLUSTER NODES parsing into per-node descriptors
//! - Exclusion of unreachable nodes before sampling starts

pub mod node;
pub mod topology;

pub use node::{parse_cluster_node_line, NodeDescriptor, NodeRole};
pub use topology::{discover, parse_topology};
