//! Status-report parsing
//!
//! This module provides:
//! - Shape-driven value coercion (scalar vs nested `key=value` list)
//! - Line-oriented INFO payload parsing into a typed field tree
//! - Graceful degradation for unknown report formats (raw bucket)

pub mod info;
pub mod value;

pub use info::{parse_info, InfoTree};
pub use value::{coerce, Value};
