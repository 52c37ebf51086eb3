//! Utility modules

pub mod error;
pub mod resp;

pub use error::{ClusterError, ConnectionError, ProtocolError, Result, SamplerError};
pub use resp::{RespDecoder, RespEncoder, RespValue};
