//! Error types for valkey-stat-sampler

use std::io;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Sampling cancelled")]
    Cancelled,
}

/// Connection-related errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        host: String,
        port: u16,
        source: io::Error,
    },

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("TLS handshake failed: {0}")]
    TlsFailed(String),
}

/// Status-report correlation errors
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Status report missing mandatory field: {0}")]
    MissingField(String),
}

/// Cluster topology errors
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Failed to parse CLUSTER NODES response: {0}")]
    ParseFailed(String),

    #[error("No reachable nodes in cluster")]
    NoNodes,
}

pub type Result<T> = std::result::Result<T, SamplerError>;
