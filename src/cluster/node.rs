//! Cluster node representation

use std::fmt;

/// Node role within the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Master,
    Replica,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Master => write!(f, "Master"),
            NodeRole::Replica => write!(f, "Replica"),
        }
    }
}

/// One node to sample, as discovered from topology
#[derive(Debug, Clone)]
pub struct NodeDescriptor {
    /// Hostname or IP
    pub host: String,
    /// Port
    pub port: u16,
    /// Master or replica
    pub role: NodeRole,
    /// Cluster-bus link state at discovery time
    pub connected: bool,
}

impl NodeDescriptor {
    /// Get node address as string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a line from CLUSTER NODES response
///
/// Format: `<id> <ip:port@cport> <flags> <master> <ping-sent> <pong-recv> <config-epoch> <link-state> [<slot> ...]`
///
/// Example:
/// ```text
/// 07c37dfeb235213a872192d90877d0cd55635b91 127.0.0.1:30004@31004 slave e7d1eecce10fd6bb5eb35b9f99a514335d9ba9ca 0 1426238317239 4 connected
/// ```
///
/// Returns `None` for lines that don't describe a usable node
/// (malformed, failing, or mid-handshake).
pub fn parse_cluster_node_line(line: &str) -> Option<NodeDescriptor> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 8 {
        return None;
    }

    let (host, port) = parse_node_address(parts[1])?;

    let flags: Vec<&str> = parts[2].split(',').collect();
    if flags.iter().any(|f| *f == "fail" || *f == "handshake" || *f == "noaddr") {
        return None;
    }

    let role = if flags.contains(&"master") {
        NodeRole::Master
    } else if flags.contains(&"slave") || flags.contains(&"replica") {
        NodeRole::Replica
    } else {
        return None;
    };

    let connected = parts[7] == "connected";

    Some(NodeDescriptor {
        host,
        port,
        role,
        connected,
    })
}

/// Parse node address from CLUSTER NODES
/// Formats: "host:port@cport", "host:port", "host:port@cport,hostname"
fn parse_node_address(addr: &str) -> Option<(String, u16)> {
    // Handle ElastiCache format: ip:port@cport,hostname
    let addr = addr.split(',').next().unwrap_or(addr);

    // Drop the cluster bus port
    let host_port = addr.split('@').next().unwrap_or(addr);

    let (host, port_str) = host_port.rsplit_once(':')?;
    let port: u16 = port_str.parse().ok()?;

    Some((host.to_string(), port))
}
