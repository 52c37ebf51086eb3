//! Output row schema
//!
//! One row per sampled node. The column set and order are fixed by
//! [`SampleRow::header`]; every row in a round renders through the
//! same struct, so the table handed to the sink is homogeneous by
//! construction and the first row's header holds for all of them.

use std::fmt;

use crate::cluster::NodeRole;
use crate::taxonomy::CommandTaxonomy;

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl CellValue {
    /// Convert to a JSON value for the JSON report format
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Int(i) => serde_json::Value::from(*i),
            CellValue::Float(v) => serde_json::Value::from(*v),
            CellValue::Str(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

/// Identity columns preceding the per-category block
const IDENTITY_COLUMNS: &[&str] = &[
    "Source",
    "NodeName",
    "NodeRole",
    "EngineVersion",
    "OS",
    "BytesUsedForCache",
    "MemoryLimitGb",
    "CurrConnections",
    "ClusterEnabled",
    "ConnectedReplicas",
    "TotalOps",
];

/// Trailing keyspace columns
const KEYSPACE_COLUMNS: &[&str] = &["CurrItems", "Namespaces"];

/// One node's metrics for a sampling round
#[derive(Debug, Clone)]
pub struct SampleRow {
    pub source: String,
    pub node_name: String,
    pub role: NodeRole,
    pub engine_version: String,
    pub os: String,
    pub peak_memory_bytes: i64,
    pub memory_limit_gb: f64,
    pub connections: i64,
    pub cluster_enabled: i64,
    /// Absent when the engine does not report the field (e.g. replicas)
    pub connected_replicas: Option<i64>,
    pub total_ops: CellValue,
    /// One entry per taxonomy category, in category order
    pub category_counts: Vec<i64>,
    pub total_keys: i64,
    /// Breakdown like `db0:100, db2:5`
    pub namespaces: String,
}

impl SampleRow {
    /// Column names, in cell order
    pub fn header(taxonomy: &CommandTaxonomy) -> Vec<String> {
        let mut columns: Vec<String> =
            IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(taxonomy.categories().iter().map(|c| c.name.to_string()));
        columns.extend(KEYSPACE_COLUMNS.iter().map(|c| c.to_string()));
        columns
    }

    /// Cell values, aligned with [`SampleRow::header`]
    pub fn cells(&self) -> Vec<CellValue> {
        let mut cells = vec![
            CellValue::Str(self.source.clone()),
            CellValue::Str(self.node_name.clone()),
            CellValue::Str(self.role.to_string()),
            CellValue::Str(self.engine_version.clone()),
            CellValue::Str(self.os.clone()),
            CellValue::Int(self.peak_memory_bytes),
            CellValue::Float(self.memory_limit_gb),
            CellValue::Int(self.connections),
            CellValue::Int(self.cluster_enabled),
            match self.connected_replicas {
                Some(n) => CellValue::Int(n),
                None => CellValue::Str(String::new()),
            },
            self.total_ops.clone(),
        ];
        cells.extend(self.category_counts.iter().map(|&c| CellValue::Int(c)));
        cells.push(CellValue::Int(self.total_keys));
        cells.push(CellValue::Str(self.namespaces.clone()));
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(taxonomy: &CommandTaxonomy) -> SampleRow {
        SampleRow {
            source: "staging".to_string(),
            node_name: "10.0.0.1:6379".to_string(),
            role: NodeRole::Master,
            engine_version: "7.2.4".to_string(),
            os: "Linux 5.10 x86_64".to_string(),
            peak_memory_bytes: 1048576,
            memory_limit_gb: 0.001,
            connections: 10,
            cluster_enabled: 0,
            connected_replicas: Some(2),
            total_ops: CellValue::Float(3.5),
            category_counts: vec![0; taxonomy.categories().len()],
            total_keys: 105,
            namespaces: "db0:100, db2:5".to_string(),
        }
    }

    #[test]
    fn test_header_and_cells_align() {
        let taxonomy = CommandTaxonomy::default();
        let row = sample_row(&taxonomy);
        assert_eq!(SampleRow::header(&taxonomy).len(), row.cells().len());
    }

    #[test]
    fn test_header_contains_category_columns_in_order() {
        let taxonomy = CommandTaxonomy::default();
        let header = SampleRow::header(&taxonomy);
        let first_cat = header.iter().position(|c| c == "BitmapBasedCmds").unwrap();
        for (i, cat) in taxonomy.categories().iter().enumerate() {
            assert_eq!(header[first_cat + i], cat.name);
        }
    }

    #[test]
    fn test_missing_replica_count_renders_empty() {
        let taxonomy = CommandTaxonomy::default();
        let mut row = sample_row(&taxonomy);
        row.connected_replicas = None;
        let header = SampleRow::header(&taxonomy);
        let idx = header.iter().position(|c| c == "ConnectedReplicas").unwrap();
        assert_eq!(row.cells()[idx], CellValue::Str(String::new()));
    }
}
