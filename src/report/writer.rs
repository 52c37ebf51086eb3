//! Report file writer

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::ReportFormat;
use crate::sampler::SampleRow;
use crate::taxonomy::CommandTaxonomy;

/// Writes sampled rows to the configured output format
pub struct ReportWriter {
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Write all rows to `path`
    pub fn write(
        &self,
        path: &Path,
        taxonomy: &CommandTaxonomy,
        rows: &[SampleRow],
    ) -> io::Result<()> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        match self.format {
            ReportFormat::Csv => self.write_csv(&mut out, taxonomy, rows),
            ReportFormat::Json => self.write_json(&mut out, taxonomy, rows),
        }
    }

    fn write_csv<W: Write>(
        &self,
        out: &mut W,
        taxonomy: &CommandTaxonomy,
        rows: &[SampleRow],
    ) -> io::Result<()> {
        let header = SampleRow::header(taxonomy);
        writeln!(out, "{}", header.join(","))?;

        for row in rows {
            let line: Vec<String> = row
                .cells()
                .iter()
                .map(|cell| csv_escape(&cell.to_string()))
                .collect();
            writeln!(out, "{}", line.join(","))?;
        }
        Ok(())
    }

    fn write_json<W: Write>(
        &self,
        out: &mut W,
        taxonomy: &CommandTaxonomy,
        rows: &[SampleRow],
    ) -> io::Result<()> {
        let header = SampleRow::header(taxonomy);
        let objects: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let map: serde_json::Map<String, serde_json::Value> = header
                    .iter()
                    .cloned()
                    .zip(row.cells().iter().map(|c| c.to_json()))
                    .collect();
                serde_json::Value::Object(map)
            })
            .collect();

        writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Array(objects))?
        )
    }
}

/// Quote a CSV cell when it contains the list separator or a quote
fn csv_escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::NodeRole;
    use crate::sampler::CellValue;

    fn row(taxonomy: &CommandTaxonomy) -> SampleRow {
        SampleRow {
            source: "staging".to_string(),
            node_name: "10.0.0.1:6379".to_string(),
            role: NodeRole::Master,
            engine_version: "7.2.4".to_string(),
            os: "Linux".to_string(),
            peak_memory_bytes: 1024,
            memory_limit_gb: 0.0,
            connections: 3,
            cluster_enabled: 1,
            connected_replicas: None,
            total_ops: CellValue::Int(200),
            category_counts: vec![0; taxonomy.categories().len()],
            total_keys: 105,
            namespaces: "db0:100, db2:5".to_string(),
        }
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("db0:100, db2:5"), "\"db0:100, db2:5\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_write_csv() {
        let taxonomy = CommandTaxonomy::default();
        let writer = ReportWriter::new(ReportFormat::Csv);
        let mut buf = Vec::new();
        writer
            .write_csv(&mut buf, &taxonomy, &[row(&taxonomy)])
            .unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Source,NodeName,NodeRole"));
        assert!(header.ends_with("CurrItems,Namespaces"));

        let data = lines.next().unwrap();
        assert!(data.starts_with("staging,10.0.0.1:6379,Master,7.2.4,Linux"));
        // Namespace breakdown contains the separator and must be quoted
        assert!(data.ends_with("105,\"db0:100, db2:5\""));
    }

    #[test]
    fn test_write_json() {
        let taxonomy = CommandTaxonomy::default();
        let writer = ReportWriter::new(ReportFormat::Json);
        let mut buf = Vec::new();
        writer
            .write_json(&mut buf, &taxonomy, &[row(&taxonomy)])
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Source"], "staging");
        assert_eq!(rows[0]["TotalOps"], 200);
        assert_eq!(rows[0]["CurrItems"], 105);
        // Absent replica count serializes as an empty cell
        assert_eq!(rows[0]["ConnectedReplicas"], "");
    }

    #[test]
    fn test_csv_row_cell_count_matches_header() {
        let taxonomy = CommandTaxonomy::default();
        let header_len = SampleRow::header(&taxonomy).len();
        assert_eq!(row(&taxonomy).cells().len(), header_len);
    }
}
