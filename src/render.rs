// 🖨️ Renderer Framework
// One trait, one implementation per output format

use crate::matrix::{DigitRange, HarmonicMatrix, MatrixRow};
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

// ============================================================================
// OUTPUT FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown table
    #[value(name = "md", alias = "markdown")]
    #[serde(rename = "md", alias = "markdown")]
    Markdown,
    /// Pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
    /// Plain console text
    Text,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Markdown,
        OutputFormat::Json,
        OutputFormat::Csv,
        OutputFormat::Text,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

// ============================================================================
// RENDERER TRAIT
// ============================================================================

/// MatrixRenderer - turns a built matrix into a complete document
pub trait MatrixRenderer: Send + Sync {
    fn render(&self, matrix: &HarmonicMatrix) -> Result<String>;

    fn format(&self) -> OutputFormat;
}

/// Factory: get the renderer for a format
pub fn get_renderer(format: OutputFormat) -> Box<dyn MatrixRenderer> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
        OutputFormat::Csv => Box::new(CsvRenderer),
        OutputFormat::Text => Box::new(TextRenderer),
    }
}

/// Shorthand for `get_renderer(format).render(matrix)`
pub fn render(matrix: &HarmonicMatrix, format: OutputFormat) -> Result<String> {
    get_renderer(format).render(matrix)
}

fn gateway_cell(row: &MatrixRow, separator: &str, empty: &str) -> String {
    if row.gateways.is_empty() {
        empty.to_string()
    } else {
        row.gateway_labels().join(separator)
    }
}

// ============================================================================
// MARKDOWN
// ============================================================================

pub struct MarkdownRenderer;

impl MatrixRenderer for MarkdownRenderer {
    fn render(&self, matrix: &HarmonicMatrix) -> Result<String> {
        let mut out = String::new();

        writeln!(out, "| A | B | Result | A Archetype | B Archetype | Result Archetype | Gateways |")?;
        writeln!(out, "|---|---|--------|-------------|-------------|------------------|----------|")?;

        for row in &matrix.rows {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} |",
                row.a,
                row.b,
                row.result,
                row.a_name,
                row.b_name,
                row.result_name,
                gateway_cell(row, ", ", "-")
            )?;
        }

        Ok(out)
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

// ============================================================================
// JSON
// ============================================================================

pub struct JsonRenderer;

impl MatrixRenderer for JsonRenderer {
    fn render(&self, matrix: &HarmonicMatrix) -> Result<String> {
        serde_json::to_string_pretty(&matrix.rows).context("Failed to serialize matrix to JSON")
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

// ============================================================================
// CSV
// ============================================================================

pub struct CsvRenderer;

impl MatrixRenderer for CsvRenderer {
    fn render(&self, matrix: &HarmonicMatrix) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());

        wtr.write_record([
            "a",
            "b",
            "result",
            "a_name",
            "b_name",
            "result_name",
            "gateways",
        ])?;

        for row in &matrix.rows {
            wtr.write_record([
                row.a.to_string(),
                row.b.to_string(),
                row.result.to_string(),
                row.a_name.clone(),
                row.b_name.clone(),
                row.result_name.clone(),
                gateway_cell(row, ";", ""),
            ])?;
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e.error()))?;

        String::from_utf8(bytes).context("CSV output was not valid UTF-8")
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

// ============================================================================
// TEXT
// ============================================================================

pub struct TextRenderer;

impl MatrixRenderer for TextRenderer {
    fn render(&self, matrix: &HarmonicMatrix) -> Result<String> {
        let mut out = String::new();

        writeln!(out, "{}", matrix.summary())?;
        writeln!(out)?;

        for row in &matrix.rows {
            write!(
                out,
                "{:>3} + {:<3} = {}   {}",
                row.a,
                row.b,
                row.result,
                row.narrative()
            )?;
            if !row.gateways.is_empty() {
                write!(out, "   [{}]", gateway_cell(row, ", ", ""))?;
            }
            writeln!(out)?;
        }

        Ok(out)
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}

/// Compact results grid with row and column headers
pub fn render_grid(matrix: &HarmonicMatrix) -> String {
    grid_table(matrix.row_range, matrix.col_range, &matrix.grid())
}

/// Same layout as [`render_grid`], from a precomputed result grid
pub fn grid_table(row_range: DigitRange, col_range: DigitRange, grid: &[Vec<u8>]) -> String {
    let mut out = String::from("    |");
    for b in col_range.iter() {
        out.push_str(&format!("{:>3}", b));
    }
    out.push('\n');
    out.push_str("----+");
    out.push_str(&"---".repeat(col_range.len()));
    out.push('\n');

    for (a, results) in row_range.iter().zip(grid) {
        out.push_str(&format!("{:>3} |", a));
        for r in results {
            out.push_str(&format!("{:>3}", r));
        }
        out.push('\n');
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayClassifier;

    fn small_matrix() -> HarmonicMatrix {
        HarmonicMatrix::build(
            DigitRange::new(0, 1).unwrap(),
            DigitRange::new(0, 1).unwrap(),
            &GatewayClassifier::new(),
        )
    }

    #[test]
    fn test_markdown_has_header_and_one_line_per_row() {
        let md = render(&HarmonicMatrix::standard(), OutputFormat::Markdown).unwrap();
        let lines: Vec<&str> = md.lines().collect();

        assert_eq!(lines.len(), 102);
        assert!(lines[0].starts_with("| A | B | Result"));
        assert_eq!(
            lines[2],
            "| 0 | 0 | 9 | Void | Void | Completion | void gateway, mirror gate, completion gate |"
        );
    }

    #[test]
    fn test_markdown_lists_every_gateway() {
        let md = render(&small_matrix(), OutputFormat::Markdown).unwrap();
        assert!(md.contains("| 1 | 1 | 2 | Unity | Unity | Duality | mirror gate, vortex flow |"));
    }

    #[test]
    fn test_json_is_an_array_of_rows() {
        let json = render(&HarmonicMatrix::standard(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let rows = value.as_array().unwrap();

        assert_eq!(rows.len(), 100);
        assert_eq!(rows[13]["result"], 4);
        assert_eq!(rows[0]["gateways"][0], "void_gateway");
    }

    #[test]
    fn test_csv_rows() {
        let csv_text = render(&small_matrix(), OutputFormat::Csv).unwrap();
        let mut rdr = csv::Reader::from_reader(csv_text.as_bytes());

        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[2], "result");

        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 4);
        assert_eq!(&records[1][2], "1");
        assert_eq!(&records[1][6], "void gateway");
    }

    #[test]
    fn test_text_output() {
        let text = render(&small_matrix(), OutputFormat::Text).unwrap();

        assert!(text.starts_with("Matrix 0..=1 × 0..=1: 4 cells"));
        assert!(text.contains("Unity + Unity → Duality   [mirror gate, vortex flow]"));
    }

    #[test]
    fn test_grid() {
        let grid = render_grid(&small_matrix());
        let lines: Vec<&str> = grid.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "  0 |  9  1");
        assert_eq!(lines[3], "  1 |  1  2");
    }

    #[test]
    fn test_factory_matches_format() {
        for format in OutputFormat::ALL {
            assert_eq!(get_renderer(format).format(), format);
        }
        assert_eq!(OutputFormat::Text.extension(), "txt");
    }
}
