// 📚 Documentation pages
// docs/index.md plus one page per row digit

use crate::archetype::{archetype_meaning, archetype_name};
use crate::harmonic::{in_vortex, is_axis};
use crate::matrix::HarmonicMatrix;
use anyhow::Result;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub struct DocPage {
    /// Relative to the output directory, always `/`-separated
    pub path: String,
    pub content: String,
}

pub fn digit_page_path(digit: i64) -> String {
    format!("docs/digit-{}.md", digit)
}

pub fn index_page(matrix: &HarmonicMatrix) -> Result<DocPage> {
    let mut md = String::new();

    writeln!(md, "# Digit Index")?;
    writeln!(md)?;
    writeln!(md, "{}", matrix.summary())?;
    writeln!(md)?;
    for digit in matrix.row_range.iter() {
        writeln!(
            md,
            "- [{} · {}](digit-{}.md): {}",
            digit,
            archetype_name(digit),
            digit,
            archetype_meaning(digit)
        )?;
    }

    Ok(DocPage {
        path: "docs/index.md".to_string(),
        content: md,
    })
}

pub fn digit_page(digit: i64, matrix: &HarmonicMatrix) -> Result<DocPage> {
    let mut md = String::new();

    writeln!(md, "# {} · {}", digit, archetype_name(digit))?;
    writeln!(md)?;
    writeln!(md, "> {}", archetype_meaning(digit))?;
    writeln!(md)?;

    let position = if digit == 0 {
        "the void"
    } else if is_axis(digit) {
        "the 3-6-9 axis"
    } else if in_vortex(digit) {
        "the vortex circuit"
    } else {
        "outside the digit table"
    };
    writeln!(md, "Position: {}.", position)?;
    writeln!(md)?;

    writeln!(md, "## Interactions")?;
    writeln!(md)?;
    writeln!(md, "| With | Result | Narrative | Gateways |")?;
    writeln!(md, "|------|--------|-----------|----------|")?;
    for row in matrix.row(digit) {
        let gates = if row.gateways.is_empty() {
            "-".to_string()
        } else {
            row.gateway_labels().join(", ")
        };
        writeln!(
            md,
            "| {} | {} | {} | {} |",
            row.b,
            row.result,
            row.narrative(),
            gates
        )?;
    }
    writeln!(md)?;
    writeln!(md, "[Back to index](index.md)")?;

    Ok(DocPage {
        path: digit_page_path(digit),
        content: md,
    })
}

/// Index first, then one page per row digit in order
pub fn pages(matrix: &HarmonicMatrix) -> Result<Vec<DocPage>> {
    let mut pages = vec![index_page(matrix)?];
    for digit in matrix.row_range.iter() {
        pages.push(digit_page(digit, matrix)?);
    }
    Ok(pages)
}
