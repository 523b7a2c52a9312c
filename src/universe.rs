// 🌌 Universe Document - Everything in one place
//
// Aggregates the archetype table, the vortex circuit, the harmonic grid
// and the gateway census into UNIVERSE.md / universe.json.

use crate::archetype::{archetypes, Archetype};
use crate::gateway::GatewayKind;
use crate::harmonic::{reduce, vortex_cycle, AXIS_SEQUENCE};
use crate::matrix::{DigitRange, HarmonicMatrix};
use crate::render::grid_table;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use uuid::Uuid;

// ============================================================================
// VORTEX SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VortexStep {
    pub from: u8,
    pub doubled: u16,
    pub reduced: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct VortexSummary {
    pub circuit: Vec<u8>,
    pub steps: Vec<VortexStep>,
    pub axis: Vec<u8>,
    pub axis_cycle: Vec<u8>,
}

impl VortexSummary {
    pub fn compute() -> Self {
        let circuit = vortex_cycle(1);
        let steps = circuit
            .iter()
            .map(|&d| {
                let doubled = d as u16 * 2;
                VortexStep {
                    from: d,
                    doubled,
                    reduced: reduce(doubled as i64),
                }
            })
            .collect();

        VortexSummary {
            circuit,
            steps,
            axis: AXIS_SEQUENCE.to_vec(),
            axis_cycle: vortex_cycle(3),
        }
    }
}

// ============================================================================
// UNIVERSE
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Universe {
    pub generation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub row_range: DigitRange,
    pub col_range: DigitRange,
    pub archetypes: Vec<Archetype>,
    pub vortex: VortexSummary,
    pub grid: Vec<Vec<u8>>,
    pub distribution: BTreeMap<u8, usize>,
    pub gateway_census: BTreeMap<GatewayKind, usize>,
    pub summary: String,
}

impl Universe {
    pub fn new(matrix: &HarmonicMatrix, generation_id: Uuid, generated_at: DateTime<Utc>) -> Self {
        Universe {
            generation_id,
            generated_at,
            version: crate::VERSION.to_string(),
            row_range: matrix.row_range,
            col_range: matrix.col_range,
            archetypes: archetypes().to_vec(),
            vortex: VortexSummary::compute(),
            grid: matrix.grid(),
            distribution: matrix.distribution(),
            gateway_census: matrix.gateway_census(),
            summary: matrix.summary(),
        }
    }

    /// Fresh generation id, stamped now
    pub fn generate(matrix: &HarmonicMatrix) -> Self {
        Self::new(matrix, Uuid::new_v4(), Utc::now())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize universe")
    }

    pub fn to_markdown(&self) -> Result<String> {
        let mut md = String::new();

        writeln!(md, "# ZeroPoint Universe")?;
        writeln!(md)?;
        writeln!(
            md,
            "Generated {} · generation `{}` · v{}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.generation_id,
            self.version
        )?;
        writeln!(md)?;
        writeln!(md, "{}", self.summary)?;
        writeln!(md)?;

        writeln!(md, "## Archetypes")?;
        writeln!(md)?;
        writeln!(md, "| Digit | Name | Meaning |")?;
        writeln!(md, "|-------|------|---------|")?;
        for a in &self.archetypes {
            writeln!(md, "| {} | {} | {} |", a.digit, a.name, a.meaning)?;
        }
        writeln!(md)?;

        writeln!(md, "## Vortex Circuit")?;
        writeln!(md)?;
        for step in &self.vortex.steps {
            writeln!(md, "- {} × 2 = {} → {}", step.from, step.doubled, step.reduced)?;
        }
        writeln!(md)?;
        writeln!(
            md,
            "Axis {:?} stays outside the circuit: {} doubles into itself.",
            self.vortex.axis,
            self.vortex
                .axis_cycle
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(" ↔ ")
        )?;
        writeln!(md)?;

        writeln!(md, "## Harmonic Grid")?;
        writeln!(md)?;
        writeln!(md, "```text")?;
        write!(md, "{}", grid_table(self.row_range, self.col_range, &self.grid))?;
        writeln!(md, "```")?;
        writeln!(md)?;

        writeln!(md, "## Distribution")?;
        writeln!(md)?;
        writeln!(md, "| Result | Cells |")?;
        writeln!(md, "|--------|-------|")?;
        for (digit, count) in &self.distribution {
            writeln!(md, "| {} | {} |", digit, count)?;
        }
        writeln!(md)?;

        writeln!(md, "## Gateways")?;
        writeln!(md)?;
        writeln!(md, "| Gateway | Cells | Meaning |")?;
        writeln!(md, "|---------|-------|---------|")?;
        for (gate, count) in &self.gateway_census {
            writeln!(md, "| {} | {} | {} |", gate.label(), count, gate.description())?;
        }

        Ok(md)
    }
}
