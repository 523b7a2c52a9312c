// 🎮 Interaction Log - Player fixtures
// Append-only list of interaction records. Nothing is ever removed.

use crate::archetype::archetype_name;
use crate::harmonic::{harmonic, Digit, AXIS_SEQUENCE, VORTEX_SEQUENCE};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const KIND_RESONANCE: &str = "resonance";
pub const KIND_AXIS: &str = "axis";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub consciousness: i64,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionLog {
    records: Vec<InteractionRecord>,
}

impl InteractionLog {
    pub fn new() -> Self {
        InteractionLog {
            records: Vec::new(),
        }
    }

    /// Append a record stamped with the current time
    pub fn record(
        &mut self,
        kind: &str,
        consciousness: i64,
        response: String,
        success: bool,
    ) -> &InteractionRecord {
        self.records.push(InteractionRecord {
            kind: kind.to_string(),
            consciousness,
            response,
            timestamp: Utc::now(),
            success,
        });
        &self.records[self.records.len() - 1]
    }

    /// Meet a stimulus at the given consciousness level.
    ///
    /// Succeeds only when both sides are single digits; the response is
    /// written either way.
    pub fn resonate(&mut self, consciousness: i64, stimulus: i64) -> &InteractionRecord {
        let result = harmonic(consciousness, stimulus);
        let response = format!(
            "{} meets {} and resolves to {} ({})",
            archetype_name(consciousness),
            archetype_name(stimulus),
            archetype_name(result as i64),
            result
        );
        let success = Digit::new(consciousness).is_some() && Digit::new(stimulus).is_some();

        self.record(KIND_RESONANCE, consciousness, response, success)
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a InteractionRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    /// Fraction of successful records, 0.0 when empty
    pub fn success_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let ok = self.records.iter().filter(|r| r.success).count();
        ok as f64 / self.records.len() as f64
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.records).context("Failed to serialize interaction log")
    }
}

/// Fixture session: resonate with every vortex digit, then touch the axis.
pub fn vortex_session(consciousness: i64) -> InteractionLog {
    let mut log = InteractionLog::new();

    for d in VORTEX_SEQUENCE {
        log.resonate(consciousness, d as i64);
    }

    for d in AXIS_SEQUENCE {
        let result = harmonic(consciousness, d as i64);
        log.record(
            KIND_AXIS,
            consciousness,
            format!("Axis {} holds at {}", d, archetype_name(result as i64)),
            result == 9 || result == d,
        );
    }

    log
}
