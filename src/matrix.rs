// 🧮 Harmonic Matrix - Every digit pair in a range, fully materialized
//
// Row-major: for each a in the row range, for each b in the column range.
// 0-9 × 0-9 gives 100 rows, 1-9 × 1-9 gives 81.

use crate::archetype::archetype_name;
use crate::gateway::{GatewayClassifier, GatewayKind};
use crate::harmonic::harmonic;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Widest span accepted on one axis
pub const MAX_RANGE_SPAN: i64 = 1_000;

// ============================================================================
// DIGIT RANGE
// ============================================================================

/// Inclusive range of integers on one matrix axis.
///
/// Serialized as text (`"0..=9"`) so it reads naturally in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DigitRange {
    start: i64,
    end: i64,
}

impl DigitRange {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            bail!("Invalid range: start {} is greater than end {}", start, end);
        }
        if end.checked_sub(start).map_or(true, |span| span >= MAX_RANGE_SPAN) {
            bail!(
                "Invalid range: {}..={} spans more than {} values",
                start,
                end,
                MAX_RANGE_SPAN
            );
        }
        Ok(DigitRange { start, end })
    }

    /// 0..=9
    pub fn digits() -> Self {
        DigitRange { start: 0, end: 9 }
    }

    /// 1..=9
    pub fn manifest() -> Self {
        DigitRange { start: 1, end: 9 }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, n: i64) -> bool {
        n >= self.start && n <= self.end
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<i64> {
        self.start..=self.end
    }
}

impl Default for DigitRange {
    fn default() -> Self {
        Self::digits()
    }
}

impl fmt::Display for DigitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Accepts `"0..9"`, `"0..=9"` and `"1-9"`; all forms are inclusive
impl FromStr for DigitRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        let (start, end) = if let Some((l, r)) = s.split_once("..=") {
            (l, r)
        } else if let Some((l, r)) = s.split_once("..") {
            (l, r)
        } else {
            // Skip a leading sign so "-3-5" splits after the 3
            match s.char_indices().skip(1).find(|(_, c)| *c == '-') {
                Some((i, _)) => (&s[..i], &s[i + 1..]),
                None => bail!("Invalid range '{}': expected START..END or START-END", s),
            }
        };

        let start: i64 = start
            .trim()
            .parse()
            .with_context(|| format!("Invalid range start in '{}'", s))?;
        let end: i64 = end
            .trim()
            .parse()
            .with_context(|| format!("Invalid range end in '{}'", s))?;

        DigitRange::new(start, end)
    }
}

impl TryFrom<String> for DigitRange {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DigitRange> for String {
    fn from(range: DigitRange) -> Self {
        range.to_string()
    }
}

// ============================================================================
// MATRIX ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub a: i64,
    pub b: i64,
    pub result: u8,
    pub a_name: String,
    pub b_name: String,
    pub result_name: String,
    pub gateways: Vec<GatewayKind>,
}

impl MatrixRow {
    pub fn compute(a: i64, b: i64, classifier: &GatewayClassifier) -> Self {
        let result = harmonic(a, b);

        MatrixRow {
            a,
            b,
            result,
            a_name: archetype_name(a),
            b_name: archetype_name(b),
            result_name: archetype_name(result as i64),
            gateways: classifier.classify(a, b),
        }
    }

    /// "Unity + Duality → Resonance"
    pub fn narrative(&self) -> String {
        format!("{} + {} → {}", self.a_name, self.b_name, self.result_name)
    }

    pub fn gateway_labels(&self) -> Vec<&'static str> {
        self.gateways.iter().map(|g| g.label()).collect()
    }
}

// ============================================================================
// HARMONIC MATRIX
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonicMatrix {
    pub row_range: DigitRange,
    pub col_range: DigitRange,
    pub rows: Vec<MatrixRow>,
}

impl HarmonicMatrix {
    pub fn build(
        row_range: DigitRange,
        col_range: DigitRange,
        classifier: &GatewayClassifier,
    ) -> Self {
        let mut rows = Vec::with_capacity(row_range.len() * col_range.len());

        for a in row_range.iter() {
            for b in col_range.iter() {
                rows.push(MatrixRow::compute(a, b, classifier));
            }
        }

        debug!(
            rows = rows.len(),
            row_range = %row_range,
            col_range = %col_range,
            "Built harmonic matrix"
        );

        HarmonicMatrix {
            row_range,
            col_range,
            rows,
        }
    }

    /// 0-9 × 0-9 with the standard gateways
    pub fn standard() -> Self {
        Self::build(
            DigitRange::digits(),
            DigitRange::digits(),
            &GatewayClassifier::new(),
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, a: i64, b: i64) -> Option<&MatrixRow> {
        if !self.row_range.contains(a) || !self.col_range.contains(b) {
            return None;
        }
        let index = (a - self.row_range.start()) as usize * self.col_range.len()
            + (b - self.col_range.start()) as usize;
        self.rows.get(index)
    }

    /// All cells whose row is `a`
    pub fn row(&self, a: i64) -> impl Iterator<Item = &MatrixRow> {
        self.rows.iter().filter(move |r| r.a == a)
    }

    /// Results only, one inner Vec per row digit
    pub fn grid(&self) -> Vec<Vec<u8>> {
        self.rows
            .chunks(self.col_range.len())
            .map(|chunk| chunk.iter().map(|r| r.result).collect())
            .collect()
    }

    /// How many cells reduce to each digit 1-9 (zero counts included)
    pub fn distribution(&self) -> BTreeMap<u8, usize> {
        let mut counts: BTreeMap<u8, usize> = (1..=9).map(|d| (d, 0)).collect();
        for row in &self.rows {
            *counts.entry(row.result).or_insert(0) += 1;
        }
        counts
    }

    /// How many cells carry each gateway (zero counts included)
    pub fn gateway_census(&self) -> BTreeMap<GatewayKind, usize> {
        let mut counts: BTreeMap<GatewayKind, usize> =
            GatewayKind::ALL.iter().map(|g| (*g, 0)).collect();
        for row in &self.rows {
            for gate in &row.gateways {
                *counts.entry(*gate).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn summary(&self) -> String {
        let gated = self.rows.iter().filter(|r| !r.gateways.is_empty()).count();
        format!(
            "Matrix {} × {}: {} cells, {} with gateways",
            self.row_range,
            self.col_range,
            self.rows.len(),
            gated
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_matrix_has_100_rows() {
        let matrix = HarmonicMatrix::standard();
        assert_eq!(matrix.len(), 100);
        assert!(matrix.rows.iter().all(|r| (1..=9).contains(&r.result)));
    }

    #[test]
    fn test_manifest_matrix_has_81_rows() {
        let matrix = HarmonicMatrix::build(
            DigitRange::manifest(),
            DigitRange::manifest(),
            &GatewayClassifier::new(),
        );
        assert_eq!(matrix.len(), 81);
        assert_eq!(matrix.rows[0].a, 1);
        assert_eq!(matrix.rows[0].b, 1);
    }

    #[test]
    fn test_rows_are_row_major_with_names() {
        let matrix = HarmonicMatrix::standard();
        let row = &matrix.rows[12];

        assert_eq!((row.a, row.b), (1, 2));
        assert_eq!(row.result, 3);
        assert_eq!(row.result_name, "Resonance");
        assert_eq!(row.narrative(), "Unity + Duality → Resonance");
    }

    #[test]
    fn test_get_matches_compute() {
        let matrix = HarmonicMatrix::standard();
        let cell = matrix.get(4, 5).unwrap();

        assert_eq!(cell.result, 9);
        assert!(cell.gateways.contains(&GatewayKind::Polarity));
        assert!(matrix.get(10, 0).is_none());
    }

    #[test]
    fn test_grid_shape() {
        let matrix = HarmonicMatrix::build(
            DigitRange::new(0, 2).unwrap(),
            DigitRange::new(0, 3).unwrap(),
            &GatewayClassifier::new(),
        );
        let grid = matrix.grid();

        assert_eq!(grid.len(), 3);
        assert!(grid.iter().all(|r| r.len() == 4));
        assert_eq!(grid[0], vec![9, 1, 2, 3]);
    }

    #[test]
    fn test_distribution_covers_all_cells() {
        let matrix = HarmonicMatrix::standard();
        let dist = matrix.distribution();

        assert_eq!(dist.len(), 9);
        assert_eq!(dist.values().sum::<usize>(), 100);
        // 0+0, 9+9 and the ten ordered pairs summing to 9
        assert_eq!(dist[&9], 12);
    }

    #[test]
    fn test_gateway_census() {
        let census = HarmonicMatrix::standard().gateway_census();

        assert_eq!(census[&GatewayKind::MirrorGate], 10);
        assert_eq!(census[&GatewayKind::VoidGateway], 19);
        assert_eq!(census[&GatewayKind::VortexFlow], 36);
        assert_eq!(census[&GatewayKind::Polarity], 10);
    }

    #[test]
    fn test_range_parsing() {
        assert_eq!("0..9".parse::<DigitRange>().unwrap(), DigitRange::digits());
        assert_eq!("0..=9".parse::<DigitRange>().unwrap(), DigitRange::digits());
        assert_eq!("1-9".parse::<DigitRange>().unwrap(), DigitRange::manifest());
        assert_eq!("-3-5".parse::<DigitRange>().unwrap(), DigitRange::new(-3, 5).unwrap());

        assert!("9..0".parse::<DigitRange>().is_err());
        assert!("nine".parse::<DigitRange>().is_err());
        assert!("0..5000".parse::<DigitRange>().is_err());
    }

    #[test]
    fn test_range_serde_as_text() {
        let json = serde_json::to_string(&DigitRange::manifest()).unwrap();
        assert_eq!(json, "\"1..=9\"");

        let back: DigitRange = serde_json::from_str("\"0..99\"").unwrap();
        assert_eq!(back.len(), 100);
    }
}
