// 🚪 Gateway Classification - Rules as Data
// Narrative labels for digit pairs, each one an independent predicate

use crate::harmonic::{harmonic, in_vortex, is_axis};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// GATEWAY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    /// Either side is zero
    VoidGateway,

    /// Both sides are the same digit
    MirrorGate,

    /// Either side sits on the 3-6-9 axis
    AxisHarmony,

    /// The pair reduces to 9
    CompletionGate,

    /// Both sides are on the doubling circuit
    VortexFlow,

    /// The pair sums to exactly 9
    Polarity,
}

impl GatewayKind {
    pub const ALL: [GatewayKind; 6] = [
        GatewayKind::VoidGateway,
        GatewayKind::MirrorGate,
        GatewayKind::AxisHarmony,
        GatewayKind::CompletionGate,
        GatewayKind::VortexFlow,
        GatewayKind::Polarity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GatewayKind::VoidGateway => "void gateway",
            GatewayKind::MirrorGate => "mirror gate",
            GatewayKind::AxisHarmony => "axis harmony",
            GatewayKind::CompletionGate => "completion gate",
            GatewayKind::VortexFlow => "vortex flow",
            GatewayKind::Polarity => "polarity",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GatewayKind::VoidGateway => "One side of the pair passes through zero",
            GatewayKind::MirrorGate => "The pair reflects a single digit",
            GatewayKind::AxisHarmony => "The pair touches the 3-6-9 axis",
            GatewayKind::CompletionGate => "The pair resolves to 9",
            GatewayKind::VortexFlow => "Both digits ride the 1-2-4-8-7-5 circuit",
            GatewayKind::Polarity => "The digits are complements summing to 9",
        }
    }
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// GATEWAY RULE
// ============================================================================

#[derive(Clone)]
pub struct GatewayRule {
    pub kind: GatewayKind,
    predicate: fn(i64, i64) -> bool,
}

impl GatewayRule {
    pub fn new(kind: GatewayKind, predicate: fn(i64, i64) -> bool) -> Self {
        GatewayRule { kind, predicate }
    }

    pub fn matches(&self, a: i64, b: i64) -> bool {
        (self.predicate)(a, b)
    }
}

impl fmt::Debug for GatewayRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayRule").field("kind", &self.kind).finish()
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone)]
pub struct GatewayClassifier {
    rules: Vec<GatewayRule>,
}

impl GatewayClassifier {
    /// Classifier with the six standard gateways
    pub fn new() -> Self {
        GatewayClassifier::from_rules(vec![
            GatewayRule::new(GatewayKind::VoidGateway, |a, b| a == 0 || b == 0),
            GatewayRule::new(GatewayKind::MirrorGate, |a, b| a == b),
            GatewayRule::new(GatewayKind::AxisHarmony, |a, b| is_axis(a) || is_axis(b)),
            GatewayRule::new(GatewayKind::CompletionGate, |a, b| harmonic(a, b) == 9),
            GatewayRule::new(GatewayKind::VortexFlow, |a, b| in_vortex(a) && in_vortex(b)),
            GatewayRule::new(GatewayKind::Polarity, |a, b| a.checked_add(b) == Some(9)),
        ])
    }

    pub fn empty() -> Self {
        GatewayClassifier { rules: Vec::new() }
    }

    pub fn from_rules(rules: Vec<GatewayRule>) -> Self {
        GatewayClassifier { rules }
    }

    pub fn add_rule(&mut self, rule: GatewayRule) {
        self.rules.push(rule);
    }

    /// Every matching gateway, in rule order. Rules don't short-circuit.
    pub fn classify(&self, a: i64, b: i64) -> Vec<GatewayKind> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(a, b))
            .map(|rule| rule.kind)
            .collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for GatewayClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_pair_matches_several_gateways() {
        let classifier = GatewayClassifier::new();
        let gates = classifier.classify(0, 0);

        assert_eq!(
            gates,
            vec![
                GatewayKind::VoidGateway,
                GatewayKind::MirrorGate,
                GatewayKind::CompletionGate,
            ]
        );
    }

    #[test]
    fn test_axis_complements() {
        let gates = GatewayClassifier::new().classify(3, 6);

        assert!(gates.contains(&GatewayKind::AxisHarmony));
        assert!(gates.contains(&GatewayKind::CompletionGate));
        assert!(gates.contains(&GatewayKind::Polarity));
        assert!(!gates.contains(&GatewayKind::VortexFlow));
    }

    #[test]
    fn test_vortex_pair() {
        let gates = GatewayClassifier::new().classify(1, 2);
        assert_eq!(gates, vec![GatewayKind::VortexFlow]);

        let gates = GatewayClassifier::new().classify(4, 5);
        assert_eq!(
            gates,
            vec![
                GatewayKind::CompletionGate,
                GatewayKind::VortexFlow,
                GatewayKind::Polarity,
            ]
        );
    }

    #[test]
    fn test_empty_classifier() {
        let classifier = GatewayClassifier::empty();
        assert_eq!(classifier.rule_count(), 0);
        assert!(classifier.classify(0, 0).is_empty());
    }

    #[test]
    fn test_custom_rule() {
        let mut classifier = GatewayClassifier::empty();
        classifier.add_rule(GatewayRule::new(GatewayKind::MirrorGate, |a, b| a == b));

        assert_eq!(classifier.classify(7, 7), vec![GatewayKind::MirrorGate]);
        assert!(classifier.classify(7, 8).is_empty());
    }

    #[test]
    fn test_labels() {
        assert_eq!(GatewayKind::VoidGateway.to_string(), "void gateway");
        assert_eq!(GatewayKind::AxisHarmony.label(), "axis harmony");
        assert_eq!(GatewayKind::ALL.len(), 6);
    }
}
