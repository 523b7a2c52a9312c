// 🏛️ Archetypes - Fixed display labels for digits 0-9
//
// The table is a constant. Lookups never fail: a digit outside the table
// is labelled with its own decimal text.

use crate::harmonic::Digit;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Archetype {
    pub digit: u8,
    pub name: &'static str,
    pub meaning: &'static str,
}

const fn entry(digit: u8, name: &'static str, meaning: &'static str) -> Archetype {
    Archetype { digit, name, meaning }
}

/// Indexed by digit
pub static ARCHETYPES: [Archetype; 10] = [
    entry(0, "Void", "Potential, emptiness, source"),
    entry(1, "Unity", "Beginning, will, individuality"),
    entry(2, "Duality", "Balance, partnership, polarity"),
    entry(3, "Resonance", "Creation, harmony, trinity"),
    entry(4, "Foundation", "Structure, stability, order"),
    entry(5, "Flux", "Change, freedom, movement"),
    entry(6, "Equilibrium", "Care, responsibility, proportion"),
    entry(7, "Mystery", "Introspection, wisdom, seeking"),
    entry(8, "Infinity", "Power, abundance, cycles"),
    entry(9, "Completion", "Wholeness, return, fulfillment"),
];

/// Archetype for a digit in [0, 9]
pub fn archetype(digit: i64) -> Option<&'static Archetype> {
    Digit::new(digit).map(|d| &ARCHETYPES[d.value() as usize])
}

/// Display name, falling back to the digit itself
pub fn archetype_name(digit: i64) -> String {
    match archetype(digit) {
        Some(a) => a.name.to_string(),
        None => digit.to_string(),
    }
}

/// Meaning text, with the same fallback as [`archetype_name`]
pub fn archetype_meaning(digit: i64) -> String {
    match archetype(digit) {
        Some(a) => a.meaning.to_string(),
        None => digit.to_string(),
    }
}

pub fn archetypes() -> &'static [Archetype] {
    &ARCHETYPES
}

/// Owned view of a lookup, defined for every integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchetypeLabel {
    pub digit: i64,
    pub name: String,
    pub meaning: String,
}

/// Total lookup: the table entry, or the digit's own text for name and meaning
pub fn describe(digit: i64) -> ArchetypeLabel {
    ArchetypeLabel {
        digit,
        name: archetype_name(digit),
        meaning: archetype_meaning(digit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resonance_is_stable() {
        for _ in 0..3 {
            let a = archetype(3).unwrap();
            assert_eq!(a.name, "Resonance");
            assert_eq!(a.meaning, "Creation, harmony, trinity");
        }
    }

    #[test]
    fn test_table_is_indexed_by_digit() {
        for (i, a) in archetypes().iter().enumerate() {
            assert_eq!(a.digit as usize, i);
        }
        assert_eq!(archetypes().len(), 10);
    }

    #[test]
    fn test_out_of_range_falls_back_to_digit() {
        assert!(archetype(10).is_none());
        assert_eq!(archetype_name(10), "10");
        assert_eq!(archetype_name(-4), "-4");
        assert_eq!(archetype_meaning(42), "42");
    }

    #[test]
    fn test_describe_is_total() {
        let known = describe(3);
        assert_eq!(known.name, "Resonance");
        assert_eq!(known.meaning, "Creation, harmony, trinity");

        let outside = describe(12);
        assert_eq!(outside.digit, 12);
        assert_eq!(outside.name, "12");
        assert_eq!(outside.meaning, "12");
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = archetypes().iter().map(|a| a.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 10);
    }
}
