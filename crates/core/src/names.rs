//! Tithi name canonicalization.
//!
//! The upstream almanac prefixes every tithi with its paksha, including the
//! full- and new-moon tithis that are unambiguous on their own; the computed
//! dataset uses the bare canonical names for those two. Collapsing the four
//! prefixed labels lets the two vocabularies line up.

/// Canonical form of a tithi label. Identity for every other name.
pub fn canonical_name(name: &str) -> &str {
    match name {
        "Shukla Purnima" | "Krishna Purnima" => "Purnima",
        "Shukla Amavasya" | "Krishna Amavasya" => "Amavasya",
        other => other,
    }
}
