//! Deterministic fixtures for reproducible tests

use gradebook_types::app::{AccountId, ScoreInput, StudentText};

/// A signer identity whose 32 bytes all equal `n`.
pub fn signer(n: u8) -> AccountId {
    AccountId([n; 32])
}

/// A student text identifier built from a short literal.
///
/// # Panics
/// Panics if `text` is longer than 32 bytes.
pub fn student_text(text: &str) -> StudentText {
    match text.parse() {
        Ok(t) => t,
        Err(e) => panic!("fixture student text '{}': {}", text, e),
    }
}

/// Already-scaled scores in field order.
pub fn scores(raw: [i64; 5]) -> ScoreInput {
    ScoreInput::new(raw)
}

/// The scores `[3, 4, 5, 6, 7]` used by most scenarios.
pub fn sample_scores() -> ScoreInput {
    scores([3, 4, 5, 6, 7])
}

/// The rows of a small bulk import, as `(student text, activity, decimal scores)`.
pub fn import_rows() -> Vec<(&'static str, u64, [f64; 5])> {
    vec![
        ("abc123", 7, [0.3, 0.4, 0.5, 0.6, 0.7]),
        ("xyz789", 1, [3.6, 3.8, 1.5, 5.6, 8.4]),
        ("abc123", 2, [6.4, 9.4, 5.3, 6.1, 7.1]),
    ]
}
