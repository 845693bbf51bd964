//! `proptest` strategies for ledger inputs

use gradebook_types::app::{AccountId, ScoreInput, StudentText, STUDENT_TEXT_LEN};
use proptest::prelude::*;

/// Any 32-byte caller identity.
pub fn arb_account() -> impl Strategy<Value = AccountId> {
    any::<[u8; 32]>().prop_map(AccountId)
}

/// A non-empty student text of up to 32 bytes with no trailing zero.
pub fn arb_student_text() -> impl Strategy<Value = StudentText> {
    proptest::collection::vec(1u8..=255, 1..=STUDENT_TEXT_LEN).prop_filter_map(
        "text must fit the fixed width",
        |bytes| StudentText::from_bytes(&bytes).ok(),
    )
}

/// Scores that all fit the stored byte range.
pub fn arb_valid_scores() -> impl Strategy<Value = ScoreInput> {
    proptest::array::uniform5(0i64..=255).prop_map(ScoreInput::new)
}

/// Scores where at least one field falls outside the stored byte range.
pub fn arb_invalid_scores() -> impl Strategy<Value = ScoreInput> {
    let out_of_range = prop_oneof![i64::MIN..0i64, 256i64..=i64::MAX];
    (arb_valid_scores(), 0usize..5, out_of_range).prop_map(|(valid, field, bad)| {
        let mut raw = [
            valid.complexity,
            valid.effort,
            valid.weight,
            valid.points,
            valid.weighted_points,
        ];
        if let Some(slot) = raw.get_mut(field) {
            *slot = bad;
        }
        ScoreInput::new(raw)
    })
}
