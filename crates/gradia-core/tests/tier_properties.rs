//! Property tests for the tier evaluator.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use gradia_core::profile::{DEMOGRAPHIC_FIELDS, GENERAL_FIELDS, VERIFICATION_FIELD};
use gradia_core::{evaluate, FieldValue, ProfileRecord, MAX_LEVEL, MIN_LEVEL};
use proptest::prelude::*;

/// Any combination of filled/blank section fields plus a verification
/// outcome. Blank fields are randomly absent, null, or empty strings -
/// all three must behave identically.
fn arbitrary_record() -> impl Strategy<Value = ProfileRecord> {
    let general = proptest::collection::vec(0u8..3, GENERAL_FIELDS.len());
    let demographic = proptest::collection::vec(0u8..3, DEMOGRAPHIC_FIELDS.len());
    let verification = prop_oneof![
        Just(None),
        Just(Some("approved")),
        Just(Some("pending")),
        Just(Some("rejected")),
    ];

    (general, demographic, verification).prop_map(|(general, demographic, verification)| {
        let mut record = ProfileRecord::new();
        for (field, state) in GENERAL_FIELDS.iter().zip(&general) {
            apply_state(&mut record, field, *state);
        }
        for (field, state) in DEMOGRAPHIC_FIELDS.iter().zip(&demographic) {
            apply_state(&mut record, field, *state);
        }
        if let Some(status) = verification {
            record.set(VERIFICATION_FIELD, FieldValue::text(status));
        }
        record
    })
}

fn apply_state(record: &mut ProfileRecord, field: &str, state: u8) {
    match state {
        0 => {} // absent
        1 => record.set(field, FieldValue::Null),
        _ => record.set(field, FieldValue::text("x")),
    }
}

proptest! {
    #[test]
    fn level_is_always_in_range(record in arbitrary_record()) {
        let result = evaluate(&record);
        prop_assert!((MIN_LEVEL..=MAX_LEVEL).contains(&result.level));
    }

    #[test]
    fn progress_is_exactly_25_times_level(record in arbitrary_record()) {
        let result = evaluate(&record);
        prop_assert_eq!(result.progress, result.level * 25);
    }

    #[test]
    fn requirements_empty_only_at_max_level(record in arbitrary_record()) {
        let result = evaluate(&record);
        prop_assert_eq!(
            result.next_level_requirements.is_empty(),
            result.level == MAX_LEVEL
        );
    }

    #[test]
    fn evaluation_is_idempotent(record in arbitrary_record()) {
        prop_assert_eq!(evaluate(&record), evaluate(&record));
    }

    #[test]
    fn completing_a_field_never_lowers_level(record in arbitrary_record()) {
        let before = evaluate(&record).level;
        for field in GENERAL_FIELDS.iter().chain(DEMOGRAPHIC_FIELDS.iter()) {
            if !record.field_complete(field) {
                let mut improved = record.clone();
                improved.set(*field, FieldValue::text("x"));
                prop_assert!(evaluate(&improved).level >= before);
            }
        }
    }

    #[test]
    fn advance_flags_are_monotonic(record in arbitrary_record()) {
        // Level 4 prerequisites imply level 3 prerequisites.
        let result = evaluate(&record);
        if result.can_advance_to_level4 {
            prop_assert!(result.can_advance_to_level3);
        }
    }

    #[test]
    fn warning_absent_at_level_three_and_above(record in arbitrary_record()) {
        let result = evaluate(&record);
        if result.level >= 3 {
            prop_assert!(result.warning_message.is_none());
        } else {
            prop_assert!(result.warning_message.is_some());
        }
    }

    #[test]
    fn sections_never_overlap(record in arbitrary_record()) {
        let result = evaluate(&record);
        for section in &result.completed_sections {
            prop_assert!(!result.incomplete_sections.contains(section));
        }
    }
}
