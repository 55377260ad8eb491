//! # Labels Module
//!
//! Field-name to display-name mapping for requirement bullets.
//!
//! A fixed data table with a generic fallback, so new profile fields get a
//! readable label without touching this file.

// =============================================================================
// DISPLAY NAME TABLE
// =============================================================================

/// Fixed internal-name -> human-label table.
const DISPLAY_NAMES: [(&str, &str); 18] = [
    ("nickname", "Nickname"),
    ("email", "Email"),
    ("first_name", "First Name"),
    ("last_name", "Last Name"),
    ("gender", "Gender"),
    ("date_of_birth", "Date of Birth"),
    ("postcode", "Postcode"),
    ("interests", "Interests"),
    ("hobbies", "Hobbies"),
    ("occupation", "Occupation"),
    ("marital_status", "Marital Status"),
    ("income_range", "Income Range"),
    ("education", "Education"),
    ("ethnicity", "Ethnicity"),
    ("languages_spoken", "Languages Spoken"),
    ("home_ownership", "Home Ownership"),
    ("vehicle_ownership", "Vehicle Ownership"),
    ("pet_ownership", "Pet Ownership"),
];

/// Human label for an internal field name.
///
/// Fields absent from the table fall back to capitalizing the first letter
/// and replacing underscores with spaces.
#[must_use]
pub fn display_name(field: &str) -> String {
    DISPLAY_NAMES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| fallback_name(field))
}

fn fallback_name(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_fields_use_table() {
        assert_eq!(display_name("first_name"), "First Name");
        assert_eq!(display_name("date_of_birth"), "Date of Birth");
        assert_eq!(display_name("languages_spoken"), "Languages Spoken");
    }

    #[test]
    fn unmapped_fields_fall_back() {
        assert_eq!(display_name("shoe_size"), "Shoe size");
        assert_eq!(display_name("favourite_team_name"), "Favourite team name");
    }

    #[test]
    fn fallback_handles_single_word() {
        assert_eq!(display_name("biography"), "Biography");
    }

    #[test]
    fn fallback_handles_empty_name() {
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn table_covers_every_section_field() {
        use crate::profile::{BASIC_FIELDS, DEMOGRAPHIC_FIELDS, GENERAL_FIELDS};

        for field in BASIC_FIELDS
            .iter()
            .chain(GENERAL_FIELDS.iter())
            .chain(DEMOGRAPHIC_FIELDS.iter())
        {
            assert!(
                DISPLAY_NAMES.iter().any(|(name, _)| name == field),
                "no display name for {field}"
            );
        }
    }
}
