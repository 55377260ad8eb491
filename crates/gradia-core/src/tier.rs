//! # Tier Module
//!
//! The profile tier evaluator.
//!
//! A pure projection from a profile record onto a membership level (1-4),
//! with completion percentage, remaining-requirements text, and tier-skip
//! warnings. Recomputed from the current record on every call; nothing
//! here is persisted or cached.

use crate::labels::display_name;
use crate::profile::{ProfileRecord, Section, DEMOGRAPHIC_FIELDS, GENERAL_FIELDS};
use serde::{Deserialize, Serialize};

// =============================================================================
// LEVEL CONSTANTS
// =============================================================================

/// Lowest membership level (any registered identity).
pub const MIN_LEVEL: u8 = 1;

/// Highest membership level (verified, fully-completed profile).
pub const MAX_LEVEL: u8 = 4;

/// Each level is worth 25 percentage points of progress.
pub const PROGRESS_PER_LEVEL: u8 = 25;

// =============================================================================
// REQUIREMENT & WARNING TEXT
// =============================================================================

const GENERAL_HEADER: &str = "Complete your general profile to reach level 2:";
const DEMOGRAPHIC_HEADER: &str = "Complete your demographic profile to reach level 3:";

/// Fixed three-line instruction shown at level 3.
const VERIFICATION_REQUIREMENTS: [&str; 3] = [
    "Verify your identity to reach level 4:",
    "\u{2022} Upload an identification document",
    "\u{2022} Wait for approval from the moderation team",
];

const WARN_LEVEL3_GATE: &str =
    "You must complete level 2 (General Profile) before advancing to level 3.";
const WARN_LEVEL4_GATE: &str =
    "You must complete level 3 (Demographic & Lifestyle) before advancing to level 4.";

// =============================================================================
// TIER RESULT
// =============================================================================

/// Result of evaluating a profile record.
///
/// A read-only projection: derived fresh on every evaluation, never stored.
/// Callers must treat it as advisory UI guidance, not a security gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierResult {
    /// Membership level, 1-4.
    pub level: u8,
    /// Completion percentage; always exactly `25 * level`.
    pub progress: u8,
    /// Human-readable steps to the next level. Empty only at level 4.
    pub next_level_requirements: Vec<String>,
    /// Titles of the sections counted as complete.
    pub completed_sections: Vec<String>,
    /// Titles of the sections still holding the member back.
    pub incomplete_sections: Vec<String>,
    /// Whether the level 3 prerequisites (General Profile) are met.
    pub can_advance_to_level3: bool,
    /// Whether the level 4 prerequisites (General + Demographic) are met.
    pub can_advance_to_level4: bool,
    /// Tier-skip warning, when the member is gated by an earlier level.
    pub warning_message: Option<String>,
}

impl TierResult {
    /// Whether the member has reached the highest level.
    #[must_use]
    pub fn at_max(&self) -> bool {
        self.level == MAX_LEVEL
    }

    /// Format as plain text for terminal output.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("┌─────────────────────────────────────┐\n");
        output.push_str(&format!(
            "│ MEMBERSHIP LEVEL {} — {}% complete\n",
            self.level, self.progress
        ));
        output.push_str(&format!(
            "│ Completed: {}\n",
            self.completed_sections.join(", ")
        ));

        if self.incomplete_sections.is_empty() {
            output.push_str("│ Incomplete: (none)\n");
        } else {
            output.push_str(&format!(
                "│ Incomplete: {}\n",
                self.incomplete_sections.join(", ")
            ));
        }

        if !self.next_level_requirements.is_empty() {
            output.push_str("├─────────────────────────────────────┤\n");
            for line in &self.next_level_requirements {
                output.push_str(&format!("│ {}\n", line));
            }
        }

        if let Some(warning) = &self.warning_message {
            output.push_str("├─────────────────────────────────────┤\n");
            output.push_str(&format!("│ ⚠ {}\n", warning));
        }

        output.push_str("└─────────────────────────────────────┘\n");

        output
    }
}

// =============================================================================
// EVALUATION
// =============================================================================

fn progress_for(level: u8) -> u8 {
    PROGRESS_PER_LEVEL.saturating_mul(level)
}

fn bullet(field: &str) -> String {
    format!("\u{2022} {}", display_name(field))
}

/// Header line plus one bullet per incomplete field.
fn requirement_lines(header: &str, missing: &[&str]) -> Vec<String> {
    let mut lines = Vec::with_capacity(missing.len() + 1);
    if !missing.is_empty() {
        lines.push(header.to_string());
        lines.extend(missing.iter().map(|field| bullet(field)));
    }
    lines
}

fn titles(sections: &[Section]) -> Vec<String> {
    sections.iter().map(|s| s.title().to_string()).collect()
}

/// Evaluate a profile record into a [`TierResult`].
///
/// Total function: missing or malformed fields degrade to "incomplete"
/// rather than raising a fault, and an empty record evaluates to level 1.
///
/// The tier derivation is an ordered decision list; the first matching
/// branch wins. Branch order is load-bearing — each later branch assumes
/// the earlier ones failed, so the level 4 condition must be tested before
/// the level 3 condition.
#[must_use]
pub fn evaluate(record: &ProfileRecord) -> TierResult {
    let general_complete = record.section_complete(&GENERAL_FIELDS);
    let demographic_complete = record.section_complete(&DEMOGRAPHIC_FIELDS);
    let verified = record.is_verified();

    let mut result = if general_complete && demographic_complete && verified {
        // Level 4: everything filled in and identity approved.
        TierResult {
            level: 4,
            progress: progress_for(4),
            next_level_requirements: Vec::new(),
            completed_sections: titles(&[
                Section::Basic,
                Section::General,
                Section::Demographic,
                Section::Verification,
            ]),
            incomplete_sections: Vec::new(),
            can_advance_to_level3: true,
            can_advance_to_level4: true,
            warning_message: None,
        }
    } else if general_complete && demographic_complete {
        // Level 3: profile done, identity review outstanding.
        TierResult {
            level: 3,
            progress: progress_for(3),
            next_level_requirements: VERIFICATION_REQUIREMENTS
                .iter()
                .map(|line| (*line).to_string())
                .collect(),
            completed_sections: titles(&[Section::Basic, Section::General, Section::Demographic]),
            incomplete_sections: titles(&[Section::Verification]),
            can_advance_to_level3: true,
            can_advance_to_level4: true,
            warning_message: None,
        }
    } else if general_complete {
        // Level 2: general profile done, demographic outstanding.
        let missing = record.missing_fields(&DEMOGRAPHIC_FIELDS);
        TierResult {
            level: 2,
            progress: progress_for(2),
            next_level_requirements: requirement_lines(DEMOGRAPHIC_HEADER, &missing),
            completed_sections: titles(&[Section::Basic, Section::General]),
            incomplete_sections: titles(&[Section::Demographic]),
            can_advance_to_level3: true,
            can_advance_to_level4: false,
            warning_message: None,
        }
    } else {
        // Level 1: general profile outstanding.
        let missing = record.missing_fields(&GENERAL_FIELDS);
        let mut incomplete = titles(&[Section::General]);
        if !demographic_complete {
            incomplete.push(Section::Demographic.title().to_string());
        }
        TierResult {
            level: 1,
            progress: progress_for(1),
            next_level_requirements: requirement_lines(GENERAL_HEADER, &missing),
            completed_sections: titles(&[Section::Basic]),
            incomplete_sections: incomplete,
            can_advance_to_level3: false,
            can_advance_to_level4: false,
            warning_message: Some(WARN_LEVEL3_GATE.to_string()),
        }
    };

    // Fill the warning slot only when the branch above left it unset; the
    // level 1 warning always takes precedence.
    if !result.can_advance_to_level4 && result.level < 3 && result.warning_message.is_none() {
        result.warning_message = Some(WARN_LEVEL4_GATE.to_string());
    }

    result
}

// =============================================================================
// TESTS
// =============================================================================
