//! # Directory Module
//!
//! In-memory member directory: the app-local stand-in for the platform's
//! profile store.
//!
//! Holds profile records and competition listings in deterministic
//! `BTreeMap`s, applies field signals, and answers tier evaluations and
//! census queries over its members.

use crate::completion::{sweep_competitions, Competition, Date, SweepOutcome};
use crate::profile::{FieldValue, ProfileRecord};
use crate::tier::{evaluate, TierResult, MAX_LEVEL, MIN_LEVEL};
use crate::{CompetitionId, MemberId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// FIELD SIGNAL
// =============================================================================

/// One field write for a member profile.
///
/// Signals follow the [Member | Field | Value] shape used by every ingest
/// surface (CLI files and the HTTP API alike).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSignal {
    pub member_id: MemberId,
    pub field: String,
    pub value: FieldValue,
}

impl FieldSignal {
    /// Create a new field signal.
    #[must_use]
    pub fn new(member_id: MemberId, field: impl Into<String>, value: FieldValue) -> Self {
        Self {
            member_id,
            field: field.into(),
            value,
        }
    }
}

// =============================================================================
// TIER CENSUS
// =============================================================================

/// Member counts per membership level, for status reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCensus {
    /// Counts for levels 1 through 4, at indices 0 through 3.
    pub members_at_level: [usize; 4],
}

impl TierCensus {
    /// Record one member at the given level. Out-of-range levels are
    /// ignored; `evaluate` never produces one.
    pub fn record(&mut self, level: u8) {
        if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            if let Some(slot) = self.members_at_level.get_mut(usize::from(level - 1)) {
                *slot += 1;
            }
        }
    }

    /// Member count at one level (0 for out-of-range input).
    #[must_use]
    pub fn at_level(&self, level: u8) -> usize {
        level
            .checked_sub(1)
            .and_then(|index| self.members_at_level.get(usize::from(index)))
            .copied()
            .unwrap_or(0)
    }

    /// Total members counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.members_at_level.iter().sum()
    }
}

// =============================================================================
// DIRECTORY
// =============================================================================

/// The member directory: profiles plus competition listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    profiles: BTreeMap<MemberId, ProfileRecord>,
    competitions: BTreeMap<CompetitionId, Competition>,
}

impl Directory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Profiles
    // -------------------------------------------------------------------------

    /// Apply one field signal, creating the member's record if needed.
    pub fn apply(&mut self, signal: &FieldSignal) {
        self.profiles
            .entry(signal.member_id)
            .or_default()
            .set(signal.field.clone(), signal.value.clone());
    }

    /// Apply a batch of field signals in order.
    pub fn ingest_sequence(&mut self, signals: &[FieldSignal]) {
        for signal in signals {
            self.apply(signal);
        }
    }

    /// Insert or replace a whole profile record.
    pub fn upsert_profile(&mut self, member_id: MemberId, record: ProfileRecord) {
        self.profiles.insert(member_id, record);
    }

    /// Look up a member's record.
    #[must_use]
    pub fn profile(&self, member_id: MemberId) -> Option<&ProfileRecord> {
        self.profiles.get(&member_id)
    }

    /// Number of members with a record.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.profiles.len()
    }

    /// All members in deterministic id order.
    pub fn members(&self) -> impl Iterator<Item = (&MemberId, &ProfileRecord)> {
        self.profiles.iter()
    }

    // -------------------------------------------------------------------------
    // Competitions
    // -------------------------------------------------------------------------

    /// Insert or replace a competition listing.
    pub fn insert_competition(&mut self, competition: Competition) {
        self.competitions.insert(competition.id, competition);
    }

    /// Look up a competition.
    #[must_use]
    pub fn competition(&self, id: CompetitionId) -> Option<&Competition> {
        self.competitions.get(&id)
    }

    /// Number of competition listings.
    #[must_use]
    pub fn competition_count(&self) -> usize {
        self.competitions.len()
    }

    /// All competitions in deterministic id order.
    pub fn competitions(&self) -> impl Iterator<Item = (&CompetitionId, &Competition)> {
        self.competitions.iter()
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Evaluate one member's current tier. `None` for unknown members.
    #[must_use]
    pub fn evaluate_member(&self, member_id: MemberId) -> Option<TierResult> {
        self.profiles.get(&member_id).map(evaluate)
    }

    /// Member counts per level across the whole directory.
    #[must_use]
    pub fn tier_census(&self) -> TierCensus {
        let mut census = TierCensus::default();
        for record in self.profiles.values() {
            census.record(evaluate(record).level);
        }
        census
    }

    /// Run the competition completion sweep for the given date.
    pub fn sweep(&mut self, today: &Date) -> SweepOutcome {
        sweep_competitions(&mut self.competitions, today)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompetitionStatus;
    use crate::profile::GENERAL_FIELDS;

    fn general_signals(member: u64) -> Vec<FieldSignal> {
        GENERAL_FIELDS
            .iter()
            .map(|field| FieldSignal::new(MemberId(member), *field, FieldValue::text("x")))
            .collect()
    }

    #[test]
    fn apply_creates_member_record() {
        let mut directory = Directory::new();
        directory.apply(&FieldSignal::new(
            MemberId(7),
            "first_name",
            FieldValue::text("Alice"),
        ));

        assert_eq!(directory.member_count(), 1);
        assert!(directory.profile(MemberId(7)).is_some());
    }

    #[test]
    fn ingest_sequence_applies_in_order() {
        let mut directory = Directory::new();
        let mut signals = general_signals(1);
        // Later signal for the same field wins.
        signals.push(FieldSignal::new(
            MemberId(1),
            "first_name",
            FieldValue::text("Beatriz"),
        ));
        directory.ingest_sequence(&signals);

        let record = directory.profile(MemberId(1)).expect("record");
        assert_eq!(record.get("first_name"), Some(&FieldValue::text("Beatriz")));
    }

    #[test]
    fn evaluate_member_unknown_is_none() {
        let directory = Directory::new();
        assert!(directory.evaluate_member(MemberId(99)).is_none());
    }

    #[test]
    fn evaluate_member_reflects_signals() {
        let mut directory = Directory::new();
        directory.ingest_sequence(&general_signals(1));

        let result = directory.evaluate_member(MemberId(1)).expect("result");
        assert_eq!(result.level, 2);
    }

    #[test]
    fn census_counts_levels() {
        let mut directory = Directory::new();
        // Member 1 reaches level 2, member 2 stays at level 1.
        directory.ingest_sequence(&general_signals(1));
        directory.apply(&FieldSignal::new(
            MemberId(2),
            "first_name",
            FieldValue::text("Bob"),
        ));

        let census = directory.tier_census();
        assert_eq!(census.at_level(1), 1);
        assert_eq!(census.at_level(2), 1);
        assert_eq!(census.at_level(3), 0);
        assert_eq!(census.total(), 2);
    }

    #[test]
    fn census_ignores_out_of_range_levels() {
        let mut census = TierCensus::default();
        census.record(0);
        census.record(5);
        assert_eq!(census.total(), 0);
        assert_eq!(census.at_level(0), 0);
        assert_eq!(census.at_level(9), 0);
    }

    #[test]
    fn sweep_updates_stored_competitions() {
        let mut directory = Directory::new();
        directory.insert_competition(Competition::new(
            CompetitionId(1),
            "spring raffle",
            Date::parse("2026-01-31").expect("date"),
            CompetitionStatus::Active,
        ));

        let outcome = directory.sweep(&Date::parse("2026-02-01").expect("date"));
        assert_eq!(outcome.completed, vec![CompetitionId(1)]);
        assert_eq!(
            directory.competition(CompetitionId(1)).map(|c| c.status),
            Some(CompetitionStatus::Completed)
        );
    }
}
