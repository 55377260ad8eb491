//! # Completion Module
//!
//! Competition records and the status completion sweep.
//!
//! The sweep is the pure half of the platform's scheduled job: every
//! competition whose end date has passed and whose status is not already
//! terminal transitions to `Completed`. Idempotent; re-running on the same
//! date changes nothing. Scheduling itself lives outside the core.

use crate::{CompetitionId, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// CALENDAR DATE
// =============================================================================

/// A calendar date in ISO-8601 `YYYY-MM-DD` form.
///
/// Kept as its validated string form: ISO dates order correctly under
/// lexicographic comparison, which keeps the sweep free of calendar
/// arithmetic and the core free of clock dependencies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(String);

impl Date {
    /// Parse and validate a `YYYY-MM-DD` string.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let bytes = input.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
        if !shape_ok {
            return Err(Error::InvalidDate(input.to_string()));
        }

        let month = (bytes[5] - b'0') * 10 + (bytes[6] - b'0');
        let day = (bytes[8] - b'0') * 10 + (bytes[9] - b'0');
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(Error::InvalidDate(input.to_string()));
        }

        Ok(Self(input.to_string()))
    }

    /// The underlying `YYYY-MM-DD` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// COMPETITION RECORDS
// =============================================================================

/// Lifecycle status of a listed competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionStatus {
    /// Created by a business client, not yet published.
    Draft,
    /// Published and open for entries.
    Active,
    /// Past its end date.
    Completed,
    /// Withdrawn by the client or an admin.
    Cancelled,
}

impl CompetitionStatus {
    /// Terminal statuses are never touched by the sweep.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A listed competition, as the sweep sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub title: String,
    pub end_date: Date,
    pub status: CompetitionStatus,
}

impl Competition {
    /// Create a new competition record.
    #[must_use]
    pub fn new(
        id: CompetitionId,
        title: impl Into<String>,
        end_date: Date,
        status: CompetitionStatus,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            end_date,
            status,
        }
    }
}

// =============================================================================
// COMPLETION SWEEP
// =============================================================================

/// Outcome of one completion sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// Competitions transitioned to `Completed` by this sweep.
    pub completed: Vec<CompetitionId>,
    /// Competitions examined and left untouched.
    pub unchanged: usize,
}

impl SweepOutcome {
    /// Whether the sweep changed anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.completed.is_empty()
    }
}

/// Mark every competition with `end_date <= today` as completed, unless
/// its status is already terminal.
pub fn sweep_competitions(
    competitions: &mut BTreeMap<CompetitionId, Competition>,
    today: &Date,
) -> SweepOutcome {
    let mut outcome = SweepOutcome::default();

    for (id, competition) in competitions.iter_mut() {
        if !competition.status.is_terminal() && competition.end_date <= *today {
            competition.status = CompetitionStatus::Completed;
            outcome.completed.push(*id);
        } else {
            outcome.unchanged += 1;
        }
    }

    outcome
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Date {
        Date::parse(s).expect("valid date")
    }

    fn competitions() -> BTreeMap<CompetitionId, Competition> {
        let mut map = BTreeMap::new();
        for (id, end, status) in [
            (1, "2026-01-31", CompetitionStatus::Active),
            (2, "2026-06-30", CompetitionStatus::Active),
            (3, "2026-01-15", CompetitionStatus::Cancelled),
            (4, "2026-02-01", CompetitionStatus::Draft),
        ] {
            let competition = Competition::new(
                CompetitionId(id),
                format!("competition {id}"),
                date(end),
                status,
            );
            map.insert(competition.id, competition);
        }
        map
    }

    #[test]
    fn date_parse_accepts_iso() {
        assert!(Date::parse("2026-08-06").is_ok());
        assert!(Date::parse("1999-12-31").is_ok());
    }

    #[test]
    fn date_parse_rejects_malformed() {
        for bad in ["2026/08/06", "2026-8-6", "20260806", "2026-13-01", "2026-00-10", "2026-01-32", ""] {
            assert!(Date::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn dates_order_lexicographically() {
        assert!(date("2026-01-31") < date("2026-02-01"));
        assert!(date("2025-12-31") < date("2026-01-01"));
        assert!(date("2026-08-06") <= date("2026-08-06"));
    }

    #[test]
    fn sweep_completes_past_competitions() {
        let mut map = competitions();
        let outcome = sweep_competitions(&mut map, &date("2026-02-01"));

        // 1 ended, 4 ends today; 2 is in the future, 3 is cancelled.
        assert_eq!(outcome.completed, vec![CompetitionId(1), CompetitionId(4)]);
        assert_eq!(outcome.unchanged, 2);
        assert_eq!(
            map.get(&CompetitionId(1)).map(|c| c.status),
            Some(CompetitionStatus::Completed)
        );
        assert_eq!(
            map.get(&CompetitionId(3)).map(|c| c.status),
            Some(CompetitionStatus::Cancelled),
            "cancelled competitions stay cancelled"
        );
        assert_eq!(
            map.get(&CompetitionId(2)).map(|c| c.status),
            Some(CompetitionStatus::Active)
        );
    }

    #[test]
    fn sweep_is_idempotent() {
        let mut map = competitions();
        let today = date("2026-02-01");

        let first = sweep_competitions(&mut map, &today);
        assert!(!first.is_noop());

        let second = sweep_competitions(&mut map, &today);
        assert!(second.is_noop());
        assert_eq!(second.unchanged, map.len());
    }

    #[test]
    fn sweep_on_empty_map_is_noop() {
        let mut map = BTreeMap::new();
        let outcome = sweep_competitions(&mut map, &date("2026-02-01"));
        assert!(outcome.is_noop());
        assert_eq!(outcome.unchanged, 0);
    }
}
