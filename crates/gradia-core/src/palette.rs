//! # Palette Module
//!
//! Level -> color token lookups for the presentation layer.
//!
//! These carry no business logic: plain data tables over levels 1-4 with a
//! gray fallback for anything else.

/// Badge color tokens, indexed by level - 1.
const BADGE_COLORS: [&str; 4] = ["gray", "blue", "green", "purple"];

/// Progress bar fill colors, indexed by level - 1.
const PROGRESS_BAR_COLORS: [&str; 4] = ["#9ca3af", "#3b82f6", "#22c55e", "#a855f7"];

fn level_token(table: &'static [&'static str; 4], level: u8) -> &'static str {
    level
        .checked_sub(1)
        .and_then(|index| table.get(usize::from(index)))
        .copied()
        .unwrap_or(table[0])
}

/// Badge color token for a membership level. Total over all `u8` input;
/// anything outside 1-4 gets the neutral gray token.
#[must_use]
pub fn badge_color(level: u8) -> &'static str {
    level_token(&BADGE_COLORS, level)
}

/// Progress bar fill color for a membership level, with the same gray
/// fallback as [`badge_color`].
#[must_use]
pub fn progress_bar_color(level: u8) -> &'static str {
    level_token(&PROGRESS_BAR_COLORS, level)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_colors_for_each_level() {
        assert_eq!(badge_color(1), "gray");
        assert_eq!(badge_color(2), "blue");
        assert_eq!(badge_color(3), "green");
        assert_eq!(badge_color(4), "purple");
    }

    #[test]
    fn progress_bar_colors_for_each_level() {
        assert_eq!(progress_bar_color(1), "#9ca3af");
        assert_eq!(progress_bar_color(2), "#3b82f6");
        assert_eq!(progress_bar_color(3), "#22c55e");
        assert_eq!(progress_bar_color(4), "#a855f7");
    }

    #[test]
    fn out_of_range_levels_fall_back_to_gray() {
        assert_eq!(badge_color(0), "gray");
        assert_eq!(badge_color(5), "gray");
        assert_eq!(badge_color(u8::MAX), "gray");
        assert_eq!(progress_bar_color(0), "#9ca3af");
        assert_eq!(progress_bar_color(200), "#9ca3af");
    }
}
