use serde::{Deserialize, Serialize};

/// A single match between two teams of one season. Either both goals are
/// recorded or neither is; a half-set pair counts as unplayed everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
}

impl Fixture {
    pub fn unplayed(home: &str, away: &str) -> Self {
        Self {
            home: home.to_string(),
            away: away.to_string(),
            home_goals: None,
            away_goals: None,
        }
    }

    /// Final score, only when both halves are present.
    pub fn score(&self) -> Option<(i32, i32)> {
        let (Some(home_goals), Some(away_goals)) = (self.home_goals, self.away_goals) else {
            return None;
        };
        Some((home_goals, away_goals))
    }

    pub fn is_played(&self) -> bool {
        self.score().is_some()
    }
}

/// Collapse a score pair to both-or-none.
pub fn normalize_score_pair(
    home_goals: Option<i32>,
    away_goals: Option<i32>,
) -> (Option<i32>, Option<i32>) {
    match (home_goals, away_goals) {
        (Some(h), Some(a)) => (Some(h), Some(a)),
        _ => (None, None),
    }
}

/// Parse one raw goal field. Empty or non-numeric input reads as unset, the
/// same way the score-entry form discards anything that isn't plain digits.
pub fn parse_goal_field(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<i32>().ok()
}
