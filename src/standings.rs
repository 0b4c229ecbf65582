use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fixtures::Fixture;

/// Column labels for rendering a standings table.
pub const TABLE_HEADERS: [&str; 8] = [
    "Team", "Played", "Won", "Draw", "Lost", "GF", "GA", "Points",
];

const WIN_POINTS: u32 = 3;
const DRAW_POINTS: u32 = 1;

/// Aggregated per-team record, derived from the fixture list on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub points: u32,
}

impl StandingsRow {
    fn new(team: &str) -> Self {
        Self {
            team: team.to_string(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for - self.goals_against
    }
}

/// Aggregate a season's fixtures into a ranked table in one pass.
///
/// Every team named by any fixture gets a row, even with nothing played yet.
/// Fixtures without a complete score pair are skipped for the counters.
/// Ordering: points, then goal difference, then goals for (all descending),
/// then team name ascending as the final tie-break.
pub fn calculate_points(fixtures: &[Fixture]) -> Vec<StandingsRow> {
    let mut table: HashMap<String, StandingsRow> = HashMap::new();

    for fixture in fixtures {
        table
            .entry(fixture.home.clone())
            .or_insert_with(|| StandingsRow::new(&fixture.home));
        table
            .entry(fixture.away.clone())
            .or_insert_with(|| StandingsRow::new(&fixture.away));

        let Some((home_goals, away_goals)) = fixture.score() else {
            continue;
        };

        if let Some(home) = table.get_mut(&fixture.home) {
            home.played += 1;
            home.goals_for += home_goals;
            home.goals_against += away_goals;
            match home_goals.cmp(&away_goals) {
                Ordering::Greater => {
                    home.won += 1;
                    home.points += WIN_POINTS;
                }
                Ordering::Equal => {
                    home.drawn += 1;
                    home.points += DRAW_POINTS;
                }
                Ordering::Less => home.lost += 1,
            }
        }
        if let Some(away) = table.get_mut(&fixture.away) {
            away.played += 1;
            away.goals_for += away_goals;
            away.goals_against += home_goals;
            match away_goals.cmp(&home_goals) {
                Ordering::Greater => {
                    away.won += 1;
                    away.points += WIN_POINTS;
                }
                Ordering::Equal => {
                    away.drawn += 1;
                    away.points += DRAW_POINTS;
                }
                Ordering::Less => away.lost += 1,
            }
        }
    }

    let mut rows: Vec<StandingsRow> = table.into_values().collect();
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
            .then_with(|| b.goals_for.cmp(&a.goals_for))
            .then_with(|| a.team.cmp(&b.team))
    });
    rows
}
