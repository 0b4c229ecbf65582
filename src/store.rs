use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::fixtures::{Fixture, normalize_score_pair};

const DATA_DIR: &str = "league_desk";

/// One row of the season index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub team_count: usize,
    pub fixture_count: usize,
}

/// A persisted fixture. The id is a storage handle for score updates; the
/// domain itself keys teams by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFixture {
    pub id: i64,
    pub home: String,
    pub away: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
}

impl StoredFixture {
    pub fn as_fixture(&self) -> Fixture {
        let (home_goals, away_goals) = normalize_score_pair(self.home_goals, self.away_goals);
        Fixture {
            home: self.home.clone(),
            away: self.away.clone(),
            home_goals,
            away_goals,
        }
    }
}

/// One score write, keyed by the stored fixture id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub fixture_id: i64,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
}

impl ScoreUpdate {
    /// The same update with the pair collapsed to both-or-none.
    pub fn normalized(self) -> Self {
        let (home_goals, away_goals) = normalize_score_pair(self.home_goals, self.away_goals);
        Self {
            fixture_id: self.fixture_id,
            home_goals,
            away_goals,
        }
    }
}

/// Persistence seam for seasons and their fixtures. A season owns its teams
/// and fixtures outright; deleting it removes everything transitively.
pub trait SeasonStore {
    fn list_seasons(&self) -> Result<Vec<SeasonSummary>>;

    /// Persist a new season with its team list and pre-generated fixtures.
    /// Fails on a duplicate season name.
    fn create_season(
        &mut self,
        name: &str,
        teams: &[String],
        fixtures: &[Fixture],
    ) -> Result<i64>;

    /// Full fixture list in creation order. Unknown seasons read as empty.
    fn load_fixtures(&self, season_id: i64) -> Result<Vec<StoredFixture>>;

    /// Batch score write. Updates naming a fixture id the season does not
    /// hold are ignored; the entry form round-trips the stored rows, so a
    /// mismatch is stale input rather than a caller bug.
    fn save_fixture_scores(&mut self, season_id: i64, updates: &[ScoreUpdate]) -> Result<()>;

    fn delete_season(&mut self, season_id: i64) -> Result<()>;
}

/// Where the on-disk backends keep their data unless told otherwise.
pub fn default_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("LEAGUE_DATA_DIR") {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    if let Ok(base) = std::env::var("XDG_DATA_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR),
    )
}
