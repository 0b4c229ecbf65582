use std::collections::HashSet;

use thiserror::Error;

use crate::auth::AuthContext;
use crate::schedule::generate_fixtures;
use crate::standings::{StandingsRow, calculate_points};
use crate::store::{ScoreUpdate, SeasonStore, SeasonSummary, StoredFixture};

#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("season name must not be empty")]
    EmptySeasonName,
    #[error("a season needs at least two teams, got {0}")]
    NotEnoughTeams(usize),
    #[error("duplicate team name: {0}")]
    DuplicateTeam(String),
    #[error("season already exists: {0}")]
    SeasonExists(String),
    #[error("no such season: {0}")]
    SeasonNotFound(i64),
    #[error("admin access required")]
    AdminRequired,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Season lifecycle over any [`SeasonStore`]: the validation and composition
/// that sits between request handlers and persistence. Mutations require an
/// admin context; reads are open.
pub struct LeagueService<S: SeasonStore> {
    store: S,
}

impl<S: SeasonStore> LeagueService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn seasons(&self) -> Result<Vec<SeasonSummary>, LeagueError> {
        Ok(self.store.list_seasons()?)
    }

    /// Validate the inputs, generate the double round-robin and persist the
    /// whole season. Team names are trimmed and empty entries dropped before
    /// any rule applies, the way the original entry form behaved.
    pub fn create_season(
        &mut self,
        auth: &AuthContext,
        name: &str,
        team_names: &[String],
    ) -> Result<i64, LeagueError> {
        require_admin(auth)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::EmptySeasonName);
        }

        let teams: Vec<String> = team_names
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if teams.len() < 2 {
            return Err(LeagueError::NotEnoughTeams(teams.len()));
        }
        let mut seen = HashSet::new();
        for team in &teams {
            if !seen.insert(team.as_str()) {
                return Err(LeagueError::DuplicateTeam(team.clone()));
            }
        }

        if self.store.list_seasons()?.iter().any(|s| s.name == name) {
            return Err(LeagueError::SeasonExists(name.to_string()));
        }

        let fixtures = generate_fixtures(&teams);
        Ok(self.store.create_season(name, &teams, &fixtures)?)
    }

    /// Raw fixture list for the score-entry form.
    pub fn fixtures(&self, season_id: i64) -> Result<Vec<StoredFixture>, LeagueError> {
        self.require_season(season_id)?;
        Ok(self.store.load_fixtures(season_id)?)
    }

    /// Batch score write. Each pair collapses to both-or-none before it is
    /// persisted, so a half-filled form row leaves its fixture unplayed.
    pub fn record_scores(
        &mut self,
        auth: &AuthContext,
        season_id: i64,
        updates: &[ScoreUpdate],
    ) -> Result<(), LeagueError> {
        require_admin(auth)?;
        self.require_season(season_id)?;
        let updates: Vec<ScoreUpdate> = updates.iter().map(|u| u.normalized()).collect();
        Ok(self.store.save_fixture_scores(season_id, &updates)?)
    }

    /// Recompute the table from the authoritative fixture list.
    pub fn standings(&self, season_id: i64) -> Result<Vec<StandingsRow>, LeagueError> {
        self.require_season(season_id)?;
        let fixtures: Vec<_> = self
            .store
            .load_fixtures(season_id)?
            .iter()
            .map(StoredFixture::as_fixture)
            .collect();
        Ok(calculate_points(&fixtures))
    }

    pub fn delete_season(
        &mut self,
        auth: &AuthContext,
        season_id: i64,
    ) -> Result<(), LeagueError> {
        require_admin(auth)?;
        self.require_season(season_id)?;
        Ok(self.store.delete_season(season_id)?)
    }

    fn require_season(&self, season_id: i64) -> Result<(), LeagueError> {
        if self.store.list_seasons()?.iter().any(|s| s.id == season_id) {
            Ok(())
        } else {
            Err(LeagueError::SeasonNotFound(season_id))
        }
    }
}

fn require_admin(auth: &AuthContext) -> Result<(), LeagueError> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(LeagueError::AdminRequired)
    }
}
