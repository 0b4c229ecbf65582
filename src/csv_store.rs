use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use log::{debug, warn};
use serde::Serialize;

use crate::fixtures::{Fixture, normalize_score_pair, parse_goal_field};
use crate::store::{ScoreUpdate, SeasonStore, SeasonSummary, StoredFixture};

const SEASONS_FILE: &str = "seasons.csv";
const TEAMS_FILE: &str = "teams.csv";
const FIXTURES_FILE: &str = "fixtures.csv";

/// Filesystem backend: three CSV files in one directory, rewritten whole on
/// every mutation through a temp file and rename. Reading tolerates rows a
/// hand edit mangled: short rows and junk score fields degrade to unplayed,
/// rows missing a team name are dropped.
pub struct CsvStore {
    dir: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
struct SeasonRow {
    season_id: i64,
    name: String,
    created_at: String,
}

#[derive(Debug, Clone, Serialize)]
struct TeamRow {
    season_id: i64,
    position: usize,
    name: String,
}

#[derive(Debug, Clone, Serialize)]
struct FixtureRow {
    fixture_id: i64,
    season_id: i64,
    home: String,
    away: String,
    home_goals: Option<i32>,
    away_goals: Option<i32>,
}

impl CsvStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create data dir {}", dir.display()))?;
        debug!("opened csv store at {}", dir.display());
        Ok(Self { dir })
    }

    fn load_seasons(&self) -> Result<Vec<SeasonRow>> {
        read_rows(&self.dir.join(SEASONS_FILE), |rec| {
            let season_id = parse_id_field(rec.get(0))?;
            let name = rec.get(1).map(str::trim).filter(|s| !s.is_empty())?;
            Some(SeasonRow {
                season_id,
                name: name.to_string(),
                created_at: rec.get(2).unwrap_or_default().to_string(),
            })
        })
    }

    fn load_teams(&self) -> Result<Vec<TeamRow>> {
        read_rows(&self.dir.join(TEAMS_FILE), |rec| {
            let season_id = parse_id_field(rec.get(0))?;
            let position = rec.get(1)?.trim().parse::<usize>().ok()?;
            let name = rec.get(2).map(str::trim).filter(|s| !s.is_empty())?;
            Some(TeamRow {
                season_id,
                position,
                name: name.to_string(),
            })
        })
    }

    fn load_fixture_rows(&self) -> Result<Vec<FixtureRow>> {
        read_rows(&self.dir.join(FIXTURES_FILE), |rec| {
            let fixture_id = parse_id_field(rec.get(0))?;
            let season_id = parse_id_field(rec.get(1))?;
            let home = rec.get(2).map(str::trim).filter(|s| !s.is_empty())?;
            let away = rec.get(3).map(str::trim).filter(|s| !s.is_empty())?;
            // Anything short of a clean digit pair reads as unplayed.
            let home_goals = decode_goal_field(fixture_id, rec.get(4));
            let away_goals = decode_goal_field(fixture_id, rec.get(5));
            let (home_goals, away_goals) = normalize_score_pair(home_goals, away_goals);
            Some(FixtureRow {
                fixture_id,
                season_id,
                home: home.to_string(),
                away: away.to_string(),
                home_goals,
                away_goals,
            })
        })
    }

    fn write_rows<T: Serialize>(&self, file: &str, rows: &[T]) -> Result<()> {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));
        let mut writer =
            csv::Writer::from_path(&tmp).with_context(|| format!("open {file} for writing"))?;
        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("serialize {file} row"))?;
        }
        writer.flush().with_context(|| format!("flush {file}"))?;
        drop(writer);
        std::fs::rename(&tmp, &path).with_context(|| format!("swap {file}"))?;
        Ok(())
    }
}

fn read_rows<T>(
    path: &Path,
    decode: impl Fn(&csv::StringRecord) -> Option<T>,
) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;

    let mut out = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("skipping unreadable row in {}: {err}", path.display());
                continue;
            }
        };
        match decode(&record) {
            Some(row) => out.push(row),
            None => warn!("dropping malformed row in {}", path.display()),
        }
    }
    Ok(out)
}

fn parse_id_field(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok()
}

fn decode_goal_field(fixture_id: i64, raw: Option<&str>) -> Option<i32> {
    let raw = raw.unwrap_or_default();
    let parsed = parse_goal_field(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        warn!("unparseable score {raw:?} on fixture {fixture_id}, treating as unplayed");
    }
    parsed
}

impl SeasonStore for CsvStore {
    fn list_seasons(&self) -> Result<Vec<SeasonSummary>> {
        let seasons = self.load_seasons()?;
        let teams = self.load_teams()?;
        let fixtures = self.load_fixture_rows()?;

        let mut out: Vec<SeasonSummary> = seasons
            .into_iter()
            .map(|s| SeasonSummary {
                team_count: teams.iter().filter(|t| t.season_id == s.season_id).count(),
                fixture_count: fixtures
                    .iter()
                    .filter(|f| f.season_id == s.season_id)
                    .count(),
                id: s.season_id,
                name: s.name,
                created_at: s.created_at,
            })
            .collect();
        out.sort_by_key(|s| s.id);
        Ok(out)
    }

    fn create_season(
        &mut self,
        name: &str,
        teams: &[String],
        fixtures: &[Fixture],
    ) -> Result<i64> {
        let mut season_rows = self.load_seasons()?;
        let mut team_rows = self.load_teams()?;
        let mut fixture_rows = self.load_fixture_rows()?;

        if season_rows.iter().any(|s| s.name == name) {
            return Err(anyhow!("season already exists: {name}"));
        }

        let season_id = season_rows.iter().map(|s| s.season_id).max().unwrap_or(0) + 1;
        let mut next_fixture_id = fixture_rows.iter().map(|f| f.fixture_id).max().unwrap_or(0) + 1;

        season_rows.push(SeasonRow {
            season_id,
            name: name.to_string(),
            created_at: Utc::now().to_rfc3339(),
        });
        for (position, team) in teams.iter().enumerate() {
            team_rows.push(TeamRow {
                season_id,
                position,
                name: team.clone(),
            });
        }
        for fixture in fixtures {
            let (home_goals, away_goals) =
                normalize_score_pair(fixture.home_goals, fixture.away_goals);
            fixture_rows.push(FixtureRow {
                fixture_id: next_fixture_id,
                season_id,
                home: fixture.home.clone(),
                away: fixture.away.clone(),
                home_goals,
                away_goals,
            });
            next_fixture_id += 1;
        }

        self.write_rows(SEASONS_FILE, &season_rows)?;
        self.write_rows(TEAMS_FILE, &team_rows)?;
        self.write_rows(FIXTURES_FILE, &fixture_rows)?;
        Ok(season_id)
    }

    fn load_fixtures(&self, season_id: i64) -> Result<Vec<StoredFixture>> {
        let mut rows: Vec<FixtureRow> = self
            .load_fixture_rows()?
            .into_iter()
            .filter(|f| f.season_id == season_id)
            .collect();
        rows.sort_by_key(|f| f.fixture_id);
        Ok(rows
            .into_iter()
            .map(|f| StoredFixture {
                id: f.fixture_id,
                home: f.home,
                away: f.away,
                home_goals: f.home_goals,
                away_goals: f.away_goals,
            })
            .collect())
    }

    fn save_fixture_scores(&mut self, season_id: i64, updates: &[ScoreUpdate]) -> Result<()> {
        let mut fixture_rows = self.load_fixture_rows()?;
        for update in updates {
            let update = update.normalized();
            let row = fixture_rows
                .iter_mut()
                .find(|f| f.season_id == season_id && f.fixture_id == update.fixture_id);
            match row {
                Some(row) => {
                    row.home_goals = update.home_goals;
                    row.away_goals = update.away_goals;
                }
                None => warn!(
                    "ignoring score update for unknown fixture {} in season {season_id}",
                    update.fixture_id
                ),
            }
        }
        self.write_rows(FIXTURES_FILE, &fixture_rows)
    }

    fn delete_season(&mut self, season_id: i64) -> Result<()> {
        let mut season_rows = self.load_seasons()?;
        let before = season_rows.len();
        season_rows.retain(|s| s.season_id != season_id);
        if season_rows.len() == before {
            return Err(anyhow!("no such season: {season_id}"));
        }

        let mut team_rows = self.load_teams()?;
        team_rows.retain(|t| t.season_id != season_id);
        let mut fixture_rows = self.load_fixture_rows()?;
        fixture_rows.retain(|f| f.season_id != season_id);

        self.write_rows(SEASONS_FILE, &season_rows)?;
        self.write_rows(TEAMS_FILE, &team_rows)?;
        self.write_rows(FIXTURES_FILE, &fixture_rows)?;
        Ok(())
    }
}
