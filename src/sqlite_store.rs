use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use log::{debug, warn};
use rusqlite::{Connection, params};

use crate::fixtures::{Fixture, normalize_score_pair};
use crate::store::{ScoreUpdate, SeasonStore, SeasonSummary, StoredFixture};

/// Relational backend. One connection, season-scoped writes in transactions.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        init_schema(&conn)?;
        debug!("opened sqlite store at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS seasons (
            season_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS teams (
            team_id INTEGER PRIMARY KEY AUTOINCREMENT,
            season_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            name TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_teams_season ON teams(season_id);
        CREATE TABLE IF NOT EXISTS fixtures (
            fixture_id INTEGER PRIMARY KEY AUTOINCREMENT,
            season_id INTEGER NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_goals INTEGER NULL,
            away_goals INTEGER NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_fixtures_season ON fixtures(season_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

impl SeasonStore for SqliteStore {
    fn list_seasons(&self) -> Result<Vec<SeasonSummary>> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
                SELECT
                    s.season_id, s.name, s.created_at,
                    (SELECT COUNT(*) FROM teams t WHERE t.season_id = s.season_id),
                    (SELECT COUNT(*) FROM fixtures f WHERE f.season_id = s.season_id)
                FROM seasons s
                ORDER BY s.season_id ASC
                "#,
            )
            .context("prepare season list query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(SeasonSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                    team_count: row.get::<_, i64>(3)? as usize,
                    fixture_count: row.get::<_, i64>(4)? as usize,
                })
            })
            .context("query season list")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("decode season row")?);
        }
        Ok(out)
    }

    fn create_season(
        &mut self,
        name: &str,
        teams: &[String],
        fixtures: &[Fixture],
    ) -> Result<i64> {
        let created_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction().context("begin create transaction")?;

        tx.execute(
            "INSERT INTO seasons(name, created_at) VALUES (?1, ?2)",
            params![name, created_at],
        )
        .with_context(|| format!("insert season {name}"))?;
        let season_id = tx.last_insert_rowid();

        for (position, team) in teams.iter().enumerate() {
            tx.execute(
                "INSERT INTO teams(season_id, position, name) VALUES (?1, ?2, ?3)",
                params![season_id, position as i64, team],
            )
            .context("insert team")?;
        }

        for fixture in fixtures {
            let (home_goals, away_goals) =
                normalize_score_pair(fixture.home_goals, fixture.away_goals);
            tx.execute(
                "INSERT INTO fixtures(season_id, home_team, away_team, home_goals, away_goals, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    season_id,
                    fixture.home,
                    fixture.away,
                    home_goals,
                    away_goals,
                    created_at
                ],
            )
            .context("insert fixture")?;
        }

        tx.commit().context("commit create transaction")?;
        Ok(season_id)
    }

    fn load_fixtures(&self, season_id: i64) -> Result<Vec<StoredFixture>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT fixture_id, home_team, away_team, home_goals, away_goals
                 FROM fixtures
                 WHERE season_id = ?1
                 ORDER BY fixture_id ASC",
            )
            .context("prepare fixture query")?;

        let rows = stmt
            .query_map(params![season_id], |row| {
                Ok(StoredFixture {
                    id: row.get(0)?,
                    home: row.get(1)?,
                    away: row.get(2)?,
                    home_goals: row.get(3)?,
                    away_goals: row.get(4)?,
                })
            })
            .context("query fixtures")?;

        let mut out = Vec::new();
        for row in rows {
            let mut fixture = row.context("decode fixture row")?;
            let (home_goals, away_goals) =
                normalize_score_pair(fixture.home_goals, fixture.away_goals);
            fixture.home_goals = home_goals;
            fixture.away_goals = away_goals;
            out.push(fixture);
        }
        Ok(out)
    }

    fn save_fixture_scores(&mut self, season_id: i64, updates: &[ScoreUpdate]) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction().context("begin score transaction")?;
        for update in updates {
            let update = update.normalized();
            let changed = tx
                .execute(
                    "UPDATE fixtures
                     SET home_goals = ?1, away_goals = ?2, updated_at = ?3
                     WHERE fixture_id = ?4 AND season_id = ?5",
                    params![
                        update.home_goals,
                        update.away_goals,
                        updated_at,
                        update.fixture_id,
                        season_id
                    ],
                )
                .context("update fixture score")?;
            if changed == 0 {
                warn!(
                    "ignoring score update for unknown fixture {} in season {season_id}",
                    update.fixture_id
                );
            }
        }
        tx.commit().context("commit score transaction")?;
        Ok(())
    }

    fn delete_season(&mut self, season_id: i64) -> Result<()> {
        let tx = self.conn.transaction().context("begin delete transaction")?;
        tx.execute(
            "DELETE FROM fixtures WHERE season_id = ?1",
            params![season_id],
        )
        .context("delete fixtures")?;
        tx.execute("DELETE FROM teams WHERE season_id = ?1", params![season_id])
            .context("delete teams")?;
        let deleted = tx
            .execute(
                "DELETE FROM seasons WHERE season_id = ?1",
                params![season_id],
            )
            .context("delete season")?;
        tx.commit().context("commit delete transaction")?;
        if deleted == 0 {
            return Err(anyhow!("no such season: {season_id}"));
        }
        Ok(())
    }
}
