use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const TEAM_COLUMNS: &str = "t.id, t.name, t.description, t.achievements, t.created_at, t.updated_at";
const PLAYER_COLUMNS: &str =
    "p.id, p.name, p.bio, p.stats, p.photo_url, p.team_id, p.created_at, p.updated_at";
const PLAYER_COLUMN_COUNT: usize = 8;
const PLAYER_ORDER: &str = "ORDER BY p.name COLLATE NOCASE, p.id";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn encode_attributes(attrs: Option<&Attributes>) -> Result<Option<String>> {
    attrs
        .map(serde_json::to_string)
        .transpose()
        .map_err(Error::from)
}

fn attributes_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Attributes>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        serde_json::from_str(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn team_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        description: row.get(offset + 2)?,
        achievements: attributes_column(row, offset + 3)?,
        created_at: parse_datetime(&row.get::<_, String>(offset + 4)?),
        updated_at: parse_datetime(&row.get::<_, String>(offset + 5)?),
    })
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        bio: row.get(2)?,
        stats: attributes_column(row, 3)?,
        photo_url: row.get(4)?,
        team_id: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
        updated_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

/// Maps a `players LEFT JOIN teams` row; team columns follow the player columns.
fn player_with_team_from_row(row: &Row<'_>) -> rusqlite::Result<PlayerWithTeam> {
    let player = player_from_row(row)?;
    let team = match row.get::<_, Option<String>>(PLAYER_COLUMN_COUNT)? {
        Some(_) => Some(team_from_row(row, PLAYER_COLUMN_COUNT)?),
        None => None,
    };
    Ok(PlayerWithTeam { player, team })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Team operations

    fn create_team(&self, team: &Team) -> Result<()> {
        let achievements = encode_attributes(team.achievements.as_ref())?;
        self.conn().execute(
            "INSERT INTO teams (id, name, description, achievements, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                team.id,
                team.name,
                team.description,
                achievements,
                format_datetime(&team.created_at),
                format_datetime(&team.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_team(&self, id: &str) -> Result<Option<Team>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TEAM_COLUMNS} FROM teams t WHERE t.id = ?1"),
            params![id],
            |row| team_from_row(row, 0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_teams(&self) -> Result<Vec<Team>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams t ORDER BY t.name COLLATE NOCASE, t.id"
        ))?;

        let rows = stmt.query_map([], |row| team_from_row(row, 0))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_team(&self, team: &Team) -> Result<()> {
        let achievements = encode_attributes(team.achievements.as_ref())?;
        let rows = self.conn().execute(
            "UPDATE teams SET name = ?1, description = ?2, achievements = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                team.name,
                team.description,
                achievements,
                format_datetime(&team.updated_at),
                team.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_team(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM teams WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Player operations

    fn create_player(&self, player: &Player) -> Result<()> {
        let stats = encode_attributes(player.stats.as_ref())?;
        self.conn().execute(
            "INSERT INTO players (id, name, bio, stats, photo_url, team_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                player.id,
                player.name,
                player.bio,
                stats,
                player.photo_url,
                player.team_id,
                format_datetime(&player.created_at),
                format_datetime(&player.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_player(&self, id: &str) -> Result<Option<Player>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PLAYER_COLUMNS} FROM players p WHERE p.id = ?1"),
            params![id],
            player_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_player_with_team(&self, id: &str) -> Result<Option<PlayerWithTeam>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {PLAYER_COLUMNS}, {TEAM_COLUMNS}
                 FROM players p LEFT JOIN teams t ON t.id = p.team_id
                 WHERE p.id = ?1"
            ),
            params![id],
            player_with_team_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_players(&self, filter: &PlayerFilter) -> Result<Vec<PlayerWithTeam>> {
        let (condition, bindings): (&str, Vec<&str>) = match filter {
            PlayerFilter::All => ("", Vec::new()),
            PlayerFilter::FreeAgents => ("WHERE p.team_id IS NULL", Vec::new()),
            PlayerFilter::Team(team_id) => ("WHERE p.team_id = ?1", vec![team_id.as_str()]),
        };

        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLAYER_COLUMNS}, {TEAM_COLUMNS}
             FROM players p LEFT JOIN teams t ON t.id = p.team_id
             {condition} {PLAYER_ORDER}"
        ))?;

        let rows = stmt.query_map(params_from_iter(bindings), player_with_team_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_player(&self, player: &Player) -> Result<()> {
        let stats = encode_attributes(player.stats.as_ref())?;
        let rows = self.conn().execute(
            "UPDATE players
             SET name = ?1, bio = ?2, stats = ?3, photo_url = ?4, team_id = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                player.name,
                player.bio,
                stats,
                player.photo_url,
                player.team_id,
                format_datetime(&player.updated_at),
                player.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_player(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM players WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Team -> players preload

    fn list_team_players(&self, team_id: &str) -> Result<Vec<Player>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players p WHERE p.team_id = ?1 {PLAYER_ORDER}"
        ))?;

        let rows = stmt.query_map(params![team_id], player_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_players_for_teams(&self, team_ids: &[String]) -> Result<Vec<Player>> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; team_ids.len()].join(", ");
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players p
             WHERE p.team_id IN ({placeholders}) {PLAYER_ORDER}"
        ))?;

        let rows = stmt.query_map(params_from_iter(team_ids), player_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}
