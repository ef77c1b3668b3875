use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form key/value attributes stored as a JSON object column
/// (`teams.achievements`, `players.stats`).
pub type Attributes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub achievements: Option<Attributes>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub bio: Option<String>,
    pub stats: Option<Attributes>,
    pub photo_url: Option<String>,
    /// `None` means the player is a free agent.
    pub team_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    #[must_use]
    pub fn is_free_agent(&self) -> bool {
        self.team_id.is_none()
    }
}

/// A player with its team relation preloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerWithTeam {
    #[serde(flatten)]
    pub player: Player,
    pub team: Option<Team>,
}

/// A team with its players preloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamWithPlayers {
    #[serde(flatten)]
    pub team: Team,
    pub players: Vec<Player>,
}

/// Row selection for player listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerFilter {
    #[default]
    All,
    FreeAgents,
    Team(String),
}
