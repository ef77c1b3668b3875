use serde::{Deserialize, Deserializer};

use crate::types::{Attributes, PlayerFilter};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| v == "true")
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTeamsParams {
    #[serde(default, rename = "withPlayers")]
    pub with_players: Option<String>,
}

impl ListTeamsParams {
    #[must_use]
    pub fn preload_players(&self) -> bool {
        is_truthy(self.with_players.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Option<Attributes>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTeamRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub achievements: Option<Option<Attributes>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPlayersParams {
    #[serde(default, rename = "teamId", alias = "team_id")]
    pub team_id: Option<String>,
    #[serde(default, rename = "isFreeAgent")]
    pub is_free_agent: Option<String>,
}

impl ListPlayersParams {
    /// The free-agent filter takes precedence over the team filter.
    #[must_use]
    pub fn filter(&self) -> PlayerFilter {
        if is_truthy(self.is_free_agent.as_deref()) {
            return PlayerFilter::FreeAgents;
        }
        match self.team_id.as_deref() {
            Some(team_id) if !team_id.is_empty() => PlayerFilter::Team(team_id.to_string()),
            _ => PlayerFilter::All,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "teamId")]
    pub team_id: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub stats: Option<Attributes>,
    #[serde(default, alias = "photoUrl")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlayerRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, alias = "teamId", deserialize_with = "double_option")]
    pub team_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub stats: Option<Option<Attributes>>,
    #[serde(default, alias = "photoUrl", deserialize_with = "double_option")]
    pub photo_url: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssignTeamRequest {
    #[serde(default, alias = "teamId", deserialize_with = "double_option")]
    pub team_id: Option<Option<String>>,
}
