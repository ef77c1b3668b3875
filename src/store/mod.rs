mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Team operations
    fn create_team(&self, team: &Team) -> Result<()>;
    fn get_team(&self, id: &str) -> Result<Option<Team>>;
    fn list_teams(&self) -> Result<Vec<Team>>;
    fn update_team(&self, team: &Team) -> Result<()>;
    fn delete_team(&self, id: &str) -> Result<bool>;

    // Player operations
    fn create_player(&self, player: &Player) -> Result<()>;
    fn get_player(&self, id: &str) -> Result<Option<Player>>;
    fn get_player_with_team(&self, id: &str) -> Result<Option<PlayerWithTeam>>;
    fn list_players(&self, filter: &PlayerFilter) -> Result<Vec<PlayerWithTeam>>;
    fn update_player(&self, player: &Player) -> Result<()>;
    fn delete_player(&self, id: &str) -> Result<bool>;

    // Team -> players preload
    fn list_team_players(&self, team_id: &str) -> Result<Vec<Player>>;
    fn list_players_for_teams(&self, team_ids: &[String]) -> Result<Vec<Player>>;
}
