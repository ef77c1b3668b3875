pub const SCHEMA: &str = r#"
-- Teams own players through players.team_id
CREATE TABLE IF NOT EXISTS teams (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    achievements TEXT,            -- JSON object, NULL = none
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Players; team_id NULL = free agent
CREATE TABLE IF NOT EXISTS players (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    bio TEXT,
    stats TEXT,                   -- JSON object, NULL = none
    photo_url TEXT,

    -- Deleting a team releases its players instead of deleting them
    team_id TEXT REFERENCES teams(id) ON DELETE SET NULL,

    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_players_team ON players(team_id);
CREATE INDEX IF NOT EXISTS idx_teams_name ON teams(name);
"#;
