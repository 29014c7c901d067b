// SQLite persistence layer for draft state.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::draft::pick::DraftPick;

/// SQLite-backed persistence for players, projections, draft picks, and
/// key-value draft state.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS players (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                team        TEXT NOT NULL,
                positions   TEXT NOT NULL,
                player_type TEXT NOT NULL,
                UNIQUE(name, team)
            );

            CREATE TABLE IF NOT EXISTS projections (
                player_id INTEGER NOT NULL REFERENCES players(id),
                source    TEXT NOT NULL,
                stat_name TEXT NOT NULL,
                value     REAL NOT NULL,
                PRIMARY KEY (player_id, source, stat_name)
            );

            CREATE TABLE IF NOT EXISTS draft_picks (
                pick_number    INTEGER NOT NULL,
                team_id        TEXT NOT NULL,
                team_name      TEXT NOT NULL,
                player_id      INTEGER REFERENCES players(id),
                espn_player_id TEXT,
                player_name    TEXT NOT NULL,
                position       TEXT NOT NULL,
                price          INTEGER NOT NULL,
                eligible_slots TEXT,
                draft_id       TEXT NOT NULL DEFAULT '',
                timestamp      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (pick_number, draft_id)
            );

            CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        // Migration: add eligible_slots column if it doesn't exist (for pre-v0.2 databases)
        conn.execute_batch(
            "ALTER TABLE draft_picks ADD COLUMN eligible_slots TEXT;"
        ).ok(); // Silently ignore if column already exists (ALTER TABLE fails with "duplicate column name")

        // Migration: migrate draft_picks to composite primary key (pick_number, draft_id).
        // Detects old schema by checking if the draft_id column exists. If not, the
        // table is from a pre-draft-id version and needs a full table rebuild since
        // SQLite doesn't support altering primary keys in place.
        Self::migrate_draft_picks_add_draft_id(&conn)?;

        // Index on draft_id for efficient filtering. The composite PK is ordered
        // (pick_number, draft_id) so queries filtering by draft_id alone cannot
        // use it efficiently.
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_draft_picks_draft_id ON draft_picks(draft_id);"
        ).context("failed to create draft_id index")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Migrate the `draft_picks` table from the old schema (pick_number as sole
    /// PRIMARY KEY) to the new schema with a composite PRIMARY KEY (pick_number,
    /// draft_id).
    ///
    /// This is a no-op if the table already has the `draft_id` column (new schema
    /// or previously migrated). For legacy databases, it rebuilds the table using
    /// SQLite's rename-create-copy-drop pattern since ALTER TABLE cannot change
    /// primary key constraints.
    fn migrate_draft_picks_add_draft_id(conn: &Connection) -> Result<()> {
        // Check if draft_id column already exists
        let has_draft_id: bool = conn
            .prepare("SELECT draft_id FROM draft_picks LIMIT 0")
            .is_ok();

        if has_draft_id {
            return Ok(()); // Already migrated or new schema
        }

        // Old schema detected: rebuild the table with composite primary key.
        // Legacy rows get draft_id = '' (empty string), making them invisible
        // to any real draft_id filter.
        conn.execute_batch(
            "
            ALTER TABLE draft_picks RENAME TO draft_picks_old;

            CREATE TABLE draft_picks (
                pick_number    INTEGER NOT NULL,
                team_id        TEXT NOT NULL,
                team_name      TEXT NOT NULL,
                player_id      INTEGER REFERENCES players(id),
                espn_player_id TEXT,
                player_name    TEXT NOT NULL,
                position       TEXT NOT NULL,
                price          INTEGER NOT NULL,
                eligible_slots TEXT,
                draft_id       TEXT NOT NULL DEFAULT '',
                timestamp      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (pick_number, draft_id)
            );

            INSERT INTO draft_picks (pick_number, team_id, team_name, player_id, espn_player_id, player_name, position, price, eligible_slots, draft_id, timestamp)
                SELECT pick_number, team_id, team_name, player_id, espn_player_id, player_name, position, price, eligible_slots, '', timestamp
                FROM draft_picks_old;

            DROP TABLE draft_picks_old;
            ",
        )
        .context("failed to migrate draft_picks table for draft_id support")?;

        Ok(())
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Record a single draft pick. Uses INSERT OR IGNORE for idempotency —
    /// re-recording the same pick_number is a no-op. Player linkage
    /// (`player_id`) is deferred as NULL. Timestamp is auto-generated by SQLite.
    ///
    /// The `draft_id` scopes this pick to a specific draft session so picks
    /// from different sessions don't intermingle.
    pub fn record_pick(&self, pick: &DraftPick, draft_id: &str) -> Result<()> {
        let conn = self.conn();
        let eligible_slots_json = serde_json::to_string(&pick.eligible_slots)
            .context("failed to serialize eligible_slots")?;
        conn.execute(
            "INSERT OR IGNORE INTO draft_picks
                (pick_number, team_id, team_name, espn_player_id, player_name, position, price, eligible_slots, draft_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                pick.pick_number,
                pick.team_id,
                pick.team_name,
                pick.espn_player_id,
                pick.player_name,
                pick.position,
                pick.price,
                eligible_slots_json,
                draft_id,
            ],
        )
        .context("failed to record draft pick")?;
        Ok(())
    }

    /// Load draft picks for a specific draft session, ordered by pick number.
    ///
    /// Only returns picks that match the given `draft_id`. Picks from other
    /// draft sessions (or legacy picks with empty draft_id) are excluded.
    pub fn load_picks(&self, draft_id: &str) -> Result<Vec<DraftPick>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT pick_number, team_id, team_name, player_name, position, price, espn_player_id, eligible_slots
                 FROM draft_picks WHERE draft_id = ?1 ORDER BY pick_number",
            )
            .context("failed to prepare load_picks query")?;

        let picks = stmt
            .query_map(params![draft_id], |row| {
                let eligible_slots_json: Option<String> = row.get(7)?;
                let eligible_slots = eligible_slots_json
                    .and_then(|json_str| serde_json::from_str::<Vec<u16>>(&json_str).ok())
                    .unwrap_or_default();
                Ok(DraftPick {
                    pick_number: row.get(0)?,
                    team_id: row.get(1)?,
                    team_name: row.get(2)?,
                    player_name: row.get(3)?,
                    position: row.get(4)?,
                    price: row.get(5)?,
                    espn_player_id: row.get(6)?,
                    eligible_slots,
                })
            })
            .context("failed to query draft picks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map draft pick rows")?;

        Ok(picks)
    }

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE so
    /// repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the key
    /// does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM draft_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query draft state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Insert a player or update their record if a `(name, team)` row already
    /// exists. Returns the player's row id in a single atomic statement.
    ///
    /// `positions` is stored as a JSON array string (e.g. `["SS","2B"]`).
    pub fn upsert_player(
        &self,
        name: &str,
        team: &str,
        positions: &[String],
        player_type: &str,
    ) -> Result<i64> {
        let conn = self.conn();
        let positions_json =
            serde_json::to_string(positions).context("failed to serialize positions")?;

        let id: i64 = conn
            .query_row(
                "INSERT INTO players (name, team, positions, player_type)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(name, team) DO UPDATE SET
                    positions   = excluded.positions,
                    player_type = excluded.player_type
                 RETURNING id",
                params![name, team, positions_json, player_type],
                |row| row.get(0),
            )
            .context("failed to upsert player")?;
        Ok(id)
    }

    /// Insert a single projection row. Uses INSERT OR REPLACE so re-importing
    /// projections overwrites prior values.
    pub fn insert_projection(
        &self,
        player_id: i64,
        source: &str,
        stat_name: &str,
        value: f64,
    ) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO projections (player_id, source, stat_name, value)
             VALUES (?1, ?2, ?3, ?4)",
            params![player_id, source, stat_name, value],
        )
        .context("failed to insert projection")?;
        Ok(())
    }

    /// Returns `true` if at least one draft pick has been recorded for the
    /// given `draft_id`. Uses `SELECT EXISTS` for efficiency (stops after
    /// finding the first matching row rather than counting all rows).
    pub fn has_draft_in_progress(&self, draft_id: &str) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM draft_picks WHERE draft_id = ?1)",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to check draft_picks existence")?;
        Ok(exists)
    }

    /// Return the number of draft picks recorded for the given `draft_id`.
    pub fn pick_count(&self, draft_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM draft_picks WHERE draft_id = ?1",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to count draft picks")?;
        Ok(count as usize)
    }

    /// Delete all draft picks and draft state, resetting the draft to a clean
    /// slate. Player and projection data are preserved. Uses a proper
    /// transaction with automatic rollback on error.
    pub fn clear_draft(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM draft_picks", [])
            .context("failed to delete draft picks")?;
        tx.execute("DELETE FROM draft_state", [])
            .context("failed to delete draft state")?;
        tx.commit().context("failed to commit clear_draft")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Draft ID management
    // ------------------------------------------------------------------

    /// Key used in the draft_state table to store the current draft ID.
    const DRAFT_ID_KEY: &'static str = "current_draft_id";

    /// Retrieve the stored draft ID from the key-value store.
    /// Returns `None` if no draft ID has been set yet.
    pub fn get_draft_id(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::DRAFT_ID_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    /// Persist a draft ID to the key-value store.
    pub fn set_draft_id(&self, draft_id: &str) -> Result<()> {
        self.save_state(
            Self::DRAFT_ID_KEY,
            &serde_json::Value::String(draft_id.to_string()),
        )
    }

    /// Generate a new unique draft ID based on the current UTC timestamp.
    ///
    /// Format: `draft_YYYYMMDD_HHMMSS_SSS` (e.g. `draft_20260228_143022_123`).
    /// The millisecond suffix ensures uniqueness even if two drafts start in
    /// the same second.
    pub fn generate_draft_id() -> String {
        let now = chrono::Utc::now();
        now.format("draft_%Y%m%d_%H%M%S_%3f").to_string()
    }

    /// Import players and projections in a single transaction.
    ///
    /// Each entry is a tuple of (name, team, positions, player_type, projections)
    /// where projections is a slice of (source, stat_name, value).
    pub fn import_players(
        &self,
        players: &[(&str, &str, &[String], &str, &[(&str, &str, f64)])],
    ) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin import transaction")?;

        for &(name, team, ref positions, player_type, ref projections) in players {
            let positions_json =
                serde_json::to_string(positions).context("failed to serialize positions")?;

            let player_id: i64 = tx
                .query_row(
                    "INSERT INTO players (name, team, positions, player_type)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(name, team) DO UPDATE SET
                        positions   = excluded.positions,
                        player_type = excluded.player_type
                     RETURNING id",
                    params![name, team, positions_json, player_type],
                    |row| row.get(0),
                )
                .context("failed to upsert player in batch")?;

            for &(source, stat_name, value) in *projections {
                tx.execute(
                    "INSERT OR REPLACE INTO projections (player_id, source, stat_name, value)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![player_id, source, stat_name, value],
                )
                .context("failed to insert projection in batch")?;
            }
        }

        tx.commit().context("failed to commit import")?;
        Ok(())
    }
}
