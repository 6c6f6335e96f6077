//! SQLite export of the rank mapping
//!
//! Writes every ranked participant of a crawl into a `players` table so the
//! result can be queried with plain SQL. Exporting again upserts, so the
//! same database can follow a crawl across several runs and regions.

use crate::state::CrawlState;
use crate::RippleError;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQL schema for the export database
pub const EXPORT_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    participant_id TEXT PRIMARY KEY,
    region TEXT NOT NULL,
    tier TEXT NOT NULL,
    division TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_players_region ON players(region);
CREATE INDEX IF NOT EXISTS idx_players_tier ON players(tier);
"#;

const UPSERT_PLAYER_SQL: &str = "
    INSERT INTO players (participant_id, region, tier, division)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(participant_id) DO UPDATE SET
        region = excluded.region,
        tier = excluded.tier,
        division = excluded.division
";

/// Opens (or creates) an export database and applies the schema
pub fn open_export_db(path: &Path) -> Result<Connection, RippleError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
    ",
    )?;
    conn.execute_batch(EXPORT_SCHEMA_SQL)?;
    Ok(conn)
}

/// Writes a crawl's rank mapping into an open connection
///
/// All rows go in one transaction; a failure leaves the table unchanged.
///
/// # Returns
///
/// * `Ok(usize)` - Number of participants written
/// * `Err(RippleError)` - The transaction failed
pub fn write_rankings(conn: &mut Connection, state: &CrawlState) -> Result<usize, RippleError> {
    let tx = conn.transaction()?;
    let mut written = 0;
    {
        let mut stmt = tx.prepare(UPSERT_PLAYER_SQL)?;
        for (participant, rank) in state.ranks() {
            written += stmt.execute(params![
                participant.as_str(),
                state.region().as_str(),
                rank.tier.as_str(),
                rank.division.as_str(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(written)
}

/// Exports a crawl's rank mapping to a SQLite file
///
/// # Arguments
///
/// * `state` - Crawl state whose mapping is exported
/// * `path` - Database file, created if missing
///
/// # Returns
///
/// * `Ok(usize)` - Number of participants written
/// * `Err(RippleError)` - Failed to open or write the database
pub fn export_rankings(state: &CrawlState, path: &Path) -> Result<usize, RippleError> {
    let mut conn = open_export_db(path)?;
    let written = write_rankings(&mut conn, state)?;
    tracing::info!(
        "Exported {} players for {} to {}",
        written,
        state.region(),
        path.display()
    );
    Ok(written)
}
