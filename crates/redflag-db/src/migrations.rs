use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (traits)");
        conn.execute_batch(
            "
            CREATE TABLE traits (
                id          TEXT PRIMARY KEY,
                text        TEXT NOT NULL,
                is_approved INTEGER NOT NULL DEFAULT 0,
                red_flag    INTEGER NOT NULL DEFAULT 0 CHECK (red_flag >= 0),
                green_flag  INTEGER NOT NULL DEFAULT 0 CHECK (green_flag >= 0),
                neutral     INTEGER NOT NULL DEFAULT 0 CHECK (neutral >= 0),
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX idx_traits_approved_recent
                ON traits(is_approved, created_at DESC, id DESC);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }
}
