use crate::Database;
use crate::models::TraitRow;
use anyhow::Result;
use redflag_types::VoteCategory;
use rusqlite::{Connection, Row};

const TRAIT_COLUMNS: &str = "id, text, is_approved, red_flag, green_flag, neutral, created_at";

impl Database {
    // -- Traits --

    /// Insert a fresh, unapproved trait with zeroed tallies. `created_at` is
    /// assigned by SQLite.
    pub fn insert_trait(&self, id: &str, text: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO traits (id, text) VALUES (?1, ?2)", (id, text))?;
            Ok(())
        })
    }

    pub fn get_trait(&self, id: &str) -> Result<Option<TraitRow>> {
        self.with_conn(|conn| query_trait_by_id(conn, id))
    }

    /// Approved traits, newest first, starting strictly after the
    /// `(created_at, id)` key of the previous page's last row.
    pub fn list_approved_page(&self, limit: u32, after: Option<(&str, &str)>) -> Result<Vec<TraitRow>> {
        self.with_conn(|conn| query_approved_page(conn, limit, after))
    }

    /// Bump one tally in place. A single UPDATE, so concurrent voters never
    /// lose increments. Returns false when no approved trait has this id.
    pub fn increment_vote(&self, id: &str, category: VoteCategory) -> Result<bool> {
        let sql = match category {
            VoteCategory::RedFlag => {
                "UPDATE traits SET red_flag = red_flag + 1 WHERE id = ?1 AND is_approved = 1"
            }
            VoteCategory::GreenFlag => {
                "UPDATE traits SET green_flag = green_flag + 1 WHERE id = ?1 AND is_approved = 1"
            }
            VoteCategory::Neutral => {
                "UPDATE traits SET neutral = neutral + 1 WHERE id = ?1 AND is_approved = 1"
            }
        };

        self.with_conn(|conn| {
            let changed = conn.execute(sql, [id])?;
            Ok(changed == 1)
        })
    }

    /// Flip the moderation flag. Approval is one-way; re-approving is a no-op.
    /// Returns false when the id does not exist.
    pub fn approve_trait(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("UPDATE traits SET is_approved = 1 WHERE id = ?1", [id])?;
            Ok(changed == 1)
        })
    }
}

fn map_trait(row: &Row<'_>) -> rusqlite::Result<TraitRow> {
    Ok(TraitRow {
        id: row.get(0)?,
        text: row.get(1)?,
        is_approved: row.get(2)?,
        red_flag: row.get(3)?,
        green_flag: row.get(4)?,
        neutral: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn query_trait_by_id(conn: &Connection, id: &str) -> Result<Option<TraitRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {TRAIT_COLUMNS} FROM traits WHERE id = ?1"))?;

    let row = stmt.query_row([id], map_trait).optional()?;

    Ok(row)
}

fn query_approved_page(
    conn: &Connection,
    limit: u32,
    after: Option<(&str, &str)>,
) -> Result<Vec<TraitRow>> {
    let rows = match after {
        Some((created_at, id)) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TRAIT_COLUMNS} FROM traits
                 WHERE is_approved = 1
                   AND (created_at < ?1 OR (created_at = ?1 AND id < ?2))
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?3"
            ))?;
            stmt.query_map(rusqlite::params![created_at, id, limit], map_trait)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TRAIT_COLUMNS} FROM traits
                 WHERE is_approved = 1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1"
            ))?;
            stmt.query_map([limit], map_trait)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use uuid::Uuid;

    fn seed(db: &Database, text: &str, created_at: &str, approved: bool) -> String {
        let id = Uuid::new_v4().to_string();
        db.insert_trait(&id, text).unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE traits SET created_at = ?1, is_approved = ?2 WHERE id = ?3",
                rusqlite::params![created_at, approved, &id],
            )?;
            Ok(())
        })
        .unwrap();
        id
    }

    #[test]
    fn insert_starts_unapproved_with_zero_votes() {
        let db = Database::open_in_memory().unwrap();
        db.insert_trait("a", "Remembers your coffee order").unwrap();

        let row = db.get_trait("a").unwrap().unwrap();
        assert!(!row.is_approved);
        assert_eq!((row.red_flag, row.green_flag, row.neutral), (0, 0, 0));
        assert!(row.created_at.ends_with('Z'));
        assert!(db.get_trait("missing").unwrap().is_none());
    }

    #[test]
    fn listings_hide_unapproved() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, "Approved one here", "2026-01-01T00:00:01.000Z", true);
        seed(&db, "Still waiting here", "2026-01-01T00:00:02.000Z", false);

        let rows = db.list_approved_page(100, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Approved one here");
    }

    #[test]
    fn pages_walk_newest_first_without_overlap() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..5 {
            seed(&db, &format!("Behavior number {i}"), &format!("2026-01-01T00:00:0{i}.000Z"), true);
        }
        // Same timestamp as the newest row; the id breaks the tie.
        seed(&db, "Behavior tied with four", "2026-01-01T00:00:04.000Z", true);

        let mut seen = Vec::new();
        let mut after: Option<(String, String)> = None;
        loop {
            let page = db
                .list_approved_page(2, after.as_ref().map(|(c, i)| (c.as_str(), i.as_str())))
                .unwrap();
            if page.is_empty() {
                break;
            }
            let last = page.last().unwrap();
            after = Some((last.created_at.clone(), last.id.clone()));
            seen.extend(page.into_iter().map(|r| r.created_at));
        }

        assert_eq!(seen.len(), 6);
        let mut sorted = seen.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(seen, sorted);
    }

    #[test]
    fn increment_requires_approval() {
        let db = Database::open_in_memory().unwrap();
        let hidden = seed(&db, "Not yet visible", "2026-01-01T00:00:00.000Z", false);
        assert!(!db.increment_vote(&hidden, VoteCategory::RedFlag).unwrap());

        assert!(db.approve_trait(&hidden).unwrap());
        assert!(db.approve_trait(&hidden).unwrap());
        assert!(db.increment_vote(&hidden, VoteCategory::RedFlag).unwrap());
        assert!(db.increment_vote(&hidden, VoteCategory::Neutral).unwrap());

        let row = db.get_trait(&hidden).unwrap().unwrap();
        assert_eq!((row.red_flag, row.green_flag, row.neutral), (1, 0, 1));
        assert!(!db.approve_trait("nope").unwrap());
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let path = std::env::temp_dir().join(format!("redflag_db_test_{}.db", Uuid::new_v4()));
        let db = Arc::new(Database::open(&path).unwrap());
        let id = seed(&db, "Plans the second date", "2026-01-01T00:00:00.000Z", true);

        // Two independent connections against the same file.
        let other = Arc::new(Database::open(&path).unwrap());
        let handles: Vec<_> = [db.clone(), other]
            .into_iter()
            .map(|handle| {
                let id = id.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        assert!(handle.increment_vote(&id, VoteCategory::GreenFlag).unwrap());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let row = db.get_trait(&id).unwrap().unwrap();
        assert_eq!(row.green_flag, 50);

        drop(db);
        let _ = std::fs::remove_file(&path);
    }
}
