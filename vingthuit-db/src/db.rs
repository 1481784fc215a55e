use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::models::{DrawRecord, Source, Verdict};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    section    TEXT PRIMARY KEY,
    open_time  TEXT NOT NULL,
    code_1     INTEGER NOT NULL DEFAULT 0,
    code_2     INTEGER NOT NULL DEFAULT 0,
    code_3     INTEGER NOT NULL DEFAULT 0,
    code_4     INTEGER NOT NULL DEFAULT 0,
    code_5     INTEGER NOT NULL DEFAULT 0,
    code_6     INTEGER NOT NULL DEFAULT 0,
    code_7     INTEGER NOT NULL DEFAULT 0,
    code_8     INTEGER NOT NULL DEFAULT 0,
    code_9     INTEGER NOT NULL DEFAULT 0,
    code_10    INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS predictions (
    source   TEXT NOT NULL,
    section  TEXT NOT NULL,
    label    TEXT NOT NULL,
    verdict  TEXT,
    PRIMARY KEY (source, section)
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("vingthuit.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).context("Échec de la migration")?;
    Ok(())
}

pub fn insert_record(conn: &Connection, record: &DrawRecord) -> Result<bool> {
    let code = |i: usize| record.codes.get(i).copied().unwrap_or(0);
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO draws (section, open_time, code_1, code_2, code_3, code_4, code_5, code_6, code_7, code_8, code_9, code_10)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                record.section,
                record.open_time,
                code(0),
                code(1),
                code(2),
                code(3),
                code(4),
                code(5),
                code(6),
                code(7),
                code(8),
                code(9),
            ],
        )
        .context("Échec de l'insertion")?;
    Ok(changed > 0)
}

pub fn fetch_last_records(conn: &Connection, limit: u32) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(
        "SELECT section, open_time, code_1, code_2, code_3, code_4, code_5, code_6, code_7, code_8, code_9, code_10
         FROM draws ORDER BY open_time DESC, section DESC LIMIT ?1",
    )?;
    let records = stmt
        .query_map([limit], |row| {
            let mut codes = Vec::with_capacity(10);
            for i in 0..10 {
                codes.push(row.get::<_, u8>(2 + i)?);
            }
            Ok(DrawRecord {
                section: row.get(0)?,
                open_time: row.get(1)?,
                codes,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

pub fn count_records(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

/// Enregistre (ou remplace) une prédiction pour une source et une période.
pub fn upsert_prediction(
    conn: &Connection,
    source: Source,
    section: &str,
    label: &str,
    verdict: Option<Verdict>,
) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO predictions (source, section, label, verdict)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![source.as_str(), section, label, verdict.map(Verdict::as_str)],
    )
    .context("Échec de l'enregistrement de la prédiction")?;
    Ok(())
}

/// Journal complet d'une source : période -> (étiquette, verdict éventuel).
pub fn fetch_predictions(
    conn: &Connection,
    source: Source,
) -> Result<HashMap<String, (String, Option<Verdict>)>> {
    let mut stmt =
        conn.prepare("SELECT section, label, verdict FROM predictions WHERE source = ?1")?;
    let rows = stmt
        .query_map([source.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut predictions = HashMap::new();
    for (section, label, verdict) in rows {
        let verdict = verdict.as_deref().and_then(Verdict::parse);
        predictions.insert(section, (label, verdict));
    }
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_record(section: &str, open_time: &str) -> DrawRecord {
        DrawRecord {
            section: section.to_string(),
            open_time: open_time.to_string(),
            codes: vec![5, 9, 3, 0, 0, 0, 0, 0, 0, 0],
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_records(&conn).unwrap(), 0);

        insert_record(&conn, &test_record("3301", "2026-08-29 10:00:00")).unwrap();
        assert_eq!(count_records(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_section_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert!(insert_record(&conn, &test_record("3301", "2026-08-29 10:00:00")).unwrap());
        assert!(!insert_record(&conn, &test_record("3301", "2026-08-29 10:00:00")).unwrap());
        assert_eq!(count_records(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order_newest_first() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_record(&conn, &test_record("3301", "2026-08-29 10:00:00")).unwrap();
        insert_record(&conn, &test_record("3303", "2026-08-29 10:07:00")).unwrap();
        insert_record(&conn, &test_record("3302", "2026-08-29 10:03:30")).unwrap();

        let records = fetch_last_records(&conn, 10).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].section, "3303");
        assert_eq!(records[1].section, "3302");
        assert_eq!(records[2].section, "3301");
    }

    #[test]
    fn test_short_codes_padded_with_zero() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let mut record = test_record("3301", "2026-08-29 10:00:00");
        record.codes = vec![7, 2];
        insert_record(&conn, &record).unwrap();

        let fetched = fetch_last_records(&conn, 1).unwrap();
        assert_eq!(fetched[0].codes, vec![7, 2, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_prediction_upsert_and_fetch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        upsert_prediction(&conn, Source::KillGroup, "3302", "odd + high-even", None).unwrap();
        upsert_prediction(
            &conn,
            Source::KillGroup,
            "3302",
            "odd + high-even",
            Some(Verdict::Hit),
        )
        .unwrap();
        upsert_prediction(&conn, Source::Ai, "3302", "low-even", None).unwrap();

        let kill = fetch_predictions(&conn, Source::KillGroup).unwrap();
        assert_eq!(kill.len(), 1);
        assert_eq!(
            kill.get("3302"),
            Some(&("odd + high-even".to_string(), Some(Verdict::Hit)))
        );

        let ai = fetch_predictions(&conn, Source::Ai).unwrap();
        assert_eq!(ai.get("3302"), Some(&("low-even".to_string(), None)));
    }
}
