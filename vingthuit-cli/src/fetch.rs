use std::collections::HashMap;

use anyhow::{Context, Result};

use vingthuit_db::db::{insert_record, upsert_prediction};
use vingthuit_db::models::{DrawRecord, Source};
use vingthuit_db::rusqlite::Connection;
use vingthuit_engine::engine::ExternalPrediction;

pub struct FetchSummary {
    pub total: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Verse un lot de périodes dans le cache, en une seule transaction.
/// Les doublons sont ignorés, les entrées sans identifiant comptées en
/// erreur ; on n'abandonne jamais le lot pour une ligne.
pub fn cache_records(conn: &Connection, records: &[DrawRecord]) -> Result<FetchSummary> {
    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut summary = FetchSummary {
        total: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record in records {
        summary.total += 1;
        if record.section.is_empty() {
            summary.errors += 1;
            continue;
        }
        match insert_record(&tx, record) {
            Ok(true) => summary.inserted += 1,
            Ok(false) => summary.skipped += 1,
            Err(e) => {
                eprintln!("Erreur insertion période {}: {}", record.section, e);
                summary.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(summary)
}

/// Journalise les prédictions du tableau tiers. Un nouvel appel remplace
/// l'entrée d'une période : le verdict arrive souvent un cycle après
/// l'étiquette.
pub fn cache_kill_group(
    conn: &Connection,
    predictions: &HashMap<String, ExternalPrediction>,
) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;
    for (section, prediction) in predictions {
        upsert_prediction(
            &tx,
            Source::KillGroup,
            section,
            &prediction.display,
            prediction.verdict,
        )?;
    }
    tx.commit().context("Échec du commit")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vingthuit_db::db::{count_records, fetch_predictions, migrate};
    use vingthuit_db::models::Verdict;

    fn record(section: &str, minute: u32) -> DrawRecord {
        DrawRecord {
            section: section.to_string(),
            codes: vec![5, 9, 3],
            open_time: format!("2026-08-29 10:{:02}:00", minute),
        }
    }

    #[test]
    fn test_cache_records_counts() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let records = vec![
            record("3301", 0),
            record("3302", 3),
            record("3301", 0), // doublon
            record("", 7),     // entrée sans identifiant
        ];
        let summary = cache_records(&conn, &records).unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(count_records(&conn).unwrap(), 2);
    }

    #[test]
    fn test_cache_kill_group_upserts_verdict() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let mut predictions = HashMap::new();
        predictions.insert(
            "3302".to_string(),
            ExternalPrediction {
                display: "odd + high-even".to_string(),
                verdict: None,
            },
        );
        cache_kill_group(&conn, &predictions).unwrap();

        // Le cycle suivant apporte le verdict.
        predictions.get_mut("3302").unwrap().verdict = Some(Verdict::Hit);
        cache_kill_group(&conn, &predictions).unwrap();

        let stored = fetch_predictions(&conn, Source::KillGroup).unwrap();
        assert_eq!(
            stored.get("3302"),
            Some(&("odd + high-even".to_string(), Some(Verdict::Hit)))
        );
    }
}
