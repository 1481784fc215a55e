use vingthuit_db::models::{DrawRecord, Magnitude, Parity};

/// Répartition des catégories sur une fenêtre d'historique. `total` compte
/// toutes les périodes, les compteurs par axe seulement celles qui ont au
/// moins trois codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub total: usize,
    pub high: usize,
    pub low: usize,
    pub odd: usize,
    pub even: usize,
}

pub fn count_outcomes(records: &[DrawRecord]) -> OutcomeCounts {
    let mut counts = OutcomeCounts {
        total: records.len(),
        ..Default::default()
    };
    for record in records {
        if let Some(outcome) = record.outcome() {
            match outcome.magnitude {
                Magnitude::High => counts.high += 1,
                Magnitude::Low => counts.low += 1,
            }
            match outcome.parity {
                Parity::Odd => counts.odd += 1,
                Parity::Even => counts.even += 1,
            }
        }
    }
    counts
}

/// Séries en cours : combien de périodes consécutives, en partant de la plus
/// récente, partagent la même grandeur (resp. la même parité).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakSummary {
    pub magnitude: Magnitude,
    pub magnitude_run: usize,
    pub parity: Parity,
    pub parity_run: usize,
}

/// Historique du plus récent au plus ancien. None quand la dernière période
/// est inexploitable.
pub fn current_streaks(records: &[DrawRecord]) -> Option<StreakSummary> {
    let latest = records.first()?.outcome()?;

    let mut magnitude_run = 0;
    for record in records {
        match record.outcome() {
            Some(outcome) if outcome.magnitude == latest.magnitude => magnitude_run += 1,
            _ => break,
        }
    }

    let mut parity_run = 0;
    for record in records {
        match record.outcome() {
            Some(outcome) if outcome.parity == latest.parity => parity_run += 1,
            _ => break,
        }
    }

    Some(StreakSummary {
        magnitude: latest.magnitude,
        magnitude_run,
        parity: latest.parity,
        parity_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(section: &str, codes: &[u8]) -> DrawRecord {
        DrawRecord {
            section: section.to_string(),
            codes: codes.to_vec(),
            open_time: String::new(),
        }
    }

    #[test]
    fn test_count_outcomes() {
        let records = vec![
            record("3303", &[9, 9, 9]), // high-odd
            record("3302", &[5, 9, 0]), // high-even
            record("3301", &[1, 1, 1]), // low-odd
            record("3300", &[1, 2]),    // inexploitable
        ];
        let counts = count_outcomes(&records);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.odd, 2);
        assert_eq!(counts.even, 1);
    }

    #[test]
    fn test_current_streaks() {
        // Du plus récent au plus ancien : high-odd, high-even, low-odd.
        let records = vec![
            record("3303", &[9, 9, 9]),
            record("3302", &[5, 9, 0]),
            record("3301", &[1, 1, 1]),
        ];
        let streaks = current_streaks(&records).unwrap();
        assert_eq!(streaks.magnitude, Magnitude::High);
        assert_eq!(streaks.magnitude_run, 2);
        assert_eq!(streaks.parity, Parity::Odd);
        assert_eq!(streaks.parity_run, 1);
    }

    #[test]
    fn test_current_streaks_broken_by_insufficient() {
        let records = vec![
            record("3303", &[9, 9, 9]),
            record("3302", &[1]),
            record("3301", &[9, 9, 8]),
        ];
        let streaks = current_streaks(&records).unwrap();
        assert_eq!(streaks.magnitude_run, 1);
        assert_eq!(streaks.parity_run, 1);
    }

    #[test]
    fn test_current_streaks_unusable_latest() {
        assert!(current_streaks(&[record("3303", &[1])]).is_none());
        assert!(current_streaks(&[]).is_none());
    }
}
