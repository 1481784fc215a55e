use vingthuit_db::models::{DrawRecord, Verdict};

/// Fenêtre glissante par défaut : les 20 périodes suivant la ligne courante.
pub const DEFAULT_WINDOW: usize = 20;

/// Taux de réussite sur la tranche `[start, start + window)` d'un historique
/// ordonné du plus récent au plus ancien (tranche bornée à la longueur
/// disponible). Les périodes sans verdict enregistré ne comptent ni au
/// numérateur ni au dénominateur. `"--"` quand rien n'est comptabilisable,
/// sinon un pourcentage à une décimale.
pub fn rolling_win_rate<F>(
    records: &[DrawRecord],
    start: usize,
    window: usize,
    verdict_of: F,
) -> String
where
    F: Fn(&DrawRecord) -> Option<Verdict>,
{
    if start >= records.len() {
        return "--".to_string();
    }
    let end = (start + window).min(records.len());

    let mut correct = 0u32;
    let mut total = 0u32;
    for record in &records[start..end] {
        match verdict_of(record) {
            Some(Verdict::Hit) => {
                correct += 1;
                total += 1;
            }
            Some(Verdict::Miss) => total += 1,
            None => {}
        }
    }

    if total == 0 {
        return "--".to_string();
    }
    format!("{:.1}%", correct as f64 * 100.0 / total as f64)
}
