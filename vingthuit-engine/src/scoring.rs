use std::collections::HashMap;

use vingthuit_db::models::{Combo, DrawRecord, Verdict};

/// Score rétrospectif : pour chaque paire adjacente (précédente, cible) de
/// l'historique en ordre chronologique (du plus ancien au plus récent),
/// applique le prédicteur à la période précédente et compare au résultat
/// réel de la cible. Un seul axe juste suffit (OU, pas ET).
///
/// Les paires dont un côté a moins de trois codes sont absentes du résultat,
/// jamais comptées comme des échecs.
pub fn score_adjacent<F>(records: &[DrawRecord], guess_of: F) -> HashMap<String, Verdict>
where
    F: Fn(&DrawRecord) -> Option<Combo>,
{
    let mut verdicts = HashMap::new();
    for pair in records.windows(2) {
        let (prev, target) = (&pair[0], &pair[1]);
        let outcome = match target.outcome() {
            Some(outcome) => outcome,
            None => continue,
        };
        let guess = match guess_of(prev) {
            Some(guess) => guess,
            None => continue,
        };
        let correct = guess.magnitude == outcome.magnitude || guess.parity == outcome.parity;
        verdicts.insert(
            target.section.clone(),
            if correct { Verdict::Hit } else { Verdict::Miss },
        );
    }
    verdicts
}

/// Verdict d'une étiquette enregistrée face au résultat réel d'une période.
/// None quand la période est inexploitable.
pub fn verdict_against(guess: Combo, record: &DrawRecord) -> Option<Verdict> {
    let outcome = record.outcome()?;
    let correct = guess.magnitude == outcome.magnitude || guess.parity == outcome.parity;
    Some(if correct { Verdict::Hit } else { Verdict::Miss })
}
