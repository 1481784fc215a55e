use vingthuit_db::models::{Combo, Magnitude, Parity};

use crate::predictors::AxisLabel;

fn combo(magnitude: Magnitude, parity: Parity) -> Combo {
    Combo::new(magnitude, parity)
}

/// Table d'expansion des quatre étiquettes nues (règle d'affichage
/// d'origine, exhaustive) : l'étiquette prédite plus ses deux voisines,
/// dans un ordre fixe.
fn expand_bare(label: Combo) -> Vec<Combo> {
    use Magnitude::{High, Low};
    use Parity::{Even, Odd};
    match (label.magnitude, label.parity) {
        (High, Odd) => vec![combo(High, Odd), combo(High, Even), combo(Low, Odd)],
        (High, Even) => vec![combo(High, Odd), combo(High, Even), combo(Low, Even)],
        (Low, Odd) => vec![combo(High, Odd), combo(Low, Odd), combo(Low, Even)],
        (Low, Even) => vec![combo(High, Even), combo(Low, Odd), combo(Low, Even)],
    }
}

/// Forme "axe principal + combo" : les deux combinaisons de l'axe principal
/// (ordre fixe), puis le combo s'il n'y figure pas déjà.
fn expand_primary(primary: AxisLabel, extra: Combo) -> Vec<Combo> {
    use Magnitude::{High, Low};
    use Parity::{Even, Odd};
    let mut out = match primary {
        AxisLabel::Magnitude(High) => vec![combo(High, Odd), combo(High, Even)],
        AxisLabel::Magnitude(Low) => vec![combo(Low, Even), combo(Low, Odd)],
        AxisLabel::Parity(Odd) => vec![combo(High, Odd), combo(Low, Odd)],
        AxisLabel::Parity(Even) => vec![combo(High, Even), combo(Low, Even)],
    };
    if !out.contains(&extra) {
        out.push(extra);
    }
    out
}

/// Liste des combinaisons couvertes par une étiquette de pronostic.
/// None = entrée inconnue (place-holder, texte d'erreur distant...),
/// à afficher telle quelle.
pub fn expand_labels(input: &str) -> Option<Vec<Combo>> {
    let input = input.trim();
    if let Some((left, right)) = input.split_once('+') {
        let primary = AxisLabel::parse(left)?;
        let extra = Combo::parse(right)?;
        return Some(expand_primary(primary, extra));
    }
    Combo::parse(input).map(expand_bare)
}

/// Chaîne de candidats concaténés sans séparateur, comme sur le site
/// d'origine. Les entrées inconnues passent inchangées.
pub fn expand(input: &str) -> String {
    match expand_labels(input) {
        Some(labels) => labels.iter().map(Combo::to_string).collect(),
        None => input.to_string(),
    }
}
