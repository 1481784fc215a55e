use std::fmt;

use vingthuit_db::models::{Combo, DrawRecord, Magnitude, Parity};

use super::AxisLabel;

/// Pronostic de la règle "groupe à éliminer" : un axe principal, une
/// combinaison recommandée et le groupe à écarter (opposé sur les deux axes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillGroupForecast {
    pub primary: AxisLabel,
    pub combo: Combo,
    pub kill: Combo,
}

impl fmt::Display for KillGroupForecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.primary, self.combo)
    }
}

/// Algorithme d'origine, sensible à l'ordre des branches — ne pas
/// simplifier. La branche paire mélange les deux axes (elle peut renvoyer
/// `low`) : comportement source conservé à l'identique.
pub fn forecast(prev: &DrawRecord) -> Option<KillGroupForecast> {
    if !prev.has_codes() {
        return None;
    }
    let (c1, c2, c3) = (
        prev.codes[0] as u16,
        prev.codes[1] as u16,
        prev.codes[2] as u16,
    );
    let s12 = c1 + c2;
    let s23 = c2 + c3;

    let primary = if s12 % 2 == 1 {
        if s12 <= 9 {
            AxisLabel::Parity(Parity::Even)
        } else {
            AxisLabel::Parity(Parity::Odd)
        }
    } else if s12 <= 4 {
        AxisLabel::Parity(Parity::Even)
    } else if s12 <= 8 {
        AxisLabel::Magnitude(Magnitude::Low)
    } else {
        AxisLabel::Parity(Parity::Odd)
    };

    let combo_magnitude = if s23 <= 13 {
        Magnitude::High
    } else {
        Magnitude::Low
    };
    let combo_parity = match primary {
        AxisLabel::Parity(p) => p.opposite(),
        AxisLabel::Magnitude(Magnitude::High) => Parity::Odd,
        AxisLabel::Magnitude(Magnitude::Low) => Parity::Even,
    };
    let combo = Combo::new(combo_magnitude, combo_parity);

    let kill = match primary {
        AxisLabel::Magnitude(m) => Combo::new(m.opposite(), combo.parity.opposite()),
        AxisLabel::Parity(p) => Combo::new(combo.magnitude.opposite(), p.opposite()),
    };

    Some(KillGroupForecast {
        primary,
        combo,
        kill,
    })
}
