pub mod killgroup;
pub mod reference;

use std::fmt;

use vingthuit_db::models::{DrawRecord, Magnitude, Parity};

/// Axe mis en avant par la règle "groupe à éliminer". La branche paire de
/// l'algorithme d'origine peut renvoyer une étiquette de l'axe opposé ;
/// cette fuite inter-axes est un comportement source à conserver tel quel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLabel {
    Magnitude(Magnitude),
    Parity(Parity),
}

impl AxisLabel {
    pub fn parse(s: &str) -> Option<AxisLabel> {
        match s.trim() {
            "high" => Some(AxisLabel::Magnitude(Magnitude::High)),
            "low" => Some(AxisLabel::Magnitude(Magnitude::Low)),
            "odd" => Some(AxisLabel::Parity(Parity::Odd)),
            "even" => Some(AxisLabel::Parity(Parity::Even)),
            _ => None,
        }
    }
}

impl fmt::Display for AxisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisLabel::Magnitude(m) => write!(f, "{}", m),
            AxisLabel::Parity(p) => write!(f, "{}", p),
        }
    }
}

/// Historique synthétique pour les tests, du plus ancien au plus récent.
pub fn make_test_records(n: usize) -> Vec<DrawRecord> {
    (0..n)
        .map(|i| {
            let mut codes = vec![(i % 10) as u8, (i * 3 % 10) as u8, (i * 7 % 10) as u8];
            codes.resize(10, 0);
            DrawRecord {
                section: format!("{}", 3300 + i),
                codes,
                open_time: format!("2026-08-29 10:{:02}:{:02}", i / 60, i % 60),
            }
        })
        .collect()
}
