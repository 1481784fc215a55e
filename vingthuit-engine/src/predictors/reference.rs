use vingthuit_db::models::{Combo, DrawRecord, Magnitude, Parity};

/// Pronostic de la règle "référence" pour la période suivante.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceForecast {
    pub guess: Combo,
    /// Combinaison à éviter : l'opposé exact sur les deux axes.
    /// Indicative seulement, jamais prise en compte par le scoring.
    pub kill: Combo,
}

/// Dérive le pronostic depuis les trois premiers codes de la période
/// précédente. None quand la période a moins de trois codes : l'appelant
/// affiche "données insuffisantes", jamais un pronostic par défaut.
pub fn forecast(prev: &DrawRecord) -> Option<ReferenceForecast> {
    if !prev.has_codes() {
        return None;
    }
    let (c1, c2, c3) = (
        prev.codes[0] as u16,
        prev.codes[1] as u16,
        prev.codes[2] as u16,
    );

    // Règle d'origine : seuls c2+c3 comptent pour l'axe grand/petit, avec un
    // seuil > 13 distinct du classement (somme des trois >= 14).
    let magnitude = if c2 + c3 > 13 {
        Magnitude::High
    } else {
        Magnitude::Low
    };
    let parity = if (c1 + c2) % 2 == 1 {
        Parity::Odd
    } else {
        Parity::Even
    };

    let guess = Combo::new(magnitude, parity);
    Some(ReferenceForecast {
        guess,
        kill: guess.opposite(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(codes: &[u8]) -> DrawRecord {
        DrawRecord {
            section: "3301".to_string(),
            codes: codes.to_vec(),
            open_time: "2026-08-29 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_forecast_reference_scenario() {
        // (5, 9, 3) : c2+c3 = 12 <= 13 -> low ; c1+c2 = 14 pair -> even.
        let f = forecast(&record(&[5, 9, 3])).unwrap();
        assert_eq!(f.guess, Combo::parse("low-even").unwrap());
        assert_eq!(f.kill, Combo::parse("high-odd").unwrap());
    }

    #[test]
    fn test_forecast_magnitude_threshold() {
        // c2+c3 = 13 : low ; c2+c3 = 14 : high.
        assert_eq!(
            forecast(&record(&[0, 6, 7])).unwrap().guess.magnitude,
            Magnitude::Low
        );
        assert_eq!(
            forecast(&record(&[0, 7, 7])).unwrap().guess.magnitude,
            Magnitude::High
        );
    }

    #[test]
    fn test_forecast_parity_rule() {
        // c1+c2 impair -> odd.
        assert_eq!(
            forecast(&record(&[2, 3, 0])).unwrap().guess.parity,
            Parity::Odd
        );
        assert_eq!(
            forecast(&record(&[2, 4, 0])).unwrap().guess.parity,
            Parity::Even
        );
    }

    #[test]
    fn test_forecast_insufficient_codes() {
        assert!(forecast(&record(&[5, 9])).is_none());
        assert!(forecast(&record(&[])).is_none());
    }

    #[test]
    fn test_forecast_deterministic() {
        let r = record(&[5, 9, 3]);
        assert_eq!(forecast(&r), forecast(&r));
    }
}
