use std::fmt;

/// Somme des trois premiers codes : 0 à 27. Le seuil "grand" est 14,
/// soit le milieu arrondi au supérieur.
pub const HIGH_THRESHOLD: u16 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Magnitude {
    High,
    Low,
}

impl Magnitude {
    pub fn opposite(self) -> Self {
        match self {
            Magnitude::High => Magnitude::Low,
            Magnitude::Low => Magnitude::High,
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Magnitude::High => write!(f, "high"),
            Magnitude::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn opposite(self) -> Self {
        match self {
            Parity::Odd => Parity::Even,
            Parity::Even => Parity::Odd,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Odd => write!(f, "odd"),
            Parity::Even => write!(f, "even"),
        }
    }
}

/// Combinaison sur les deux axes, affichée `high-odd`, `low-even`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combo {
    pub magnitude: Magnitude,
    pub parity: Parity,
}

impl Combo {
    pub fn new(magnitude: Magnitude, parity: Parity) -> Self {
        Self { magnitude, parity }
    }

    /// L'opposé exact sur les deux axes.
    pub fn opposite(self) -> Self {
        Self::new(self.magnitude.opposite(), self.parity.opposite())
    }

    pub fn parse(s: &str) -> Option<Combo> {
        let (left, right) = s.trim().split_once('-')?;
        let magnitude = match left {
            "high" => Magnitude::High,
            "low" => Magnitude::Low,
            _ => return None,
        };
        let parity = match right {
            "odd" => Parity::Odd,
            "even" => Parity::Even,
            _ => return None,
        };
        Some(Combo::new(magnitude, parity))
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.magnitude, self.parity)
    }
}

/// Classe la somme des trois premiers codes d'un tirage. Totale : aucun cas d'erreur.
pub fn classify(c1: u8, c2: u8, c3: u8) -> Combo {
    let sum = c1 as u16 + c2 as u16 + c3 as u16;
    Combo::new(
        if sum >= HIGH_THRESHOLD {
            Magnitude::High
        } else {
            Magnitude::Low
        },
        if sum % 2 == 1 { Parity::Odd } else { Parity::Even },
    )
}

/// Résultat rétrospectif d'une prédiction : au moins un axe juste = `Hit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Hit,
    Miss,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Hit => "hit",
            Verdict::Miss => "miss",
        }
    }

    pub fn parse(s: &str) -> Option<Verdict> {
        match s {
            "hit" => Some(Verdict::Hit),
            "miss" => Some(Verdict::Miss),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sources de prédiction suivies par le moteur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Règle locale "référence" (dérivée de la période précédente).
    Reference,
    /// Tableau tiers "groupe à éliminer".
    KillGroup,
    /// Complétion DeepSeek.
    Ai,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Reference => "reference",
            Source::KillGroup => "killgroup",
            Source::Ai => "ai",
        }
    }
}

/// Une période terminée telle que servie par le site : identifiant textuel,
/// jusqu'à dix codes (seuls les trois premiers sont significatifs) et heure
/// d'ouverture. Moins de trois codes = période inexploitable, exclue de
/// toute classification, prédiction ou scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub section: String,
    pub codes: Vec<u8>,
    pub open_time: String,
}

impl DrawRecord {
    pub fn has_codes(&self) -> bool {
        self.codes.len() >= 3
    }

    pub fn sum(&self) -> Option<u16> {
        if !self.has_codes() {
            return None;
        }
        Some(self.codes[0] as u16 + self.codes[1] as u16 + self.codes[2] as u16)
    }

    pub fn outcome(&self) -> Option<Combo> {
        if !self.has_codes() {
            return None;
        }
        Some(classify(self.codes[0], self.codes[1], self.codes[2]))
    }

    pub fn next_section(&self) -> Option<String> {
        next_section(&self.section)
    }
}

/// Période suivante = période + 1. None quand l'identifiant n'est pas
/// numérique ; jamais d'erreur propagée.
pub fn next_section(section: &str) -> Option<String> {
    section
        .trim()
        .parse::<i64>()
        .ok()
        .map(|n| (n + 1).to_string())
}
