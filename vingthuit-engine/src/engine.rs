use std::collections::HashMap;

use vingthuit_db::models::{Combo, DrawRecord, Verdict};

use crate::predictors::{killgroup, reference};
use crate::{scoring, winrate};

/// Prédiction issue du tableau tiers : l'étiquette affichable et le verdict
/// rapporté par la source elle-même. Quand elle existe pour une période,
/// elle prime sur le calcul local (qui ne sert qu'à l'affichage de repli).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPrediction {
    pub display: String,
    pub verdict: Option<Verdict>,
}

/// Ligne de la table d'historique consommée par la couche de présentation.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub section: String,
    pub open_time: String,
    pub codes: Option<[u8; 3]>,
    pub sum: Option<u16>,
    pub outcome: Option<Combo>,
    pub reference: Option<Verdict>,
    pub kill_group: Option<Verdict>,
    pub ai: Option<Verdict>,
    pub reference_rate: String,
    pub kill_group_rate: String,
    pub ai_rate: String,
}

/// État unique du moteur : l'historique des périodes et les journaux de
/// prédiction par source, rien d'autre. Aucune E/S ; tout se recalcule à
/// chaque rafraîchissement à partir de ces listes.
#[derive(Debug, Default)]
pub struct Engine {
    /// Du plus récent au plus ancien.
    records: Vec<DrawRecord>,
    kill_group: HashMap<String, ExternalPrediction>,
    ai: HashMap<String, Combo>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace l'historique. La source ne garantit aucun ordre : tri stable
    /// par heure d'ouverture, du plus récent au plus ancien.
    pub fn set_records(&mut self, mut records: Vec<DrawRecord>) {
        records.sort_by(|a, b| b.open_time.cmp(&a.open_time));
        self.records = records;
    }

    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&DrawRecord> {
        self.records.first()
    }

    /// Période qui suit la plus récente ; None si l'identifiant n'est pas
    /// numérique ou si l'historique est vide.
    pub fn next_section(&self) -> Option<String> {
        self.latest().and_then(DrawRecord::next_section)
    }

    pub fn absorb_kill_group(&mut self, predictions: HashMap<String, ExternalPrediction>) {
        self.kill_group.extend(predictions);
    }

    pub fn record_ai(&mut self, section: &str, label: Combo) {
        self.ai.insert(section.to_string(), label);
    }

    pub fn ai_prediction(&self, section: &str) -> Option<Combo> {
        self.ai.get(section).copied()
    }

    pub fn kill_group_prediction(&self, section: &str) -> Option<&ExternalPrediction> {
        self.kill_group.get(section)
    }

    /// Étiquette "groupe à éliminer" pour une période à venir : la valeur
    /// externe si elle existe, sinon le calcul local depuis la dernière
    /// période connue.
    pub fn kill_group_display(&self, section: &str) -> Option<String> {
        if let Some(prediction) = self.kill_group.get(section) {
            return Some(prediction.display.clone());
        }
        self.latest()
            .and_then(killgroup::forecast)
            .map(|f| f.to_string())
    }

    /// Verdicts rétrospectifs de la règle référence, période par période.
    pub fn reference_verdicts(&self) -> HashMap<String, Verdict> {
        let chronological: Vec<DrawRecord> = self.records.iter().rev().cloned().collect();
        scoring::score_adjacent(&chronological, |prev| {
            reference::forecast(prev).map(|f| f.guess)
        })
    }

    fn kill_group_verdict(&self, record: &DrawRecord) -> Option<Verdict> {
        self.kill_group.get(&record.section).and_then(|p| p.verdict)
    }

    fn ai_verdict(&self, record: &DrawRecord) -> Option<Verdict> {
        let guess = self.ai.get(&record.section)?;
        scoring::verdict_against(*guess, record)
    }

    /// Instantané de présentation : une ligne par période (au plus `limit`),
    /// chaque ligne avec son propre taux de réussite sur la fenêtre des 20
    /// périodes qui la suivent.
    pub fn snapshot(&self, limit: usize) -> Vec<TableRow> {
        let reference = self.reference_verdicts();

        self.records
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, record)| {
                let codes = if record.has_codes() {
                    Some([record.codes[0], record.codes[1], record.codes[2]])
                } else {
                    None
                };
                TableRow {
                    section: record.section.clone(),
                    open_time: record.open_time.clone(),
                    codes,
                    sum: record.sum(),
                    outcome: record.outcome(),
                    reference: reference.get(&record.section).copied(),
                    kill_group: self.kill_group_verdict(record),
                    ai: self.ai_verdict(record),
                    reference_rate: winrate::rolling_win_rate(
                        &self.records,
                        i,
                        winrate::DEFAULT_WINDOW,
                        |r| reference.get(&r.section).copied(),
                    ),
                    kill_group_rate: winrate::rolling_win_rate(
                        &self.records,
                        i,
                        winrate::DEFAULT_WINDOW,
                        |r| self.kill_group_verdict(r),
                    ),
                    ai_rate: winrate::rolling_win_rate(
                        &self.records,
                        i,
                        winrate::DEFAULT_WINDOW,
                        |r| self.ai_verdict(r),
                    ),
                }
            })
            .collect()
    }
}

/// Compte à rebours local piloté par un tic d'une seconde, resynchronisé sur
/// la valeur serveur à chaque rafraîchissement.
#[derive(Debug, Clone, Copy, Default)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn sync(&mut self, seconds: u32) {
        self.remaining = seconds;
    }

    /// Décrémente d'une seconde ; true quand le compte atteint zéro (signal
    /// de rafraîchissement).
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn format_mmss(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(section: &str, codes: &[u8], minute: u32) -> DrawRecord {
        DrawRecord {
            section: section.to_string(),
            codes: codes.to_vec(),
            open_time: format!("2026-08-29 10:{:02}:00", minute),
        }
    }

    fn engine_with_history() -> Engine {
        let mut engine = Engine::new();
        // Fournies en désordre : le moteur doit trier lui-même.
        engine.set_records(vec![
            record("3302", &[5, 9, 0], 1), // high-even
            record("3301", &[5, 9, 3], 0), // high-odd
            record("3303", &[1, 1, 1], 2), // low-odd
        ]);
        engine
    }

    #[test]
    fn test_set_records_sorts_newest_first() {
        let engine = engine_with_history();
        let sections: Vec<_> = engine.records().iter().map(|r| r.section.as_str()).collect();
        assert_eq!(sections, vec!["3303", "3302", "3301"]);
        assert_eq!(engine.next_section(), Some("3304".to_string()));
    }

    #[test]
    fn test_snapshot_reference_columns() {
        let engine = engine_with_history();
        let rows = engine.snapshot(10);
        assert_eq!(rows.len(), 3);

        // 3301 prédit low-even pour 3302 ; réel high-even -> hit.
        // 3302 prédit low-even pour 3303 ; réel low-odd -> hit.
        assert_eq!(rows[0].section, "3303");
        assert_eq!(rows[0].reference, Some(Verdict::Hit));
        assert_eq!(rows[1].reference, Some(Verdict::Hit));
        assert_eq!(rows[2].reference, None); // pas de période précédente
        assert_eq!(rows[0].reference_rate, "100.0%");
        assert_eq!(rows[2].reference_rate, "--");
    }

    #[test]
    fn test_snapshot_ai_verdicts() {
        let mut engine = engine_with_history();
        engine.record_ai("3303", Combo::parse("high-odd").unwrap()); // réel low-odd -> hit (parité)
        engine.record_ai("3302", Combo::parse("low-odd").unwrap()); // réel high-even -> miss

        let rows = engine.snapshot(10);
        assert_eq!(rows[0].ai, Some(Verdict::Hit));
        assert_eq!(rows[1].ai, Some(Verdict::Miss));
        assert_eq!(rows[2].ai, None);
        assert_eq!(rows[0].ai_rate, "50.0%");
    }

    #[test]
    fn test_kill_group_external_precedence() {
        let mut engine = engine_with_history();
        let mut external = HashMap::new();
        external.insert(
            "3303".to_string(),
            ExternalPrediction {
                display: "odd + high-even".to_string(),
                verdict: Some(Verdict::Miss),
            },
        );
        engine.absorb_kill_group(external);

        // La valeur externe prime, verdict rapporté compris.
        assert_eq!(
            engine.kill_group_display("3303"),
            Some("odd + high-even".to_string())
        );
        let rows = engine.snapshot(10);
        assert_eq!(rows[0].kill_group, Some(Verdict::Miss));
        assert_eq!(rows[1].kill_group, None);

        // Pas de valeur externe pour 3304 : repli sur le calcul local
        // depuis la dernière période (1,1,1).
        let local = engine.kill_group_display("3304").unwrap();
        assert_eq!(local, killgroup::forecast(engine.latest().unwrap()).unwrap().to_string());
    }

    #[test]
    fn test_snapshot_insufficient_row() {
        let mut engine = Engine::new();
        engine.set_records(vec![record("3301", &[7], 0)]);
        let rows = engine.snapshot(10);
        assert_eq!(rows[0].codes, None);
        assert_eq!(rows[0].sum, None);
        assert_eq!(rows[0].outcome, None);
        assert_eq!(rows[0].reference, None);
    }

    #[test]
    fn test_countdown() {
        let mut countdown = Countdown::default();
        countdown.sync(210);
        assert_eq!(countdown.format_mmss(), "03:30");
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), 209);

        countdown.sync(1);
        assert!(countdown.tick());
        assert!(countdown.tick()); // reste à zéro
        assert_eq!(countdown.format_mmss(), "00:00");
    }
}
