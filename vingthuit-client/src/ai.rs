use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vingthuit_db::models::{Combo, DrawRecord};

pub const DEEPSEEK_URL: &str = "https://api.deepseek.com/v1/chat/completions";

/// Nombre de périodes fournies en contexte au modèle.
const CONTEXT_DRAWS: usize = 20;

const VALID_LABELS: [&str; 4] = ["high-odd", "high-even", "low-odd", "low-even"];

#[derive(Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

/// Prédicteur DeepSeek : une source de plus derrière la même interface que
/// le tableau tiers (période -> étiquette ou rien).
pub struct DeepSeekPredictor {
    client: Client,
    token: String,
}

impl DeepSeekPredictor {
    pub fn new(token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Impossible de construire le client DeepSeek")?;
        Ok(Self {
            client,
            token: token.to_string(),
        })
    }

    /// Demande une étiquette pour la période cible. `Ok(None)` quand la
    /// réponse ne contient aucune étiquette valide : on n'enregistre alors
    /// aucune prédiction, on n'en fabrique jamais.
    pub fn predict(&self, records: &[DrawRecord], target_section: &str) -> Result<Option<Combo>> {
        let request = ChatRequest {
            model: "deepseek-chat",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "Tu es un assistant d'analyse de séries du tirage Canada 28."
                        .to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(records, target_section),
                },
            ],
            temperature: 0.6,
            max_tokens: 16,
        };

        let response = self
            .client
            .post(DEEPSEEK_URL)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .context("Échec de l'appel DeepSeek")?
            .error_for_status()
            .context("Statut DeepSeek en erreur")?;

        let parsed: ChatResponse = response.json().context("Réponse DeepSeek invalide")?;
        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or("");
        debug!(reply = content, "réponse DeepSeek");
        Ok(extract_label(content))
    }
}

/// Invite construite sur les dernières périodes, de la plus récente à la
/// plus ancienne ; les périodes inexploitables sont omises du contexte.
pub fn build_prompt(records: &[DrawRecord], target_section: &str) -> String {
    let mut lines = Vec::new();
    for record in records.iter().take(CONTEXT_DRAWS) {
        if let (Some(sum), Some(outcome)) = (record.sum(), record.outcome()) {
            lines.push(format!("période {} somme {} {}", record.section, sum, outcome));
        }
    }
    format!(
        "Voici les dernières périodes du tirage Canada 28, de la plus récente à la plus \
         ancienne (format : période, somme, catégorie) :\n{}\n\nPériode à prédire : {}.\n\
         Réponds strictement par une seule de ces quatre étiquettes : high-odd, high-even, \
         low-odd, low-even. Aucun autre texte.",
        lines.join("\n"),
        target_section
    )
}

/// Première étiquette valide trouvée dans la réponse ; None sinon.
pub fn extract_label(reply: &str) -> Option<Combo> {
    VALID_LABELS
        .iter()
        .find(|label| reply.contains(*label))
        .and_then(|label| Combo::parse(label))
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
    fn test_build_prompt_lists_usable_records() {
        let records = vec![
            record("3303", &[1, 1, 1]),
            record("3302", &[5, 9]), // omise : codes insuffisants
            record("3301", &[5, 9, 3]),
        ];
        let prompt = build_prompt(&records, "3304");
        assert!(prompt.contains("période 3303 somme 3 low-odd"));
        assert!(prompt.contains("période 3301 somme 17 high-odd"));
        assert!(!prompt.contains("3302 somme"));
        assert!(prompt.contains("Période à prédire : 3304."));
    }

    #[test]
    fn test_extract_label() {
        assert_eq!(extract_label("low-even"), Combo::parse("low-even"));
        assert_eq!(
            extract_label("Je prédis high-even pour cette période."),
            Combo::parse("high-even")
        );
        assert_eq!(extract_label("aucune idée"), None);
        assert_eq!(extract_label(""), None);
    }
}
