use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use vingthuit_db::models::DrawRecord;

pub const BASE_URL: &str = "https://pc28yb.com/";

/// Durée annoncée d'une période : 3 min 30.
pub const DEFAULT_PERIOD_SECONDS: u32 = 210;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Période à venir annoncée par le site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextInfo {
    pub section: String,
    /// Compte à rebours serveur, en secondes.
    pub countdown: u32,
}

/// Client HTTP du site de tirage. Toutes les requêtes sont bloquantes et
/// bornées à 10 secondes ; les relances éventuelles sont à la charge de
/// l'appelant, jamais du moteur.
pub struct Pc28Client {
    pub(crate) client: Client,
    base_url: String,
}

impl Pc28Client {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .context("Impossible de construire le client HTTP")?;
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { client, base_url })
    }

    fn get_index(&self, params: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}index.php", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .with_context(|| format!("Échec de la requête {}", url))?
            .error_for_status()
            .context("Statut HTTP en erreur")?;
        Ok(response.text()?)
    }

    /// Période suivante et compte à rebours (`action=next`).
    pub fn next_info(&self) -> Result<NextInfo> {
        let text = self.get_index(&[("gameType", "jnd28"), ("action", "next")])?;
        let value: Value =
            serde_json::from_str(&text).context("JSON invalide pour action=next")?;
        let info = NextInfo {
            section: lenient_string(&value["section"]),
            countdown: lenient_u32(&value["djs"]).unwrap_or(DEFAULT_PERIOD_SECONDS),
        };
        debug!(section = %info.section, countdown = info.countdown, "période suivante");
        Ok(info)
    }

    /// Historique détaillé (`action=getMyOpensJson`). Aucun ordre garanti ;
    /// les champs de code manquants ou non numériques valent 0.
    pub fn open_records(&self, limit: usize) -> Result<Vec<DrawRecord>> {
        let text = self.get_index(&[("action", "getMyOpensJson")])?;
        let value: Value =
            serde_json::from_str(&text).context("JSON invalide pour getMyOpensJson")?;
        let data = value["data"].as_array().cloned().unwrap_or_default();
        let records: Vec<DrawRecord> = data.iter().take(limit).map(parse_entry).collect();
        debug!(count = records.len(), "historique récupéré");
        Ok(records)
    }
}

/// Une entrée brute du site : champs tolérés absents ou mal typés,
/// jamais d'erreur.
pub fn parse_entry(item: &Value) -> DrawRecord {
    let codes = (1..=10)
        .map(|i| {
            let key = format!("openCode{}", i);
            lenient_u32(&item[key.as_str()])
                .map(|n| n.min(u8::MAX as u32) as u8)
                .unwrap_or(0)
        })
        .collect();
    DrawRecord {
        section: lenient_string(&item["section"]),
        codes,
        open_time: lenient_string(&item["openTime"]),
    }
}

fn lenient_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn lenient_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n.min(u32::MAX as u64) as u32),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}
