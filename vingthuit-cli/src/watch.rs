use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use vingthuit_client::ai::DeepSeekPredictor;
use vingthuit_client::client::{DEFAULT_PERIOD_SECONDS, Pc28Client};
use vingthuit_client::token::{load_token, token_path};
use vingthuit_db::db::upsert_prediction;
use vingthuit_db::models::Source;
use vingthuit_db::rusqlite::Connection;
use vingthuit_engine::engine::Countdown;
use vingthuit_engine::format::expand;

use crate::display::display_rows;
use crate::fetch::{cache_kill_group, cache_records};
use crate::{build_engine, HISTORY_FETCH_LIMIT};

/// Marge après la fin du compte à rebours : le site publie rarement à la
/// seconde près.
const REFRESH_MARGIN_SECONDS: u64 = 3;

/// Boucle de suivi : rafraîchit le cache et l'affichage à chaque période,
/// puis attend la suivante derrière un compte à rebours local resynchronisé
/// sur le serveur. S'arrête avec Ctrl-C.
pub fn run_watch(conn: &Connection, limit: usize) -> Result<()> {
    let client = Pc28Client::new()?;
    let predictor = match load_token(&token_path()) {
        Some(token) => Some(DeepSeekPredictor::new(&token)?),
        None => {
            println!("Aucun jeton DeepSeek : pronostic IA désactivé (vingthuit token <valeur>).");
            None
        }
    };

    loop {
        let countdown_secs = match refresh_once(conn, &client, predictor.as_ref(), limit) {
            Ok(secs) => secs,
            Err(error) => {
                warn!(%error, "rafraîchissement en échec, nouvel essai au prochain cycle");
                DEFAULT_PERIOD_SECONDS
            }
        };

        wait_for_next_period(countdown_secs);
        thread::sleep(Duration::from_secs(REFRESH_MARGIN_SECONDS));
    }
}

/// Un cycle complet : historique, tableau tiers, pronostics, affichage.
/// Renvoie le compte à rebours serveur jusqu'à la période suivante.
fn refresh_once(
    conn: &Connection,
    client: &Pc28Client,
    predictor: Option<&DeepSeekPredictor>,
    limit: usize,
) -> Result<u32> {
    let records = client.open_records(limit.max(HISTORY_FETCH_LIMIT as usize))?;
    cache_records(conn, &records)?;

    let kill_group = client.shazu_predictions();
    cache_kill_group(conn, &kill_group)?;

    let mut engine = build_engine(conn, HISTORY_FETCH_LIMIT)?;
    let info = client.next_info()?;

    if let Some(predictor) = predictor {
        // Un seul appel par période : on ne redemande pas une étiquette
        // déjà journalisée.
        if !info.section.is_empty() && engine.ai_prediction(&info.section).is_none() {
            match predictor.predict(engine.records(), &info.section) {
                Ok(Some(label)) => {
                    upsert_prediction(conn, Source::Ai, &info.section, &label.to_string(), None)?;
                    engine.record_ai(&info.section, label);
                }
                Ok(None) => warn!(section = %info.section, "réponse IA sans étiquette exploitable"),
                Err(error) => warn!(%error, "appel IA en échec"),
            }
        }
    }

    display_rows(&engine.snapshot(limit));

    let eta = Local::now() + chrono::Duration::seconds(info.countdown as i64);
    println!(
        "\nProchaine période : {} (vers {})",
        info.section,
        eta.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(display) = engine.kill_group_display(&info.section) {
        println!("  Groupe à éliminer : {} -> {}", display, expand(&display));
    }
    if let Some(label) = engine.ai_prediction(&info.section) {
        println!("  Pronostic IA      : {} -> {}", label, expand(&label.to_string()));
    }

    Ok(info.countdown)
}

fn wait_for_next_period(seconds: u32) {
    let pb = ProgressBar::new(seconds as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut countdown = Countdown::default();
    countdown.sync(seconds);
    loop {
        pb.set_message(format!("prochain tirage dans {}", countdown.format_mmss()));
        thread::sleep(Duration::from_secs(1));
        pb.inc(1);
        if countdown.tick() {
            break;
        }
    }
    pb.finish_and_clear();
}
