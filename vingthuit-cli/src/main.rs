mod display;
mod fetch;
mod watch;

use std::collections::HashMap;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vingthuit_client::ai::DeepSeekPredictor;
use vingthuit_client::client::Pc28Client;
use vingthuit_client::token::{load_token, save_token, token_path};
use vingthuit_db::db::{
    count_records, db_path, fetch_last_records, fetch_predictions, migrate, open_db,
    upsert_prediction,
};
use vingthuit_db::models::{Combo, Source};
use vingthuit_db::rusqlite::Connection;
use vingthuit_engine::engine::{Engine, ExternalPrediction};
use vingthuit_engine::format::expand;
use vingthuit_engine::predictors::reference;
use vingthuit_engine::streak::{count_outcomes, current_streaks};

use crate::display::{display_fetch_summary, display_rows, display_stats, display_sum_trend};
use crate::fetch::{cache_kill_group, cache_records};

/// Profondeur d'historique chargée pour calculer les taux glissants.
pub const HISTORY_FETCH_LIMIT: u32 = 200;

#[derive(Parser)]
#[command(name = "vingthuit", about = "Suivi et pronostics du tirage Canada 28")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Récupérer les dernières périodes dans le cache local
    Fetch {
        /// Nombre de périodes demandées au site
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Lister les dernières périodes du cache avec les verdicts
    History {
        /// Nombre de périodes à afficher
        #[arg(short, long, default_value = "50")]
        last: usize,
    },

    /// Afficher la répartition des catégories et les séries en cours
    Stats {
        /// Fenêtre d'analyse (nombre de périodes)
        #[arg(short, long, default_value = "50")]
        window: u32,
    },

    /// Pronostics pour la prochaine période
    Predict {
        /// Interroger aussi le prédicteur IA (jeton requis)
        #[arg(long)]
        ai: bool,
    },

    /// Suivi continu : rafraîchissement à chaque période
    Watch {
        /// Nombre de périodes affichées à chaque cycle
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Enregistrer ou vérifier le jeton DeepSeek
    Token {
        /// Jeton à enregistrer ; sans valeur, affiche l'état courant
        value: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Fetch { limit } => cmd_fetch(&conn, limit),
        Command::History { last } => cmd_history(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Predict { ai } => cmd_predict(&conn, ai),
        Command::Watch { limit } => watch::run_watch(&conn, limit),
        Command::Token { value } => cmd_token(value),
    }
}

/// Charge l'historique et les journaux de prédiction du cache dans un
/// moteur prêt à afficher.
pub fn build_engine(conn: &Connection, limit: u32) -> Result<Engine> {
    let mut engine = Engine::new();
    engine.set_records(fetch_last_records(conn, limit)?);

    let mut kill_group = HashMap::new();
    for (section, (label, verdict)) in fetch_predictions(conn, Source::KillGroup)? {
        kill_group.insert(section, ExternalPrediction { display: label, verdict });
    }
    engine.absorb_kill_group(kill_group);

    for (section, (label, _)) in fetch_predictions(conn, Source::Ai)? {
        if let Some(combo) = Combo::parse(&label) {
            engine.record_ai(&section, combo);
        }
    }

    Ok(engine)
}

fn cmd_fetch(conn: &Connection, limit: usize) -> Result<()> {
    let client = Pc28Client::new()?;
    let records = client.open_records(limit)?;
    let summary = cache_records(conn, &records)?;
    display_fetch_summary(&summary);

    let kill_group = client.shazu_predictions();
    if !kill_group.is_empty() {
        cache_kill_group(conn, &kill_group)?;
        println!("  Tableau tiers     : {} périodes", kill_group.len());
    }
    Ok(())
}

fn cmd_history(conn: &Connection, last: usize) -> Result<()> {
    if count_records(conn)? == 0 {
        println!("Cache vide. Lancez d'abord : vingthuit fetch");
        return Ok(());
    }
    let engine = build_engine(conn, HISTORY_FETCH_LIMIT)?;
    display_rows(&engine.snapshot(last));
    Ok(())
}

fn cmd_stats(conn: &Connection, window: u32) -> Result<()> {
    let n = count_records(conn)?;
    if n == 0 {
        println!("Cache vide. Lancez d'abord : vingthuit fetch");
        return Ok(());
    }
    let effective_window = window.min(n);
    let records = fetch_last_records(conn, effective_window)?;

    let counts = count_outcomes(&records);
    let streaks = current_streaks(&records);
    display_stats(&counts, streaks.as_ref(), effective_window);
    display_sum_trend(&records);
    Ok(())
}

fn cmd_predict(conn: &Connection, ai: bool) -> Result<()> {
    if count_records(conn)? == 0 {
        println!("Cache vide. Lancez d'abord : vingthuit fetch");
        return Ok(());
    }
    let mut engine = build_engine(conn, HISTORY_FETCH_LIMIT)?;
    let section = match engine.next_section() {
        Some(section) => section,
        None => bail!("Identifiant de période non numérique : pronostic impossible"),
    };

    println!("Prochaine période : {}\n", section);

    if let Some(forecast) = engine.latest().and_then(reference::forecast) {
        println!(
            "  Référence         : {} -> {} (à éviter : {})",
            forecast.guess,
            expand(&forecast.guess.to_string()),
            forecast.kill
        );
    }

    if let Some(display) = engine.kill_group_display(&section) {
        println!("  Groupe à éliminer : {} -> {}", display, expand(&display));
    }

    if ai {
        let token = match load_token(&token_path()) {
            Some(token) => token,
            None => bail!("Aucun jeton DeepSeek. Enregistrez-le avec : vingthuit token <valeur>"),
        };
        let predictor = DeepSeekPredictor::new(&token)?;
        match predictor.predict(engine.records(), &section)? {
            Some(label) => {
                upsert_prediction(conn, Source::Ai, &section, &label.to_string(), None)?;
                engine.record_ai(&section, label);
                println!(
                    "  Pronostic IA      : {} -> {}",
                    label,
                    expand(&label.to_string())
                );
            }
            None => println!("  Pronostic IA      : réponse sans étiquette exploitable"),
        }
    }

    Ok(())
}

fn cmd_token(value: Option<String>) -> Result<()> {
    let path = token_path();
    match value {
        Some(token) => {
            save_token(&path, &token)?;
            println!("Jeton enregistré dans {}", path.display());
        }
        None => match load_token(&path) {
            Some(_) => println!("Un jeton est enregistré dans {}", path.display()),
            None => println!("Aucun jeton enregistré ({}).", path.display()),
        },
    }
    Ok(())
}
