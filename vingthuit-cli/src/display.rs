use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use textplots::Plot;

use crate::fetch::FetchSummary;
use vingthuit_db::models::{DrawRecord, Verdict};
use vingthuit_engine::engine::TableRow;
use vingthuit_engine::streak::{OutcomeCounts, StreakSummary};

pub fn display_fetch_summary(summary: &FetchSummary) {
    println!("Récupération terminée :");
    println!("  Périodes reçues   : {}", summary.total);
    println!("  Insérées          : {}", summary.inserted);
    println!("  Doublons ignorés  : {}", summary.skipped);
    if summary.errors > 0 {
        println!("  Erreurs           : {}", summary.errors);
    }
}

pub fn display_rows(rows: &[TableRow]) {
    if rows.is_empty() {
        println!("Aucune période à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Période",
            "Heure",
            "C1",
            "C2",
            "C3",
            "Somme",
            "Catégorie",
            "Référence",
            "Groupe él.",
            "IA",
            "Réf. 20p",
            "Grp 20p",
            "IA 20p",
        ]);

    for row in rows {
        let codes = row.codes.unwrap_or([0, 0, 0]);
        let code_cell = |i: usize| match row.codes {
            Some(_) => Cell::new(codes[i].to_string()),
            None => Cell::new("--"),
        };
        table.add_row(vec![
            Cell::new(&row.section),
            Cell::new(&row.open_time),
            code_cell(0),
            code_cell(1),
            code_cell(2),
            Cell::new(row.sum.map_or("--".to_string(), |s| s.to_string())),
            Cell::new(row.outcome.map_or("--".to_string(), |o| o.to_string())),
            verdict_cell(row.reference),
            verdict_cell(row.kill_group),
            verdict_cell(row.ai),
            rate_cell(&row.reference_rate),
            rate_cell(&row.kill_group_rate),
            rate_cell(&row.ai_rate),
        ]);
    }

    println!("{table}");
}

fn verdict_cell(verdict: Option<Verdict>) -> Cell {
    match verdict {
        Some(Verdict::Hit) => Cell::new("hit").fg(Color::Green),
        Some(Verdict::Miss) => Cell::new("miss").fg(Color::Red),
        None => Cell::new("--"),
    }
}

fn rate_cell(rate: &str) -> Cell {
    let color = rate
        .strip_suffix('%')
        .and_then(|n| n.parse::<f32>().ok())
        .map(|n| if n >= 50.0 { Color::Green } else { Color::Red });
    match color {
        Some(color) => Cell::new(rate).fg(color),
        None => Cell::new(rate),
    }
}

pub fn display_stats(counts: &OutcomeCounts, streaks: Option<&StreakSummary>, window: u32) {
    println!("\n📊 Répartition sur les {} dernières périodes\n", window);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Catégorie", "Occurrences"]);
    table.add_row(vec!["high", &counts.high.to_string()]);
    table.add_row(vec!["low", &counts.low.to_string()]);
    table.add_row(vec!["odd", &counts.odd.to_string()]);
    table.add_row(vec!["even", &counts.even.to_string()]);
    println!("{table}");

    match streaks {
        Some(s) => {
            println!(
                "\nSéries en cours : {} × {} | {} × {}",
                s.magnitude, s.magnitude_run, s.parity, s.parity_run
            );
        }
        None => println!("\nSéries en cours : indisponibles (dernière période incomplète)."),
    }
}

/// Graphique ASCII de la somme, de la plus ancienne à la plus récente.
/// L'historique arrive du plus récent au plus ancien ; les périodes sans
/// codes sont omises du tracé.
pub fn display_sum_trend(records: &[DrawRecord]) {
    let points: Vec<(f32, f32)> = records
        .iter()
        .rev()
        .filter_map(|r| r.sum())
        .enumerate()
        .map(|(i, sum)| (i as f32, sum as f32))
        .collect();

    if points.len() < 2 {
        println!("\n  (Pas assez de données pour le graphique)");
        return;
    }

    println!("\n== Somme par période ==\n");
    let x_max = (points.len() - 1) as f32;
    let shape = textplots::Shape::Points(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, 0.0, x_max, -1.0, 28.0);
    println!("{}", chart.lineplot(&shape));
}
