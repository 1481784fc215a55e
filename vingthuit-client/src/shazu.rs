use std::collections::HashMap;

use anyhow::Result;
use tracing::warn;

use vingthuit_db::models::{Combo, Magnitude, Parity, Verdict};
use vingthuit_engine::engine::ExternalPrediction;
use vingthuit_engine::predictors::AxisLabel;

use crate::client::Pc28Client;

/// Tableau tiers "杀组" (groupe à éliminer) pour le tirage jnd28.
pub const SHAZU_URL: &str = "http://www.xyyc28.top/jnd/jndsz.php";

impl Pc28Client {
    /// Prédictions du tableau tiers, par période. Carte vide en cas d'échec
    /// réseau ou de page inattendue : l'appelant se replie sur le calcul
    /// local sans erreur.
    pub fn shazu_predictions(&self) -> HashMap<String, ExternalPrediction> {
        match self.fetch_shazu() {
            Ok(predictions) => predictions,
            Err(error) => {
                warn!(%error, "échec de la récupération du tableau tiers");
                HashMap::new()
            }
        }
    }

    fn fetch_shazu(&self) -> Result<HashMap<String, ExternalPrediction>> {
        let html = self
            .client
            .get(SHAZU_URL)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(parse_shazu_table(&html))
    }
}

/// Extrait les lignes du tableau : période en colonne 0, pronostic en
/// colonne 3 (deux éléments `<font>` pour la forme "axe + combo"), verdict
/// en colonne 4. Les lignes inexploitables sont ignorées une à une.
pub fn parse_shazu_table(html: &str) -> HashMap<String, ExternalPrediction> {
    let mut predictions = HashMap::new();
    let body = match html.find("<tbody") {
        Some(i) => &html[i..],
        None => return predictions,
    };

    for row in body.split("<tr").skip(1) {
        let row = match row.split("</tr>").next() {
            Some(r) => r,
            None => continue,
        };
        let cells = cell_inner_html(row);
        if cells.len() < 5 {
            continue;
        }

        let section = strip_tags(&cells[0]);
        if section.is_empty() {
            continue;
        }

        let fonts = font_texts(&cells[3]);
        let raw = if fonts.len() >= 2 {
            format!("{}+{}", fonts[0], fonts[1])
        } else {
            strip_tags(&cells[3])
        };
        let display = match translate_prediction(&raw) {
            Some(display) => display,
            None => continue,
        };
        let verdict = translate_verdict(&strip_tags(&cells[4]));

        predictions.insert(section, ExternalPrediction { display, verdict });
    }
    predictions
}

/// "小+大双" -> "low + high-even" ; étiquette nue "大双" -> "high-even".
/// None pour tout texte hors nomenclature.
pub fn translate_prediction(text: &str) -> Option<String> {
    let text = text.trim();
    if let Some((left, right)) = text.split_once('+') {
        let axis = axis_from_cn(left.trim())?;
        let combo = combo_from_cn(right.trim())?;
        return Some(format!("{} + {}", axis, combo));
    }
    combo_from_cn(text).map(|c| c.to_string())
}

/// "正确" -> hit, "错误" -> miss, tout le reste -> pas de verdict.
pub fn translate_verdict(text: &str) -> Option<Verdict> {
    if text.contains("正确") {
        Some(Verdict::Hit)
    } else if text.contains("错误") {
        Some(Verdict::Miss)
    } else {
        None
    }
}

fn axis_from_cn(token: &str) -> Option<AxisLabel> {
    match token {
        "大" => Some(AxisLabel::Magnitude(Magnitude::High)),
        "小" => Some(AxisLabel::Magnitude(Magnitude::Low)),
        "单" => Some(AxisLabel::Parity(Parity::Odd)),
        "双" => Some(AxisLabel::Parity(Parity::Even)),
        _ => None,
    }
}

fn combo_from_cn(token: &str) -> Option<Combo> {
    let mut chars = token.chars();
    let magnitude = match chars.next()? {
        '大' => Magnitude::High,
        '小' => Magnitude::Low,
        _ => return None,
    };
    let parity = match chars.next()? {
        '单' => Parity::Odd,
        '双' => Parity::Even,
        _ => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(Combo::new(magnitude, parity))
}

fn cell_inner_html(row: &str) -> Vec<String> {
    row.split("<td")
        .skip(1)
        .filter_map(|cell| {
            let (_, rest) = cell.split_once('>')?;
            Some(rest.split("</td>").next().unwrap_or(rest).to_string())
        })
        .collect()
}

fn font_texts(cell: &str) -> Vec<String> {
    cell.split("<font")
        .skip(1)
        .filter_map(|fragment| {
            let (_, rest) = fragment.split_once('>')?;
            let inner = rest.split("</font>").next().unwrap_or(rest);
            let text = strip_tags(inner);
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        })
        .collect()
}

fn strip_tags(fragment: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <table><tbody id="biaoge">
      <tr>
        <td>3302</td><td>10:03</td><td>5,9,0</td>
        <td><font color="red">小</font>+<font color="blue">大双</font></td>
        <td><span>正确</span></td>
      </tr>
      <tr>
        <td>3303</td><td>10:07</td><td>--</td>
        <td>大单</td>
        <td>错误</td>
      </tr>
      <tr>
        <td>3304</td><td>10:10</td><td>--</td>
        <td><font>单</font>+<font>大双</font></td>
        <td>等待</td>
      </tr>
      <tr><td>lignetronquée</td></tr>
    </tbody></table>
    "#;

    #[test]
    fn test_parse_shazu_table() {
        let predictions = parse_shazu_table(SAMPLE);
        assert_eq!(predictions.len(), 3);

        let p = predictions.get("3302").unwrap();
        assert_eq!(p.display, "low + high-even");
        assert_eq!(p.verdict, Some(Verdict::Hit));

        let p = predictions.get("3303").unwrap();
        assert_eq!(p.display, "high-odd");
        assert_eq!(p.verdict, Some(Verdict::Miss));

        let p = predictions.get("3304").unwrap();
        assert_eq!(p.display, "odd + high-even");
        assert_eq!(p.verdict, None);
    }

    #[test]
    fn test_parse_shazu_table_without_tbody() {
        assert!(parse_shazu_table("<html><body>rien</body></html>").is_empty());
    }

    #[test]
    fn test_translate_prediction() {
        assert_eq!(
            translate_prediction("小+大双").as_deref(),
            Some("low + high-even")
        );
        assert_eq!(
            translate_prediction(" 双 + 小单 ").as_deref(),
            Some("even + low-odd")
        );
        assert_eq!(translate_prediction("大双").as_deref(), Some("high-even"));
        assert_eq!(translate_prediction("获取中..."), None);
        assert_eq!(translate_prediction(""), None);
    }

    #[test]
    fn test_translate_verdict() {
        assert_eq!(translate_verdict("正确"), Some(Verdict::Hit));
        assert_eq!(translate_verdict("错误"), Some(Verdict::Miss));
        assert_eq!(translate_verdict("等待开奖"), None);
        assert_eq!(translate_verdict(""), None);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>3302</b>"), "3302");
        assert_eq!(strip_tags("  texte <i>riche</i> "), "texte riche");
    }
}
