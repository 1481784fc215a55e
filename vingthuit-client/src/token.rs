use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Emplacement du jeton DeepSeek : `data/deepseek_token.txt` à côté du cache.
pub fn token_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("data")
        .join("deepseek_token.txt")
}

/// Jeton enregistré, ou None si le fichier est absent, illisible ou vide.
/// L'absence de jeton n'est jamais une erreur : le prédicteur IA est
/// simplement désactivé.
pub fn load_token(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let token = content.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

pub fn save_token(path: &Path, token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer {}", parent.display()))?;
    }
    fs::write(path, token.trim())
        .with_context(|| format!("Impossible d'écrire {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_token() {
        let dir = std::env::temp_dir().join("vingthuit-token-test");
        let path = dir.join("sub").join("deepseek_token.txt");
        save_token(&path, "  sk-abc123  ").unwrap();
        assert_eq!(load_token(&path).as_deref(), Some("sk-abc123"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_token_missing_or_empty() {
        assert_eq!(load_token(Path::new("/nonexistent/token.txt")), None);

        let dir = std::env::temp_dir().join("vingthuit-token-empty");
        let path = dir.join("deepseek_token.txt");
        save_token(&path, "   ").unwrap();
        assert_eq!(load_token(&path), None);
        fs::remove_dir_all(&dir).unwrap();
    }
}
