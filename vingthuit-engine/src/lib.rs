pub mod engine;
pub mod format;
pub mod predictors;
pub mod scoring;
pub mod streak;
pub mod winrate;
