//! Environment configuration.

use anyhow::Context;
use cloze_core::{PassageKind, SessionConfig};
use std::path::Path;

/// Host configuration read from the environment (and `.env`).
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub kind: PassageKind,
    pub session: SessionConfig,
}

impl Config {
    /// Read `CLOZE_PASSAGE_KIND`, `CLOZE_SETTINGS` and `CLOZE_INCLUDE_OPTIONAL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let kind = match std::env::var("CLOZE_PASSAGE_KIND") {
            Ok(tag) => tag.parse()?,
            Err(_) => PassageKind::default(),
        };

        let mut session = match std::env::var("CLOZE_SETTINGS") {
            Ok(path) => load_session_config(Path::new(&path))?,
            Err(_) => SessionConfig::default(),
        };

        if let Ok(value) = std::env::var("CLOZE_INCLUDE_OPTIONAL") {
            session.include_optional = parse_flag(&value);
        }

        Ok(Self { kind, session })
    }
}

/// Load a JSON session config; missing fields take defaults.
pub fn load_session_config(path: &Path) -> anyhow::Result<SessionConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing settings file {}", path.display()))
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
