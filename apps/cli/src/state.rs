//! State file holding the persisted record and navigation cursor.

use anyhow::Context;
use cloze_core::{ProgressRecord, SessionCursor};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    pub record: ProgressRecord,
    #[serde(default)]
    pub cursor: SessionCursor,
}

/// Load saved state; a missing file means a fresh start.
pub fn load(path: &Path) -> anyhow::Result<Option<SavedState>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    let state = serde_json::from_str(&json)
        .with_context(|| format!("parsing state file {}", path.display()))?;
    Ok(Some(state))
}

pub fn save(path: &Path, state: &SavedState) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json).with_context(|| format!("writing state file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "state saved");
    Ok(())
}
