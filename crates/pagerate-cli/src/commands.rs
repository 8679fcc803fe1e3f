//! Non-interactive subcommands: `list` and `clear`

use anyhow::{bail, Result};
use serde_json::{Map, Value};

use pagerate_core::rating::OverallRatingRecord;
use pagerate_core::{PresentationMode, RatingRecord, RatingStateStore};

/// Modes selected by an optional `--mode` flag
fn selected_modes(mode: Option<PresentationMode>) -> Vec<PresentationMode> {
    match mode {
        Some(mode) => vec![mode],
        None => PresentationMode::ALL.to_vec(),
    }
}

/// Stored ratings as JSON, keyed by namespace
pub fn list_records(store: &RatingStateStore, mode: Option<PresentationMode>) -> Result<Value> {
    let mut out = Map::new();
    for mode in selected_modes(mode) {
        let value = if mode.is_session_log() {
            let sessions: Vec<OverallRatingRecord> = store.log(mode.namespace());
            serde_json::to_value(sessions)?
        } else {
            let records = store.get_all::<RatingRecord>(mode.namespace());
            serde_json::to_value(records)?
        };
        out.insert(mode.namespace().to_string(), value);
    }
    Ok(Value::Object(out))
}

/// Remove one page's rating or whole namespaces. Returns the namespaces touched.
pub fn clear_records(
    store: &mut RatingStateStore,
    mode: Option<PresentationMode>,
    page: Option<&str>,
) -> Result<Vec<&'static str>> {
    if page.is_some() && !matches!(mode, Some(m) if !m.is_session_log()) {
        bail!("--page needs --mode popup or --mode inline");
    }

    let mut cleared = Vec::new();
    for mode in selected_modes(mode) {
        store.clear(mode.namespace(), page)?;
        tracing::info!(
            "Cleared {}{}",
            mode.namespace(),
            page.map(|p| format!(" page {}", p)).unwrap_or_default()
        );
        cleared.push(mode.namespace());
    }
    Ok(cleared)
}
