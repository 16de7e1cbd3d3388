pub mod configure;
pub mod edit;
pub mod new;
pub mod pull;
pub mod push;
pub mod show;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use questionnaire::{Questionnaire, from_json, serialize};
use questionnaire_http::HttpStore;

use crate::config::Remote;

/// Read a questionnaire file, either a bare payload or an API response.
pub fn read_tree(path: &Path) -> Result<Questionnaire> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    from_json(&content).with_context(|| format!("Failed to load questionnaire from {}", path.display()))
}

/// Write a questionnaire as a pretty-printed payload.
pub fn write_tree(path: &Path, tree: &Questionnaire) -> Result<()> {
    let json = serde_json::to_string_pretty(&serialize(tree))
        .context("Failed to serialize questionnaire")?;
    fs::write(path, json + "\n").with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

pub fn http_store(remote: &Remote) -> Result<HttpStore> {
    let store = HttpStore::with_timeout(remote.base_url.clone(), remote.timeout)
        .context("Failed to set up API client")?;
    Ok(match &remote.token {
        Some(token) => store.with_token(token.clone()),
        None => store,
    })
}
