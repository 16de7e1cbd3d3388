use std::path::Path;

use anyhow::{Context, Result};
use questionnaire::{RemoteId, Session};

use super::{http_store, write_tree};
use crate::config::Remote;

pub async fn run(remote: &Remote, id: RemoteId, out: &Path) -> Result<()> {
    let store = http_store(remote)?;
    let session = Session::open(store, id.clone())
        .await
        .with_context(|| format!("Failed to download questionnaire {id}"))?;
    write_tree(out, session.current())?;

    let tree = session.current();
    println!(
        "Pulled '{}' ({} sections, {} questions) into {}",
        tree.meta().title,
        tree.section_count(),
        tree.question_count(),
        out.display()
    );
    Ok(())
}
