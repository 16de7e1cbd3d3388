use std::path::Path;

use anyhow::{Context, Result, bail};
use questionnaire::{RemoteId, Session, SessionError, StoreError, ValidationErrors};

use super::{http_store, read_tree};
use crate::config::Remote;

pub async fn run(remote: &Remote, id: RemoteId, file: &Path) -> Result<()> {
    let tree = read_tree(file)?;
    let store = http_store(remote)?;
    let mut session = Session::draft(store, id.clone(), tree);

    match session.save().await {
        Ok(stored) => {
            println!(
                "Saved '{}' as questionnaire {id} ({} sections)",
                stored.title,
                stored.sections.len()
            );
            Ok(())
        }
        Err(SessionError::Invalid(errors)) => {
            report(&errors);
            bail!("{} is not ready to save", file.display())
        }
        Err(SessionError::Store(StoreError::Validation { message, errors })) => {
            report(&errors);
            bail!("The server rejected questionnaire {id}: {message}")
        }
        Err(err) => Err(err).with_context(|| format!("Failed to push questionnaire {id}")),
    }
}

fn report(errors: &ValidationErrors) {
    for (field, messages) in errors.iter() {
        for message in messages {
            eprintln!("  {field}: {message}");
        }
    }
}
