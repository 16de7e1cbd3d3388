use std::path::Path;

use anyhow::{Result, bail};
use log::info;
use questionnaire::{MetaField, Questionnaire, QuestionnaireKind};

use super::write_tree;

pub fn run(title: String, program: Option<String>, kind: &str, out: &Path) -> Result<()> {
    if out.exists() {
        bail!("{} already exists", out.display());
    }
    let tree = Questionnaire::new()
        .update_meta(MetaField::Title(title))
        .update_meta(MetaField::ProgramId(program))
        .update_meta(MetaField::Kind(QuestionnaireKind::parse(kind)));
    write_tree(out, &tree)?;
    info!("created {}", out.display());
    println!("Created {}", out.display());
    Ok(())
}
