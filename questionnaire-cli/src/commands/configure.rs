//! Store connection settings in the config file.

use std::path::Path;

use anyhow::Result;

use crate::config::Config;

/// Merge the given values into the config at `path`. Values left out keep
/// whatever the file already holds.
pub fn run(
    path: &Path,
    api_url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let mut config = Config::load_from(path)?;
    if api_url.is_some() {
        config.base_url = api_url;
    }
    if token.is_some() {
        config.token = token;
    }
    if let Some(secs) = timeout_secs {
        config.timeout_secs = secs;
    }
    config.save_to(path)?;
    println!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_values_are_merged_into_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"https://surveys.example.org/api\"\n").unwrap();

        run(&path, None, Some("secret".into()), Some(5)).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config,
            Config {
                base_url: Some("https://surveys.example.org/api".into()),
                token: Some("secret".into()),
                timeout_secs: 5,
            }
        );
    }

    #[test]
    fn test_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        run(&path, Some("https://other.example.org".into()), None, None).unwrap();

        let remote = Config::load_from(&path).unwrap().remote(None, None).unwrap();
        assert_eq!(remote.base_url, "https://other.example.org");
        assert_eq!(remote.token, None);
    }
}
