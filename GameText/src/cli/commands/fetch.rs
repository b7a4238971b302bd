//! CLI command that drives a full `TextManager`

use std::path::Path;

use crate::config::TextConfig;
use crate::fs::LocalFileSystem;
use crate::manager::TextManager;

pub fn execute(
    root: &Path,
    config: Option<&Path>,
    language: Option<&str>,
    map: Option<&str>,
    labels: &[String],
) -> anyhow::Result<()> {
    let mut text_config = match config {
        Some(path) => TextConfig::load_or_default(path),
        None => TextConfig::default(),
    };
    if let Some(language) = language {
        text_config.language = language.to_string();
    }

    let mut manager = TextManager::new(LocalFileSystem::new(root), text_config);
    manager.initialize();

    if !manager.is_loaded() {
        anyhow::bail!("No string table could be loaded under {}", root.display());
    }

    if let Some(map) = map {
        manager.initialize_map_strings(map)?;
    }

    for label in labels {
        let fetched = manager.fetch(label);
        let marker = if fetched.found { "" } else { " (missing)" };
        println!("{label}{marker}: {}", fetched.text);
    }

    Ok(())
}
