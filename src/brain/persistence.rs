//! Saving and loading brains as flat JSON arrays of floats

use anyhow::{Context, Result};
use std::path::Path;

use super::genome::Brain;

/// Write `brain` to `path`, creating parent directories as needed
pub fn save_brain(brain: &Brain, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(brain).context("Failed to serialize brain")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write brain to {:?}", path))?;

    Ok(())
}

pub fn load_brain(path: &Path) -> Result<Brain> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read brain from {:?}", path))?;
    let brain: Brain = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse brain in {:?}", path))?;
    Ok(brain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models/best.json");
        let brain = Brain::new(vec![0.25, -1.5, 3.0]);

        save_brain(&brain, &path).unwrap();
        assert_eq!(load_brain(&path).unwrap(), brain);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{\"not\": \"a brain\"}").unwrap();

        let err = load_brain(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse brain"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_brain(&temp_dir.path().join("missing.json")).is_err());
    }
}
