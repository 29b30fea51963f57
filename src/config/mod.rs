use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

const VOCABULARY_RELATIVE: &str = "data/vocabulary.json";

/// Location of the application assets: a directory containing
/// `data/vocabulary.json` and the `audio/` clip folder.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub assets_root: PathBuf,
}

impl AppConfig {
    pub fn from_override(path: Option<PathBuf>) -> Result<Self> {
        let root = match path {
            Some(custom) => canonicalize_dir(&custom)?,
            None => default_assets_root()?,
        };
        Ok(Self { assets_root: root })
    }

    pub fn vocabulary_file(&self) -> PathBuf {
        self.assets_root.join(VOCABULARY_RELATIVE)
    }

    /// Resolve an entry's clip path against the assets root.
    pub fn resolve_clip(&self, relative: &str) -> PathBuf {
        self.assets_root.join(relative)
    }
}

fn canonicalize_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve assets directory at {:?}", path))?;
    if canonical.is_dir() {
        Ok(canonical)
    } else {
        Err(anyhow!("assets path {:?} is not a directory", canonical))
    }
}

fn default_assets_root() -> Result<PathBuf> {
    if let Some(root) = std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .and_then(find_root_from)
    {
        return Ok(root);
    }
    let cwd = std::env::current_dir().context("unable to resolve working directory")?;
    find_root_from(&cwd).ok_or_else(|| {
        anyhow!("could not locate {}; pass --assets-path", VOCABULARY_RELATIVE)
    })
}

fn find_root_from(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .find(|candidate| candidate.join(VOCABULARY_RELATIVE).is_file())
        .map(Path::to_path_buf)
}
