//! Reading and writing outline files
//!
//! An outline file is a pretty-printed [`OutlineSnapshot`]. Loading goes
//! through the same validation as any other load, so a hand-edited file with
//! a broken tree is rejected rather than repaired.

use anyhow::{Context, Result};
use outliner_editor::Document;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTLINE_NAME: &str = "outline.json";

/// Resolve the outline path against the working directory
pub fn resolve(cwd: &str, file: Option<&Path>) -> PathBuf {
    match file {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => PathBuf::from(cwd).join(path),
        None => PathBuf::from(cwd).join(DEFAULT_OUTLINE_NAME),
    }
}

/// Load and validate an outline file
///
/// New node ids are seeded from `id_seed` when given, otherwise from the
/// file path.
pub fn load_document(path: &Path, id_seed: Option<&str>) -> Result<Document> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = Document::from_json(&json)
        .with_context(|| format!("Invalid outline {}", path.display()))?;

    let seed = match id_seed {
        Some(seed) => seed.to_string(),
        None => path.display().to_string(),
    };
    Ok(doc.with_id_seed(&seed))
}

/// Write the document back and clear its dirty flag
pub fn save_document(doc: &mut Document, path: &Path) -> Result<()> {
    let json = doc.to_json()?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    doc.mark_saved();
    Ok(())
}
