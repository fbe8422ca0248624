//! Whole-file replacement.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Replace the content of `target` atomically.
///
/// Writes to a temp file in the target's directory, then renames it over the
/// target, so readers see the previous or the new content and never a
/// prefix of it. The directory must already exist.
pub fn atomic_write(target: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
