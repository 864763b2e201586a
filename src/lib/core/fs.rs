use anyhow::Result;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Create parent directories for a path when missing.
pub fn make_parent_dirs<P: AsRef<Path>>(path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Detect whether a path uses a gzip-compatible extension.
pub fn is_bgzipped<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().unwrap_or_else(|| OsStr::new("")),
        ext if ext == "gz" || ext == "gzip" || ext == "bgzf"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_gzip_extensions() {
        assert!(is_bgzipped("out.tsv.gz"));
        assert!(is_bgzipped("out.bgzf"));
        assert!(!is_bgzipped("out.tsv"));
        assert!(!is_bgzipped("out"));
    }
}
