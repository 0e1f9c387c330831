//! Batch manifest: the list of items to process.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use marquee_core::Item;

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    items: Vec<Item>,
}

/// Parse a TOML manifest of `[[items]]` tables.
pub fn parse_manifest(toml_str: &str) -> Result<Vec<Item>> {
    let manifest: Manifest = toml::from_str(toml_str).context("Invalid manifest")?;
    Ok(manifest.items)
}

pub fn load_manifest(path: &Path) -> Result<Vec<Item>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {:?}", path))?;
    parse_manifest(&text).with_context(|| format!("Failed to parse manifest {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::IdKind;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_manifest_items() {
        let items = parse_manifest(
            r#"
[[items]]
kind = "standard"
standard_id = "ABC-123"
files = ["/media/ABC-123.mp4"]
hard_sub = true
attr_suffix = "-C"

[[items]]
kind = "content_id"
content_id = "abc00123"
standard_id = "ABC-123"
"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, IdKind::Standard);
        assert_eq!(items[0].files, vec![PathBuf::from("/media/ABC-123.mp4")]);
        assert!(items[0].hard_sub);
        assert_eq!(items[0].attr_suffix, "-C");
        assert!(items[1].has_dual_identity());
        assert!(items[1].record.is_none());
    }

    #[test]
    fn test_empty_manifest() {
        assert!(parse_manifest("").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = parse_manifest(
            r#"
[[items]]
kind = "mystery"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_manifest_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[items]]
kind = "alternate"
standard_id = "XYZ-001"
"#
        )
        .unwrap();

        let items = load_manifest(file.path()).unwrap();
        assert_eq!(items[0].kind, IdKind::Alternate);
        assert!(load_manifest(Path::new("/nonexistent/manifest.toml")).is_err());
    }
}
