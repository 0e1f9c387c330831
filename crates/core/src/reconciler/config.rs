//! Reconciler configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::record::Field;

/// What to do with the cover of the source known to watermark its images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkedCover {
    /// Keep it, but only as the last candidate.
    #[default]
    Demote,
    /// Drop it from the candidate list.
    Remove,
    /// Treat it like any other cover.
    Keep,
}

/// Merge policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Source whose non-empty tag list overrides every other source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_authority: Option<String>,

    /// Strip a trailing cast-name suffix from source titles before merging.
    #[serde(default = "default_true")]
    pub strip_trailing_cast_name: bool,

    /// Replace the item's identifier with the one most titled sources agree on.
    #[serde(default = "default_true")]
    pub respect_site_identifier: bool,

    /// Source whose cover carries a watermark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermarked_cover_source: Option<String>,

    #[serde(default)]
    pub watermarked_cover: WatermarkedCover,

    /// Fields that must be non-empty for the merge to succeed.
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<Field>,

    /// Rewrite person names through the alias table.
    #[serde(default = "default_true")]
    pub normalize_people: bool,

    /// JSON file mapping canonical names to lists of aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_file: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_required_fields() -> Vec<Field> {
    vec![Field::Cover, Field::Title]
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            tag_authority: None,
            strip_trailing_cast_name: default_true(),
            respect_site_identifier: default_true(),
            watermarked_cover_source: None,
            watermarked_cover: WatermarkedCover::default(),
            required_fields: default_required_fields(),
            normalize_people: default_true(),
            alias_file: None,
        }
    }
}

impl ReconcilerConfig {
    pub fn with_tag_authority(mut self, source: impl Into<String>) -> Self {
        self.tag_authority = Some(source.into());
        self
    }

    pub fn with_watermarked_cover(mut self, source: impl Into<String>, mode: WatermarkedCover) -> Self {
        self.watermarked_cover_source = Some(source.into());
        self.watermarked_cover = mode;
        self
    }

    pub fn with_required_fields(mut self, fields: &[Field]) -> Self {
        self.required_fields = fields.to_vec();
        self
    }

    pub fn with_strip_trailing_cast_name(mut self, enabled: bool) -> Self {
        self.strip_trailing_cast_name = enabled;
        self
    }

    pub fn with_respect_site_identifier(mut self, enabled: bool) -> Self {
        self.respect_site_identifier = enabled;
        self
    }

    pub fn with_normalize_people(mut self, enabled: bool) -> Self {
        self.normalize_people = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: ReconcilerConfig = toml::from_str("").unwrap();
        assert_eq!(config.required_fields, vec![Field::Cover, Field::Title]);
        assert!(config.strip_trailing_cast_name);
        assert!(config.respect_site_identifier);
        assert_eq!(config.watermarked_cover, WatermarkedCover::Demote);
        assert!(config.tag_authority.is_none());
    }

    #[test]
    fn test_parse_full_section() {
        let config: ReconcilerConfig = toml::from_str(
            r#"
            tag_authority = "tagsite"
            watermarked_cover_source = "marksite"
            watermarked_cover = "remove"
            required_fields = ["title", "people"]
            normalize_people = false
            alias_file = "data/aliases.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.tag_authority.as_deref(), Some("tagsite"));
        assert_eq!(config.watermarked_cover, WatermarkedCover::Remove);
        assert_eq!(config.required_fields, vec![Field::Title, Field::People]);
        assert!(!config.normalize_people);
        assert_eq!(
            config.alias_file,
            Some(PathBuf::from("data/aliases.json"))
        );
    }
}
