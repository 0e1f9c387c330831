//! The unit of work: one media item moving through the pipeline.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::types::FinalRecord;
use crate::namer::NamingPlan;

/// Which identifier scheme governs source selection for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    /// Conventional `LABEL-123` style identifier.
    Standard,
    /// Distributor content id (e.g. `abc00123`).
    ContentId,
    /// Alternate numbering scheme with its own source list.
    Alternate,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::Standard => write!(f, "standard"),
            IdKind::ContentId => write!(f, "content_id"),
            IdKind::Alternate => write!(f, "alternate"),
        }
    }
}

/// One media work being processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Identifier scheme; may be corrected after the source fan-out.
    pub kind: IdKind,
    /// Standard identifier, also used by the alternate scheme.
    #[serde(default)]
    pub standard_id: Option<String>,
    /// Content id.
    #[serde(default)]
    pub content_id: Option<String>,
    /// Source media files belonging to this item.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Whether the media has burnt-in subtitles.
    #[serde(default)]
    pub hard_sub: bool,
    /// Whether the media is flagged as an uncensored release.
    #[serde(default)]
    pub uncensored: bool,
    /// Attribute suffix appended to the identifier in file names (e.g. `-C`).
    #[serde(default)]
    pub attr_suffix: String,
    /// Reconciled metadata, set once the merge succeeds.
    #[serde(skip)]
    pub record: Option<FinalRecord>,
    /// Output paths, set once naming completes.
    #[serde(skip)]
    pub plan: Option<NamingPlan>,
}

impl Item {
    /// An item identified by a standard identifier.
    pub fn standard(id: impl Into<String>) -> Self {
        Self::new(IdKind::Standard, Some(id.into()), None)
    }

    /// An item identified by a content id, optionally with a candidate
    /// standard identifier.
    pub fn content(cid: impl Into<String>, standard_id: Option<String>) -> Self {
        Self::new(IdKind::ContentId, standard_id, Some(cid.into()))
    }

    /// An item in the alternate numbering scheme.
    pub fn alternate(id: impl Into<String>) -> Self {
        Self::new(IdKind::Alternate, Some(id.into()), None)
    }

    fn new(kind: IdKind, standard_id: Option<String>, content_id: Option<String>) -> Self {
        Self {
            kind,
            standard_id,
            content_id,
            files: Vec::new(),
            hard_sub: false,
            uncensored: false,
            attr_suffix: String::new(),
            record: None,
            plan: None,
        }
    }

    /// Attach source files.
    pub fn with_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// The identifier that drives source selection for the current kind.
    pub fn primary_id(&self) -> Option<&str> {
        match self.kind {
            IdKind::ContentId => self.content_id.as_deref(),
            IdKind::Standard | IdKind::Alternate => self.standard_id.as_deref(),
        }
    }

    /// The other identifier, when one is known.
    pub fn secondary_id(&self) -> Option<&str> {
        match self.kind {
            IdKind::ContentId => self.standard_id.as_deref(),
            IdKind::Standard | IdKind::Alternate => self.content_id.as_deref(),
        }
    }

    /// Whether a content-id item also carries a candidate standard identifier.
    pub fn has_dual_identity(&self) -> bool {
        self.kind == IdKind::ContentId
            && self.content_id.is_some()
            && self.standard_id.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Identifier for logs and notifications.
    pub fn display_id(&self) -> &str {
        self.standard_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.content_id.as_deref())
            .unwrap_or("<unidentified>")
    }

    /// Switch a content-id item over to its standard identifier.
    pub fn reclassify_as_standard(&mut self) {
        self.kind = IdKind::Standard;
        self.content_id = None;
    }

    /// Keep the content-id classification and forget the standard candidate.
    pub fn confirm_content_id(&mut self) {
        self.kind = IdKind::ContentId;
        self.standard_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_and_secondary_ids() {
        let item = Item::content("abc00123", Some("ABC-123".to_string()));
        assert_eq!(item.primary_id(), Some("abc00123"));
        assert_eq!(item.secondary_id(), Some("ABC-123"));
        assert!(item.has_dual_identity());

        let item = Item::standard("ABC-123");
        assert_eq!(item.primary_id(), Some("ABC-123"));
        assert_eq!(item.secondary_id(), None);
        assert!(!item.has_dual_identity());
    }

    #[test]
    fn test_reclassification() {
        let mut item = Item::content("abc00123", Some("ABC-123".to_string()));
        item.reclassify_as_standard();
        assert_eq!(item.kind, IdKind::Standard);
        assert_eq!(item.primary_id(), Some("ABC-123"));
        assert!(item.content_id.is_none());

        let mut item = Item::content("abc00123", Some("ABC-123".to_string()));
        item.confirm_content_id();
        assert_eq!(item.kind, IdKind::ContentId);
        assert!(item.standard_id.is_none());
        assert_eq!(item.display_id(), "abc00123");
    }

    #[test]
    fn test_deserialize_manifest_entry() {
        let toml = r#"
kind = "content_id"
content_id = "abc00123"
standard_id = "ABC-123"
files = ["/media/in/abc00123.mp4"]
hard_sub = true
"#;
        let item: Item = toml::from_str(toml).unwrap();
        assert_eq!(item.kind, IdKind::ContentId);
        assert_eq!(item.files.len(), 1);
        assert!(item.hard_sub);
        assert!(!item.uncensored);
        assert!(item.record.is_none());
    }
}
