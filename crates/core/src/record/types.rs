//! Per-source and reconciled metadata records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::field::{Field, FieldValue};
use super::item::IdKind;

/// One source's sparse view of an item.
///
/// `None` means the source said nothing about a field, which is distinct
/// from an empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Page the data was extracted from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Title in the original language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// High-resolution cover URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_cover: Option<String>,
    /// Classification tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<Vec<String>>,
    /// Person name to portrait URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people_pics: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    /// Release date, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_pics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_video: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncensored: Option<bool>,
}

impl SourceRecord {
    /// A blank record seeded with the identifier a worker will look up.
    pub fn seeded(kind: IdKind, identifier: &str) -> Self {
        let mut record = Self::default();
        match kind {
            IdKind::ContentId => record.content_id = Some(identifier.to_string()),
            IdKind::Standard | IdKind::Alternate => {
                record.standard_id = Some(identifier.to_string())
            }
        }
        record
    }

    /// Lift one field out of the record.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        let text = |v: &Option<String>| v.clone().map(FieldValue::Text);
        let list = |v: &Option<Vec<String>>| v.clone().map(FieldValue::List);

        match field {
            Field::StandardId => text(&self.standard_id),
            Field::ContentId => text(&self.content_id),
            Field::Url => text(&self.url),
            Field::Title => text(&self.title),
            Field::OriginalTitle => text(&self.original_title),
            Field::Plot => text(&self.plot),
            Field::Cover => text(&self.cover),
            Field::BigCover => text(&self.big_cover),
            Field::Genre => list(&self.genre),
            Field::People => list(&self.people),
            Field::PeoplePics => self.people_pics.clone().map(FieldValue::Map),
            Field::Director => text(&self.director),
            Field::Producer => text(&self.producer),
            Field::Publisher => text(&self.publisher),
            Field::Serial => text(&self.serial),
            Field::PublishDate => text(&self.publish_date),
            Field::Duration => text(&self.duration),
            Field::Score => text(&self.score),
            Field::PreviewPics => list(&self.preview_pics),
            Field::PreviewVideo => text(&self.preview_video),
            Field::Magnet => text(&self.magnet),
            Field::Uncensored => self.uncensored.map(FieldValue::Flag),
        }
    }

    /// Store a value into one field. A value of the wrong shape is dropped.
    pub fn set(&mut self, field: Field, value: FieldValue) {
        match (field, value) {
            (Field::StandardId, FieldValue::Text(v)) => self.standard_id = Some(v),
            (Field::ContentId, FieldValue::Text(v)) => self.content_id = Some(v),
            (Field::Url, FieldValue::Text(v)) => self.url = Some(v),
            (Field::Title, FieldValue::Text(v)) => self.title = Some(v),
            (Field::OriginalTitle, FieldValue::Text(v)) => self.original_title = Some(v),
            (Field::Plot, FieldValue::Text(v)) => self.plot = Some(v),
            (Field::Cover, FieldValue::Text(v)) => self.cover = Some(v),
            (Field::BigCover, FieldValue::Text(v)) => self.big_cover = Some(v),
            (Field::Genre, FieldValue::List(v)) => self.genre = Some(v),
            (Field::People, FieldValue::List(v)) => self.people = Some(v),
            (Field::PeoplePics, FieldValue::Map(v)) => self.people_pics = Some(v),
            (Field::Director, FieldValue::Text(v)) => self.director = Some(v),
            (Field::Producer, FieldValue::Text(v)) => self.producer = Some(v),
            (Field::Publisher, FieldValue::Text(v)) => self.publisher = Some(v),
            (Field::Serial, FieldValue::Text(v)) => self.serial = Some(v),
            (Field::PublishDate, FieldValue::Text(v)) => self.publish_date = Some(v),
            (Field::Duration, FieldValue::Text(v)) => self.duration = Some(v),
            (Field::Score, FieldValue::Text(v)) => self.score = Some(v),
            (Field::PreviewPics, FieldValue::List(v)) => self.preview_pics = Some(v),
            (Field::PreviewVideo, FieldValue::Text(v)) => self.preview_video = Some(v),
            (Field::Magnet, FieldValue::Text(v)) => self.magnet = Some(v),
            (Field::Uncensored, FieldValue::Flag(v)) => self.uncensored = Some(v),
            (field, value) => warn!(%field, ?value, "Dropping value of mismatched shape"),
        }
    }

    /// Whether a field is unset or set to an empty value.
    pub fn is_empty(&self, field: Field) -> bool {
        self.get(field).is_none_or(|v| v.is_empty())
    }

    /// Copy every field `other` knows about into this record.
    pub fn fill_from(&mut self, other: SourceRecord) {
        for field in Field::ALL {
            if let Some(value) = other.get(field) {
                self.set(field, value);
            }
        }
    }

    /// The identifier this record carries for the given scheme.
    pub fn identifier(&self, kind: IdKind) -> Option<&str> {
        match kind {
            IdKind::ContentId => self.content_id.as_deref(),
            IdKind::Standard | IdKind::Alternate => self.standard_id.as_deref(),
        }
    }

    /// Whether the source produced a non-empty title.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// The reconciled record for one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalRecord {
    /// Merged field values.
    #[serde(flatten)]
    pub info: SourceRecord,
    /// Cover candidates in preference order.
    #[serde(default)]
    pub covers: Vec<String>,
    /// High-resolution cover candidates in preference order.
    #[serde(default)]
    pub big_covers: Vec<String>,
}

impl FinalRecord {
    /// The identifier used for display and naming.
    pub fn display_id(&self) -> &str {
        self.info
            .standard_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.info.content_id.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sets_matching_identifier() {
        let std = SourceRecord::seeded(IdKind::Standard, "ABC-123");
        assert_eq!(std.standard_id.as_deref(), Some("ABC-123"));
        assert!(std.content_id.is_none());

        let cid = SourceRecord::seeded(IdKind::ContentId, "abc00123");
        assert_eq!(cid.content_id.as_deref(), Some("abc00123"));
        assert!(cid.standard_id.is_none());
    }

    #[test]
    fn test_get_set_every_field() {
        let mut record = SourceRecord::default();
        for field in Field::ALL {
            assert!(record.get(field).is_none(), "{} should start unset", field);
        }

        record.set(Field::Title, FieldValue::Text("Foo".to_string()));
        record.set(Field::Genre, FieldValue::List(vec!["drama".to_string()]));
        record.set(Field::Uncensored, FieldValue::Flag(false));

        assert_eq!(record.title.as_deref(), Some("Foo"));
        assert_eq!(record.genre, Some(vec!["drama".to_string()]));
        assert_eq!(record.uncensored, Some(false));
        assert!(!record.is_empty(Field::Uncensored));
    }

    #[test]
    fn test_set_ignores_mismatched_shape() {
        let mut record = SourceRecord::default();
        record.set(Field::Title, FieldValue::Flag(true));
        assert!(record.title.is_none());
    }

    #[test]
    fn test_empty_is_distinct_from_unset() {
        let record = SourceRecord {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(record.get(Field::Title).is_some());
        assert!(record.is_empty(Field::Title));
        assert!(!record.has_title());
    }

    #[test]
    fn test_fill_from_overlays_known_fields() {
        let mut record = SourceRecord::seeded(IdKind::Standard, "ABC-123");
        record.fill_from(SourceRecord {
            title: Some("Foo".to_string()),
            ..Default::default()
        });
        assert_eq!(record.standard_id.as_deref(), Some("ABC-123"));
        assert_eq!(record.title.as_deref(), Some("Foo"));
    }

    #[test]
    fn test_deserialize_sparse_json() {
        let record: SourceRecord =
            serde_json::from_str(r#"{"title": "Foo", "people": ["A", "B"]}"#).unwrap();
        assert_eq!(record.title.as_deref(), Some("Foo"));
        assert_eq!(record.people.as_ref().map(Vec::len), Some(2));
        assert!(record.cover.is_none());
    }

    #[test]
    fn test_final_record_display_id_prefers_standard() {
        let mut record = FinalRecord::default();
        record.info.content_id = Some("abc00123".to_string());
        assert_eq!(record.display_id(), "abc00123");
        record.info.standard_id = Some("ABC-123".to_string());
        assert_eq!(record.display_id(), "ABC-123");
    }
}
