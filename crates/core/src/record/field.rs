//! Enumerated field table driving the merge.
//!
//! Every mergeable field of a [`SourceRecord`](super::SourceRecord) is listed
//! in [`Field::ALL`] together with the rule used to absorb values from
//! successive sources. The rules operate on [`FieldValue`] so they can be
//! exercised without a record at all.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named field of a metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    StandardId,
    ContentId,
    Url,
    Title,
    OriginalTitle,
    Plot,
    Cover,
    BigCover,
    Genre,
    People,
    PeoplePics,
    Director,
    Producer,
    Publisher,
    Serial,
    PublishDate,
    Duration,
    Score,
    PreviewPics,
    PreviewVideo,
    Magnet,
    Uncensored,
}

/// How values offered by successive sources are absorbed into the final record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorb {
    /// The first source with a non-empty value wins.
    FirstNonEmpty,
    /// Values from all sources are collected in first-seen order, without duplicates.
    UnionOrdered,
    /// The first source with any value wins, even if that value is `false`.
    FirstNonNull,
}

impl Field {
    /// All fields, in the order they are visited during a merge.
    pub const ALL: [Field; 22] = [
        Field::StandardId,
        Field::ContentId,
        Field::Url,
        Field::Title,
        Field::OriginalTitle,
        Field::Plot,
        Field::Cover,
        Field::BigCover,
        Field::Genre,
        Field::People,
        Field::PeoplePics,
        Field::Director,
        Field::Producer,
        Field::Publisher,
        Field::Serial,
        Field::PublishDate,
        Field::Duration,
        Field::Score,
        Field::PreviewPics,
        Field::PreviewVideo,
        Field::Magnet,
        Field::Uncensored,
    ];

    /// The absorption rule for this field.
    pub fn absorb(self) -> Absorb {
        match self {
            Field::Cover | Field::BigCover => Absorb::UnionOrdered,
            Field::Uncensored => Absorb::FirstNonNull,
            _ => Absorb::FirstNonEmpty,
        }
    }

    /// Configuration name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::StandardId => "standard_id",
            Field::ContentId => "content_id",
            Field::Url => "url",
            Field::Title => "title",
            Field::OriginalTitle => "original_title",
            Field::Plot => "plot",
            Field::Cover => "cover",
            Field::BigCover => "big_cover",
            Field::Genre => "genre",
            Field::People => "people",
            Field::PeoplePics => "people_pics",
            Field::Director => "director",
            Field::Producer => "producer",
            Field::Publisher => "publisher",
            Field::Serial => "serial",
            Field::PublishDate => "publish_date",
            Field::Duration => "duration",
            Field::Score => "score",
            Field::PreviewPics => "preview_pics",
            Field::PreviewVideo => "preview_video",
            Field::Magnet => "magnet",
            Field::Uncensored => "uncensored",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// A field value lifted out of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
    Flag(bool),
}

impl FieldValue {
    /// Whether the value carries no information. Flags are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(v) => v.is_empty(),
            FieldValue::Map(m) => m.is_empty(),
            FieldValue::Flag(_) => false,
        }
    }
}

/// Result of offering one source's value for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorbed {
    /// The value became the field's value.
    Taken,
    /// The value was appended to the union list, which now has this length.
    Appended(usize),
    /// Nothing changed.
    Skipped,
}

/// Apply `rule` to one incoming value.
///
/// `current` is the merged value so far. For [`Absorb::UnionOrdered`] the
/// incoming URLs go into `union` instead and `current` is left untouched.
pub fn absorb(
    rule: Absorb,
    current: &mut Option<FieldValue>,
    incoming: Option<&FieldValue>,
    union: &mut Vec<String>,
) -> Absorbed {
    let Some(incoming) = incoming else {
        return Absorbed::Skipped;
    };

    match rule {
        Absorb::FirstNonEmpty => {
            let populated = current.as_ref().is_some_and(|c| !c.is_empty());
            if !populated && !incoming.is_empty() {
                *current = Some(incoming.clone());
                Absorbed::Taken
            } else {
                Absorbed::Skipped
            }
        }
        Absorb::FirstNonNull => {
            if current.is_none() {
                *current = Some(incoming.clone());
                Absorbed::Taken
            } else {
                Absorbed::Skipped
            }
        }
        Absorb::UnionOrdered => {
            let before = union.len();
            let urls: &[String] = match incoming {
                FieldValue::Text(url) => std::slice::from_ref(url),
                FieldValue::List(urls) => urls,
                _ => &[],
            };
            for url in urls {
                if !url.is_empty() && !union.contains(url) {
                    union.push(url.clone());
                }
            }
            if union.len() > before {
                Absorbed::Appended(union.len())
            } else {
                Absorbed::Skipped
            }
        }
    }
}
