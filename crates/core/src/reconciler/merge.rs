//! Field-level merge of per-source records.

use tracing::{debug, info, warn};

use crate::metrics;
use crate::orchestrator::SourceResults;
use crate::record::{absorb, Absorbed, Field, FinalRecord, IdKind, Item, SourceRecord};
use crate::source::bare_name;

use super::alias::AliasTable;
use super::config::{ReconcilerConfig, WatermarkedCover};
use super::error::AggregationError;
use super::title::strip_trailing_cast;

/// Tag appended for items with burnt-in subtitles.
pub const HARD_SUB_TAG: &str = "Embedded Subtitles";
/// Tag appended for items flagged as uncensored releases.
pub const UNCENSORED_TAG: &str = "Uncensored Leak";

/// Merges per-source records into one final record.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcilerConfig,
    aliases: AliasTable,
}

impl Reconciler {
    pub fn new(config: ReconcilerConfig, aliases: AliasTable) -> Self {
        Self { config, aliases }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Merge `records`, which must already be in priority order.
    ///
    /// Fails when there is nothing to merge or a required field ends up
    /// empty. Wall-clock completion order of the sources plays no part.
    pub fn merge(
        &self,
        item: &Item,
        mut records: SourceResults,
    ) -> Result<FinalRecord, AggregationError> {
        let item_id = item.display_id().to_string();
        if records.is_empty() {
            for (source, status) in records.statuses() {
                warn!(item = %item_id, %source, ?status, "Source produced no record");
            }
            return Err(AggregationError::NoSuccessfulSource(item_id));
        }

        info!(item = %item_id, sources = records.len(), "Merging source records");

        let mut merged = SourceRecord {
            standard_id: item.standard_id.clone(),
            content_id: item.content_id.clone(),
            ..Default::default()
        };

        self.seed_tags(&records, &mut merged);

        if self.config.strip_trailing_cast_name {
            strip_titles(&mut records);
        }

        let (mut covers, big_covers) = absorb_all(&records, &mut merged);

        if self.config.respect_site_identifier {
            resolve_identifier(item.kind, &records, &mut merged);
        }

        self.handle_watermark(&records, &mut covers);

        if let Some(first) = covers.first() {
            merged.cover = Some(first.clone());
        }
        if let Some(first) = big_covers.first() {
            merged.big_cover = Some(first.clone());
        }
        metrics::COVER_CANDIDATES.observe(covers.len() as f64);

        let genre = merged.genre.get_or_insert_with(Vec::new);
        if item.hard_sub {
            push_unique(genre, HARD_SUB_TAG);
        }
        if item.uncensored {
            push_unique(genre, UNCENSORED_TAG);
        }

        let has_pics = merged.people_pics.as_ref().is_some_and(|p| !p.is_empty());
        if self.config.normalize_people && has_pics {
            self.normalize_people(&mut merged);
        }

        for &field in &self.config.required_fields {
            if merged.is_empty(field) {
                return Err(AggregationError::MissingField {
                    item: item_id,
                    field,
                });
            }
        }

        Ok(FinalRecord {
            info: merged,
            covers,
            big_covers,
        })
    }

    fn seed_tags(&self, records: &SourceResults, merged: &mut SourceRecord) {
        let Some(authority) = self.config.tag_authority.as_deref() else {
            return;
        };
        let authority = bare_name(authority);
        let tags = records
            .get(authority)
            .and_then(|r| r.genre.as_ref())
            .filter(|tags| !tags.is_empty());

        if let Some(tags) = tags {
            debug!(source = authority, "Using tag authority for genre");
            merged.genre = Some(tags.clone());
        }
    }

    fn handle_watermark(&self, records: &SourceResults, covers: &mut Vec<String>) {
        let Some(source) = self.config.watermarked_cover_source.as_deref() else {
            return;
        };
        let Some(cover) = records.get(bare_name(source)).and_then(|r| r.cover.as_ref()) else {
            return;
        };
        let Some(pos) = covers.iter().position(|c| c == cover) else {
            return;
        };

        match self.config.watermarked_cover {
            WatermarkedCover::Demote => {
                let cover = covers.remove(pos);
                covers.push(cover);
            }
            WatermarkedCover::Remove => {
                covers.remove(pos);
            }
            WatermarkedCover::Keep => {}
        }
    }

    fn normalize_people(&self, merged: &mut SourceRecord) {
        if let Some(people) = merged.people.as_mut() {
            for name in people.iter_mut() {
                let canonical = self.aliases.resolve(name).to_string();
                *name = canonical;
            }
        }
        if let Some(pics) = merged.people_pics.take() {
            merged.people_pics = Some(
                pics.into_iter()
                    .map(|(name, url)| (self.aliases.resolve(&name).to_string(), url))
                    .collect(),
            );
        }
    }
}

fn strip_titles(records: &mut SourceResults) {
    for (name, record) in records.iter_mut() {
        let (Some(title), Some(people)) = (record.title.as_deref(), record.people.as_deref())
        else {
            continue;
        };
        let stripped = strip_trailing_cast(title, people);
        if stripped != title {
            debug!(source = name, from = %title, to = %stripped, "Removed cast names from title");
            record.title = Some(stripped);
        }
    }
}

/// Walk sources in priority order, applying each field's absorption rule.
/// Returns the cover and high-resolution cover candidate lists.
fn absorb_all(records: &SourceResults, merged: &mut SourceRecord) -> (Vec<String>, Vec<String>) {
    let mut covers = Vec::new();
    let mut big_covers = Vec::new();
    let mut unused = Vec::new();

    for (name, record) in records.iter() {
        let mut absorbed = Vec::new();
        for field in Field::ALL {
            let incoming = record.get(field);
            let mut current = merged.get(field);
            let union = match field {
                Field::Cover => &mut covers,
                Field::BigCover => &mut big_covers,
                _ => &mut unused,
            };

            match absorb(field.absorb(), &mut current, incoming.as_ref(), union) {
                Absorbed::Taken => {
                    if let Some(value) = current {
                        merged.set(field, value);
                    }
                    absorbed.push(field.to_string());
                }
                Absorbed::Appended(n) => absorbed.push(format!("{} ({})", field, n)),
                Absorbed::Skipped => {}
            }
        }
        if !absorbed.is_empty() {
            debug!(source = name, fields = %absorbed.join(", "), "Absorbed fields");
        }
    }

    (covers, big_covers)
}

/// Let the identifier backed by the most titled sources win.
fn resolve_identifier(kind: IdKind, records: &SourceResults, merged: &mut SourceRecord) {
    let kind = match kind {
        IdKind::ContentId => IdKind::ContentId,
        IdKind::Standard | IdKind::Alternate => IdKind::Standard,
    };

    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for (name, record) in records.iter() {
        if !record.has_title() {
            continue;
        }
        let Some(id) = record.identifier(kind).filter(|id| !id.is_empty()) else {
            continue;
        };
        match groups.iter_mut().find(|(value, _)| *value == id) {
            Some((_, names)) => names.push(name),
            None => groups.push((id, vec![name])),
        }
    }

    // Earliest group wins ties.
    let mut winner: Option<&(&str, Vec<&str>)> = None;
    for group in &groups {
        if winner.is_none_or(|w| group.1.len() > w.1.len()) {
            winner = Some(group);
        }
    }
    let Some((id, names)) = winner else {
        return;
    };

    let slot = match kind {
        IdKind::ContentId => &mut merged.content_id,
        _ => &mut merged.standard_id,
    };
    if slot.as_deref() != Some(*id) {
        info!(
            from = ?slot,
            to = %id,
            sources = %names.join(", "),
            "Corrected identifier from source consensus"
        );
        *slot = Some(id.to_string());
    }
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}
