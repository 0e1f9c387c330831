//! Naming plan construction with path-length fitting.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::metrics;
use crate::record::{FinalRecord, Item};

use super::chunk::split_by_punctuation;
use super::config::NamerConfig;
use super::sanitize::{measure, sanitize, strip_newlines, truncate_to};
use super::template::{Template, TemplateError};
use super::types::NamingPlan;

/// Marker appended when the cast list is cut short.
const ELLIPSIS: &str = "…";

const NFO_EXT: &str = ".nfo";
const IMAGE_EXT: &str = ".jpg";

#[derive(Clone)]
struct Templates {
    output_folder: Template,
    basename: Template,
    nfo_title: Template,
    nfo_basename: Template,
    fanart_basename: Template,
    poster_basename: Template,
}

/// Derives output paths for merged items.
#[derive(Clone)]
pub struct Namer {
    config: NamerConfig,
    templates: Templates,
    base_dir: PathBuf,
}

impl std::fmt::Debug for Namer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namer")
            .field("config", &self.config)
            .field("base_dir", &self.base_dir)
            .finish()
    }
}

impl Namer {
    /// Parse the configured templates. Relative output paths are resolved
    /// against the current directory.
    pub fn new(config: NamerConfig) -> Result<Self, TemplateError> {
        let templates = Templates {
            output_folder: Template::parse(&config.output_folder)?,
            basename: Template::parse(&config.basename)?,
            nfo_title: Template::parse(&config.nfo_title)?,
            nfo_basename: Template::parse(&config.nfo_basename)?,
            fanart_basename: Template::parse(&config.fanart_basename)?,
            poster_basename: Template::parse(&config.poster_basename)?,
        };
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Ok(Self {
            config,
            templates,
            base_dir,
        })
    }

    /// Resolve relative output paths against `dir` instead.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn config(&self) -> &NamerConfig {
        &self.config
    }

    /// Build the naming dictionary for a record. Values are sanitized.
    pub fn dictionary(&self, record: &FinalRecord) -> BTreeMap<String, String> {
        let info = &record.info;
        let defaults = &self.config.defaults;
        let or_default = |value: &Option<String>, default: &str| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let num = record.display_id().to_string();
        let title = or_default(&info.title, &defaults.title);
        let raw_title = or_default(&info.original_title, &title);
        let date = or_default(&info.publish_date, "0000-00-00");
        let year = date.split('-').next().unwrap_or_default().to_string();
        let label = match num.split_once('-') {
            Some((prefix, _)) => prefix.to_uppercase(),
            None => "---".to_string(),
        };
        let censor = match info.uncensored {
            Some(true) => self.config.censor.uncensored.clone(),
            Some(false) => self.config.censor.censored.clone(),
            None => self.config.censor.unknown.clone(),
        };

        let mut dict = BTreeMap::new();
        dict.insert("num".to_string(), num);
        dict.insert("title".to_string(), title);
        dict.insert("rawtitle".to_string(), raw_title);
        dict.insert("actress".to_string(), self.people_display(record));
        dict.insert("score".to_string(), or_default(&info.score, "0"));
        dict.insert("censor".to_string(), censor);
        dict.insert("serial".to_string(), or_default(&info.serial, &defaults.serial));
        dict.insert("director".to_string(), or_default(&info.director, &defaults.director));
        dict.insert("producer".to_string(), or_default(&info.producer, &defaults.producer));
        dict.insert("publisher".to_string(), or_default(&info.publisher, &defaults.publisher));
        dict.insert("date".to_string(), date);
        dict.insert("year".to_string(), year);
        dict.insert("label".to_string(), label);
        dict.insert(
            "genre".to_string(),
            info.genre.as_deref().unwrap_or_default().join(","),
        );

        for value in dict.values_mut() {
            *value = sanitize(value, self.config.platform);
        }
        dict
    }

    fn people_display(&self, record: &FinalRecord) -> String {
        let people = record.info.people.as_deref().unwrap_or_default();
        if people.is_empty() {
            return self.config.defaults.people.clone();
        }
        if people.len() > self.config.max_people {
            debug!(count = people.len(), max = self.config.max_people, "Truncating cast list");
            let mut shown: Vec<&str> = people[..self.config.max_people]
                .iter()
                .map(String::as_str)
                .collect();
            shown.push(ELLIPSIS);
            shown.join(",")
        } else {
            people.join(",")
        }
    }

    /// Derive the naming plan for `item` from its merged `record`.
    ///
    /// Titles are shortened chunk by chunk until the longest output path
    /// fits the configured limit; if no chunk combination fits, both titles
    /// are sliced to the remaining budget. This never fails.
    pub fn plan(&self, item: &Item, record: &FinalRecord) -> NamingPlan {
        let dict = self.dictionary(record);
        let nfo_title = self.templates.nfo_title.render(&dict);

        let title = dict.get("title").cloned().unwrap_or_default();
        let raw_title = dict.get("rawtitle").cloned().unwrap_or_default();
        let title_chunks = split_by_punctuation(&title);
        let raw_chunks = split_by_punctuation(&raw_title);

        let mut names = dict.clone();
        if let Some(num) = names.get_mut("num") {
            num.push_str(&sanitize(&item.attr_suffix, self.config.platform));
        }
        let ext = longest_extension(&item.files);

        for raw_end in (1..=raw_chunks.len()).rev() {
            let raw = self.join_chunks(&raw_chunks[..raw_end]);
            names.insert("rawtitle".to_string(), raw);
            for title_end in (1..=title_chunks.len()).rev() {
                let shortened = self.join_chunks(&title_chunks[..title_end]);
                names.insert("title".to_string(), shortened);

                let (save_dir, basename) = self.locate(item, &names);
                if self.remaining(&save_dir, &basename, &ext, &names) > 0 {
                    let kind = if raw_end == raw_chunks.len() && title_end == title_chunks.len() {
                        "none"
                    } else {
                        "chunked"
                    };
                    return self.finish(save_dir, basename, nfo_title, &names, &dict, kind);
                }
            }
        }

        // Nothing fits: slice both titles to what is left once they are empty.
        names.insert("title".to_string(), String::new());
        names.insert("rawtitle".to_string(), String::new());
        let (save_dir, basename) = self.locate(item, &names);
        let remaining = self.remaining(&save_dir, &basename, &ext, &names);
        let file_templates = [
            &self.templates.basename,
            &self.templates.nfo_basename,
            &self.templates.fanart_basename,
            &self.templates.poster_basename,
        ];
        // Worst case over every output file: folder plus that file's name.
        let occurrences = ["title", "rawtitle"]
            .iter()
            .map(|key| self.templates.output_folder.occurrences(key))
            .sum::<usize>()
            + file_templates
                .iter()
                .map(|t| t.occurrences("title") + t.occurrences("rawtitle"))
                .max()
                .unwrap_or(0);
        let occurrences = occurrences.max(1);
        let budget = usize::try_from(remaining - 1).unwrap_or(0) / occurrences;

        warn!(
            item = %item.display_id(),
            remaining,
            budget,
            "Output path too long even at one title chunk, slicing titles"
        );

        let by_byte = self.config.counts_bytes();
        names.insert(
            "title".to_string(),
            truncate_to(&title, budget, by_byte).trim().to_string(),
        );
        names.insert(
            "rawtitle".to_string(),
            truncate_to(&raw_title, budget, by_byte).trim().to_string(),
        );
        let (save_dir, basename) = self.locate(item, &names);
        self.finish(save_dir, basename, nfo_title, &names, &dict, "sliced")
    }

    fn join_chunks(&self, chunks: &[&str]) -> String {
        sanitize(&chunks.concat(), self.config.platform)
    }

    /// Output directory and base name for the current dictionary.
    fn locate(&self, item: &Item, names: &BTreeMap<String, String>) -> (String, String) {
        if !self.config.move_files {
            if let Some(file) = item.files.first() {
                let dir = file
                    .parent()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let stem = file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                return (dir, stem);
            }
            warn!(item = %item.display_id(), "In-place naming without source files, using templates");
        }

        let save_dir = normalize(Path::new(&self.templates.output_folder.render(names)));
        let basename = normalize(Path::new(&self.templates.basename.render(names)));
        (
            save_dir.to_string_lossy().trim().to_string(),
            basename.to_string_lossy().trim().to_string(),
        )
    }

    /// File names for the NFO, fanart and poster, in that order.
    fn sidecar_names(&self, names: &BTreeMap<String, String>) -> [String; 3] {
        let name = |template: &Template, ext: &str| {
            strip_newlines(&format!("{}{}", template.render(names), ext))
        };
        [
            name(&self.templates.nfo_basename, NFO_EXT),
            name(&self.templates.fanart_basename, IMAGE_EXT),
            name(&self.templates.poster_basename, IMAGE_EXT),
        ]
    }

    /// Path budget left for the longest output file, media and sidecars
    /// alike; positive means everything fits.
    fn remaining(
        &self,
        save_dir: &str,
        basename: &str,
        ext: &str,
        names: &BTreeMap<String, String>,
    ) -> i64 {
        let dir = self.base_dir.join(strip_newlines(save_dir));
        let media = format!("{}{}", strip_newlines(basename), ext);
        let used = std::iter::once(media)
            .chain(self.sidecar_names(names))
            .map(|file| {
                let path = normalize(&dir.join(file));
                measure(&path.to_string_lossy(), self.config.counts_bytes())
            })
            .max()
            .unwrap_or(0);
        self.config.max_path_length as i64 - used as i64
    }

    fn finish(
        &self,
        save_dir: String,
        basename: String,
        nfo_title: String,
        names: &BTreeMap<String, String>,
        dict: &BTreeMap<String, String>,
        kind: &str,
    ) -> NamingPlan {
        let title = names.get("title").cloned().unwrap_or_default();
        let raw_title = names.get("rawtitle").cloned().unwrap_or_default();
        if dict.get("title") != Some(&title) {
            info!(title = %title, "Shortened title to fit path limit");
        }
        if dict.get("rawtitle") != Some(&raw_title) {
            info!(raw_title = %raw_title, "Shortened original title to fit path limit");
        }
        metrics::NAMING_TRUNCATIONS.with_label_values(&[kind]).inc();

        let save_dir = PathBuf::from(strip_newlines(&save_dir));
        let [nfo, fanart, poster] = self.sidecar_names(names);

        NamingPlan {
            nfo_file: save_dir.join(nfo),
            fanart_file: save_dir.join(fanart),
            poster_file: save_dir.join(poster),
            save_dir,
            basename: strip_newlines(&basename),
            nfo_title: strip_newlines(&nfo_title),
            title,
            raw_title,
        }
    }
}

/// Longest extension, dot included, among the item's files.
fn longest_extension(files: &[PathBuf]) -> String {
    files
        .iter()
        .filter_map(|f| f.extension())
        .map(|e| format!(".{}", e.to_string_lossy()))
        .max_by_key(|e| e.len())
        .unwrap_or_default()
}

/// Lexically collapse `.`, `..` and repeated separators.
fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}
