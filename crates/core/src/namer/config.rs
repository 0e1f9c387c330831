//! Namer configuration types.

use serde::{Deserialize, Serialize};

/// Target filesystem family; decides illegal characters and how path
/// length is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    Macos,
    Linux,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else {
            Platform::Linux
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Placeholder values used when the record has nothing for a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingDefaults {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_people")]
    pub people: String,
    #[serde(default = "default_serial")]
    pub serial: String,
    #[serde(default = "default_director")]
    pub director: String,
    #[serde(default = "default_producer")]
    pub producer: String,
    #[serde(default = "default_publisher")]
    pub publisher: String,
}

fn default_title() -> String {
    "#unknown title".to_string()
}

fn default_people() -> String {
    "#unknown cast".to_string()
}

fn default_serial() -> String {
    "#unknown serial".to_string()
}

fn default_director() -> String {
    "#unknown director".to_string()
}

fn default_producer() -> String {
    "#unknown producer".to_string()
}

fn default_publisher() -> String {
    "#unknown publisher".to_string()
}

impl Default for NamingDefaults {
    fn default() -> Self {
        Self {
            title: default_title(),
            people: default_people(),
            serial: default_serial(),
            director: default_director(),
            producer: default_producer(),
            publisher: default_publisher(),
        }
    }
}

/// Values of the `censor` placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensorLabels {
    #[serde(default = "default_censored")]
    pub censored: String,
    #[serde(default = "default_uncensored")]
    pub uncensored: String,
    #[serde(default = "default_unknown")]
    pub unknown: String,
}

fn default_censored() -> String {
    "Censored".to_string()
}

fn default_uncensored() -> String {
    "Uncensored".to_string()
}

fn default_unknown() -> String {
    "Unknown".to_string()
}

impl Default for CensorLabels {
    fn default() -> Self {
        Self {
            censored: default_censored(),
            uncensored: default_uncensored(),
            unknown: default_unknown(),
        }
    }
}

/// Naming templates and path constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamerConfig {
    /// Output directory template.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Base name template for the media files.
    #[serde(default = "default_basename")]
    pub basename: String,

    /// Title written into the NFO file.
    #[serde(default = "default_nfo_title")]
    pub nfo_title: String,

    #[serde(default = "default_nfo_basename")]
    pub nfo_basename: String,

    #[serde(default = "default_fanart_basename")]
    pub fanart_basename: String,

    #[serde(default = "default_poster_basename")]
    pub poster_basename: String,

    /// When false, outputs go next to the existing media file.
    #[serde(default = "default_move_files")]
    pub move_files: bool,

    /// Names beyond this count are replaced by an ellipsis.
    #[serde(default = "default_max_people")]
    pub max_people: usize,

    /// Maximum absolute path length.
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,

    /// Measure path length in UTF-8 bytes on Windows too.
    #[serde(default)]
    pub length_by_byte: bool,

    #[serde(default)]
    pub platform: Platform,

    #[serde(default)]
    pub defaults: NamingDefaults,

    #[serde(default)]
    pub censor: CensorLabels,
}

fn default_output_folder() -> String {
    "library/{actress}/[{num}] {title}".to_string()
}

fn default_basename() -> String {
    "{num}".to_string()
}

fn default_nfo_title() -> String {
    "{num} {title}".to_string()
}

fn default_nfo_basename() -> String {
    "{num}".to_string()
}

fn default_fanart_basename() -> String {
    "{num}-fanart".to_string()
}

fn default_poster_basename() -> String {
    "{num}-poster".to_string()
}

fn default_move_files() -> bool {
    true
}

fn default_max_people() -> usize {
    10
}

fn default_max_path_length() -> usize {
    250
}

impl Default for NamerConfig {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            basename: default_basename(),
            nfo_title: default_nfo_title(),
            nfo_basename: default_nfo_basename(),
            fanart_basename: default_fanart_basename(),
            poster_basename: default_poster_basename(),
            move_files: default_move_files(),
            max_people: default_max_people(),
            max_path_length: default_max_path_length(),
            length_by_byte: false,
            platform: Platform::default(),
            defaults: NamingDefaults::default(),
            censor: CensorLabels::default(),
        }
    }
}

impl NamerConfig {
    /// Every template with the name it is configured under.
    pub fn templates(&self) -> [(&'static str, &str); 6] {
        [
            ("output_folder", self.output_folder.as_str()),
            ("basename", self.basename.as_str()),
            ("nfo_title", self.nfo_title.as_str()),
            ("nfo_basename", self.nfo_basename.as_str()),
            ("fanart_basename", self.fanart_basename.as_str()),
            ("poster_basename", self.poster_basename.as_str()),
        ]
    }

    /// Whether path length is counted in bytes rather than characters.
    pub fn counts_bytes(&self) -> bool {
        self.length_by_byte || self.platform != Platform::Windows
    }

    pub fn with_output_folder(mut self, template: impl Into<String>) -> Self {
        self.output_folder = template.into();
        self
    }

    pub fn with_basename(mut self, template: impl Into<String>) -> Self {
        self.basename = template.into();
        self
    }

    /// Sets the NFO, fanart and poster base name templates.
    pub fn with_sidecar_basenames(
        mut self,
        nfo: impl Into<String>,
        fanart: impl Into<String>,
        poster: impl Into<String>,
    ) -> Self {
        self.nfo_basename = nfo.into();
        self.fanart_basename = fanart.into();
        self.poster_basename = poster.into();
        self
    }

    pub fn with_max_path_length(mut self, max: usize) -> Self {
        self.max_path_length = max;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_move_files(mut self, move_files: bool) -> Self {
        self.move_files = move_files;
        self
    }

    pub fn with_max_people(mut self, max: usize) -> Self {
        self.max_people = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: NamerConfig = toml::from_str("").unwrap();
        assert_eq!(config.basename, "{num}");
        assert_eq!(config.max_people, 10);
        assert_eq!(config.max_path_length, 250);
        assert!(config.move_files);
        assert_eq!(config.platform, Platform::current());
        assert_eq!(config.censor.uncensored, "Uncensored");
    }

    #[test]
    fn test_parse_nested_sections() {
        let config: NamerConfig = toml::from_str(
            r#"
            output_folder = "out/{label}/{num}"
            platform = "windows"
            length_by_byte = true

            [defaults]
            people = "nobody"

            [censor]
            censored = "C"
            "#,
        )
        .unwrap();

        assert_eq!(config.output_folder, "out/{label}/{num}");
        assert_eq!(config.platform, Platform::Windows);
        assert!(config.counts_bytes());
        assert_eq!(config.defaults.people, "nobody");
        assert_eq!(config.defaults.title, "#unknown title");
        assert_eq!(config.censor.censored, "C");
        assert_eq!(config.censor.uncensored, "Uncensored");
    }

    #[test]
    fn test_windows_counts_chars_by_default() {
        let config = NamerConfig::default().with_platform(Platform::Windows);
        assert!(!config.counts_bytes());
        let config = NamerConfig::default().with_platform(Platform::Linux);
        assert!(config.counts_bytes());
    }
}
