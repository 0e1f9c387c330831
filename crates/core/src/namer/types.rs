use std::path::PathBuf;

use serde::Serialize;

/// Resolved output locations and titles for one item.
///
/// No path component contains a line break or a character the target
/// filesystem forbids. The media file and every sidecar path stay under the
/// configured length whenever shortening the titles can achieve that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingPlan {
    pub save_dir: PathBuf,
    /// Base name for the media files, without extension.
    pub basename: String,
    pub nfo_file: PathBuf,
    pub fanart_file: PathBuf,
    pub poster_file: PathBuf,
    /// Title for the NFO document, rendered from the untruncated values.
    pub nfo_title: String,
    /// Display title as used in the paths, possibly shortened.
    pub title: String,
    /// Original-language title as used in the paths, possibly shortened.
    pub raw_title: String,
}
