//! Filesystem-safe text.

use super::config::Platform;

/// Look-alike replacements for characters a platform forbids in names.
fn replacement(platform: Platform, c: char) -> Option<char> {
    match (platform, c) {
        (Platform::Windows, '<') => Some('＜'),
        (Platform::Windows, '>') => Some('＞'),
        (Platform::Windows | Platform::Macos, ':') => Some('：'),
        (Platform::Windows, '"') => Some('＂'),
        (Platform::Windows | Platform::Linux, '/') => Some('／'),
        (Platform::Windows, '\\') => Some('＼'),
        (Platform::Windows, '|') => Some('｜'),
        (Platform::Windows, '?') => Some('？'),
        (Platform::Windows, '*') => Some('＊'),
        _ => None,
    }
}

/// Trim `value` and replace characters that are illegal in a file name.
///
/// NUL is dropped everywhere. A value made only of dots would read as a
/// relative path component, so its dots become full-width.
pub fn sanitize(value: &str, platform: Platform) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != '\0')
        .map(|c| replacement(platform, c).unwrap_or(c))
        .collect();
    if !cleaned.is_empty() && cleaned.chars().all(|c| c == '.') {
        return cleaned.replace('.', "．");
    }
    cleaned
}

/// Drop line breaks, which some filesystems refuse in paths.
pub fn strip_newlines(path: &str) -> String {
    path.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Length of `text` in the unit paths are limited by.
pub fn measure(text: &str, by_byte: bool) -> usize {
    if by_byte {
        text.len()
    } else {
        text.chars().count()
    }
}

/// Longest prefix of `text` whose measured length is at most `budget`.
pub fn truncate_to(text: &str, budget: usize, by_byte: bool) -> &str {
    let mut used = 0;
    for (idx, c) in text.char_indices() {
        used += if by_byte { c.len_utf8() } else { 1 };
        if used > budget {
            return &text[..idx];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_replacements() {
        assert_eq!(
            sanitize(r#" a<b>c:d"e/f\g|h?i*j "#, Platform::Windows),
            "a＜b＞c：d＂e／f＼g｜h？i＊j"
        );
    }

    #[test]
    fn test_unix_replacements() {
        assert_eq!(sanitize("a/b:c", Platform::Linux), "a／b:c");
        assert_eq!(sanitize("a/b:c", Platform::Macos), "a/b：c");
    }

    #[test]
    fn test_dot_only_values_cannot_escape() {
        assert_eq!(sanitize("..", Platform::Linux), "．．");
        assert_eq!(sanitize(" . ", Platform::Windows), "．");
        assert_eq!(sanitize("a..b", Platform::Linux), "a..b");
        assert_eq!(sanitize("", Platform::Linux), "");
    }

    #[test]
    fn test_nul_dropped() {
        assert_eq!(sanitize("a\0b", Platform::Linux), "ab");
    }

    #[test]
    fn test_strip_newlines() {
        assert_eq!(strip_newlines("a\nb\r\nc"), "abc");
    }

    #[test]
    fn test_measure_units() {
        assert_eq!(measure("日本", true), 6);
        assert_eq!(measure("日本", false), 2);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_to("日本語", 7, true), "日本");
        assert_eq!(truncate_to("日本語", 2, false), "日本");
        assert_eq!(truncate_to("abc", 10, true), "abc");
        assert_eq!(truncate_to("abc", 0, true), "");
    }
}
