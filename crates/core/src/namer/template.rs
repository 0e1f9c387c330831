//! `{key}` string templates over the naming dictionary.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

/// Placeholders the naming dictionary provides.
pub const KNOWN_KEYS: [&str; 14] = [
    "num", "title", "rawtitle", "actress", "score", "censor", "serial", "director", "producer",
    "publisher", "date", "year", "label", "genre",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder '{{{key}}}' in template '{template}'")]
    UnknownKey { template: String, key: String },

    #[error("unclosed '{{' in template '{0}'")]
    Unclosed(String),

    #[error("unmatched '}}' in template '{0}'")]
    Unmatched(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Key(String),
}

/// A parsed template. `{{` and `}}` render as literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse and check that every placeholder is a known key.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(k) => key.push(k),
                            None => return Err(TemplateError::Unclosed(source.to_string())),
                        }
                    }
                    let key = key.trim().to_string();
                    if !KNOWN_KEYS.contains(&key.as_str()) {
                        return Err(TemplateError::UnknownKey {
                            template: source.to_string(),
                            key,
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Key(key));
                }
                '}' => return Err(TemplateError::Unmatched(source.to_string())),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// How many times `key` appears.
    pub fn occurrences(&self, key: &str) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Key(k) if k == key))
            .count()
    }

    /// Substitute placeholders; a key missing from `dict` renders empty.
    pub fn render(&self, dict: &BTreeMap<String, String>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Key(key) => {
                    if let Some(value) = dict.get(key) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_placeholders() {
        let template: Template = "[{num}] {title}".parse().unwrap();
        let out = template.render(&dict(&[("num", "ABC-123"), ("title", "Foo")]));
        assert_eq!(out, "[ABC-123] Foo");
    }

    #[test]
    fn test_escaped_braces() {
        let template = Template::parse("{{{num}}}").unwrap();
        assert_eq!(template.render(&dict(&[("num", "X")])), "{X}");
    }

    #[test]
    fn test_missing_value_renders_empty() {
        let template = Template::parse("{num}-{title}").unwrap();
        assert_eq!(template.render(&dict(&[("num", "X")])), "X-");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Template::parse("{num} {bogus}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownKey {
                template: "{num} {bogus}".to_string(),
                key: "bogus".to_string()
            }
        );
        assert!(err.to_string().contains("{bogus}"));
    }

    #[test]
    fn test_malformed_braces() {
        assert!(matches!(
            Template::parse("{num"),
            Err(TemplateError::Unclosed(_))
        ));
        assert!(matches!(
            Template::parse("num}"),
            Err(TemplateError::Unmatched(_))
        ));
    }

    #[test]
    fn test_occurrences() {
        let template = Template::parse("{title}/{num} {title}").unwrap();
        assert_eq!(template.occurrences("title"), 2);
        assert_eq!(template.occurrences("rawtitle"), 0);
    }
}
