//! Punctuation-delimited title chunks.

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{00A1}'
                | '\u{00A7}'
                | '\u{00AB}'
                | '\u{00B6}'
                | '\u{00B7}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{3001}'..='\u{3003}'
                | '\u{3008}'..='\u{3011}'
                | '\u{3014}'..='\u{301F}'
                | '\u{30FB}'
                | '\u{FF01}'..='\u{FF0F}'
                | '\u{FF1A}'..='\u{FF20}'
                | '\u{FF3B}'..='\u{FF40}'
                | '\u{FF5B}'..='\u{FF65}'
        )
}

/// Split `text` after every punctuation character.
///
/// Each chunk keeps its trailing punctuation, so concatenating a prefix of
/// the chunks yields a prefix of the text. Always returns at least one
/// chunk; an empty text yields `[""]`.
pub fn split_by_punctuation(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if is_punctuation(c) {
            let end = idx + c.len_utf8();
            chunks.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() || chunks.is_empty() {
        chunks.push(&text[start..]);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_trailing_punctuation() {
        assert_eq!(
            split_by_punctuation("Foo, bar! baz"),
            vec!["Foo,", " bar!", " baz"]
        );
    }

    #[test]
    fn test_split_cjk_punctuation() {
        assert_eq!(
            split_by_punctuation("夏の日、海へ。続き"),
            vec!["夏の日、", "海へ。", "続き"]
        );
    }

    #[test]
    fn test_no_punctuation_is_one_chunk() {
        assert_eq!(split_by_punctuation("plain title"), vec!["plain title"]);
    }

    #[test]
    fn test_trailing_punctuation_adds_no_empty_chunk() {
        assert_eq!(split_by_punctuation("a.b."), vec!["a.", "b."]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(split_by_punctuation(""), vec![""]);
    }

    #[test]
    fn test_prefixes_concatenate_to_text() {
        let text = "One: two, three (four) five";
        let chunks = split_by_punctuation(text);
        assert_eq!(chunks.concat(), text);
    }
}
