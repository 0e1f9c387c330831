//! Title clean-up applied to source records before the merge.

use regex_lite::Regex;

/// Separators sites put between a title and a trailing cast list.
const CAST_DELIMITERS: &str = r"\- &·,;　＆・，；";

/// Remove a trailing run of `people` names from `title`.
///
/// `"Summer Story - Alice"` with cast `["Alice"]` becomes `"Summer Story"`.
/// Several names may trail, each preceded by one to three delimiters. A
/// title made only of cast names is returned unchanged.
pub fn strip_trailing_cast(title: &str, people: &[String]) -> String {
    let names: Vec<String> = people
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| regex_lite::escape(p))
        .collect();
    if title.is_empty() || names.is_empty() {
        return title.to_string();
    }

    let pattern = format!(
        "^(.*?)(?:[{}]{{1,3}}(?:{}))+$",
        CAST_DELIMITERS,
        names.join("|")
    );
    let Ok(re) = Regex::new(&pattern) else {
        return title.to_string();
    };

    match re.captures(title).and_then(|c| c.get(1)) {
        Some(head) if !head.as_str().is_empty() => head.as_str().to_string(),
        _ => title.to_string(),
    }
}
