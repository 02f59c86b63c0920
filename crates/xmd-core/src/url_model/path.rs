//! Filename hints from a media URL.

/// Last path segment of `url`, query excluded. Segments shorter than three
/// characters are not useful names and yield `None`.
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment.len() < 3 || segment.chars().all(|c| c == '.') {
        return None;
    }
    Some(segment.to_string())
}

/// Value of the `format` query parameter (`?format=png&name=orig` → `png`).
pub fn query_format(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let format = parsed
        .query_pairs()
        .find(|(k, _)| k == "format")
        .map(|(_, v)| v.into_owned())?;
    (!format.is_empty()).then_some(format)
}
