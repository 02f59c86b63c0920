//! Choosing one URL among regex candidates.

const RESOLUTION_TOKENS: [&str; 4] = ["720p", "1080p", "720x", "1080x"];

/// A capture is usable when it is an absolute https URL with no stray quotes.
pub fn is_candidate(url: &str) -> bool {
    url.contains("https://") && !url.contains('"') && !url.contains('\'')
}

/// Explicit resolution token in the URL, mapped to its height.
pub fn resolution_hint(url: &str) -> Option<u64> {
    RESOLUTION_TOKENS
        .iter()
        .find(|t| url.contains(*t))
        .map(|t| if t.starts_with("1080") { 1080 } else { 720 })
}

/// Pick the best candidate.
///
/// `.mp4` URLs win over everything else. Among them the first carrying a
/// resolution token wins, otherwise the longest (first of equal length).
/// Without any `.mp4`, the first candidate is returned.
pub fn select_best(candidates: &[String]) -> Option<&str> {
    let mp4: Vec<&str> = candidates
        .iter()
        .map(String::as_str)
        .filter(|u| u.to_ascii_lowercase().contains(".mp4"))
        .collect();

    if !mp4.is_empty() {
        if let Some(tagged) = mp4.iter().find(|u| resolution_hint(u).is_some()) {
            return Some(tagged);
        }
        let mut longest = mp4[0];
        for u in &mp4[1..] {
            if u.len() > longest.len() {
                longest = u;
            }
        }
        return Some(longest);
    }

    candidates.first().map(String::as_str)
}
