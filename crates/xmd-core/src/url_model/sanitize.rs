//! Linux-safe filenames.

/// NAME_MAX on Linux, in bytes.
const NAME_MAX: usize = 255;

/// Room kept free for a ` (n)` collision suffix plus `.part`.
const SUFFIX_HEADROOM: usize = 16;

/// Longest name `sanitize_filename` returns.
pub const MAX_NAME_BYTES: usize = NAME_MAX - SUFFIX_HEADROOM;

/// Longest tail after the last `.` that still counts as an extension.
const MAX_EXTENSION_BYTES: usize = 10;

fn is_forbidden(c: char) -> bool {
    c == '/' || c == '\\' || c == '\0' || c.is_control() || c.is_whitespace()
}

/// Replace path separators, NUL, control and whitespace characters with a
/// single `_` per run, strip leading and trailing dots/underscores, and cut
/// to [`MAX_NAME_BYTES`] on a char boundary. A cut keeps the extension and
/// shortens the stem.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if is_forbidden(c) || c == '_' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let cleaned = out.trim_matches(|c| c == '.' || c == '_');
    if cleaned.len() <= MAX_NAME_BYTES {
        return cleaned.to_string();
    }

    let (stem, ext) = match cleaned.rfind('.') {
        Some(i) if i > 0 && cleaned.len() - i <= MAX_EXTENSION_BYTES => cleaned.split_at(i),
        _ => (cleaned, ""),
    };
    let mut cut = MAX_NAME_BYTES - ext.len();
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{ext}", &stem[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_and_spaces_become_underscores() {
        assert_eq!(sanitize_filename("my clip/part\\2.mp4"), "my_clip_part_2.mp4");
        assert_eq!(sanitize_filename("a \t b.jpg"), "a_b.jpg");
    }

    #[test]
    fn strips_hidden_file_dots() {
        assert_eq!(sanitize_filename("..secret.mp4."), "secret.mp4");
        assert_eq!(sanitize_filename(".."), "");
    }

    #[test]
    fn limits_length_on_char_boundary() {
        let long = "é".repeat(200);
        let out = sanitize_filename(&long);
        assert!(out.len() <= MAX_NAME_BYTES);
        assert!(out.chars().all(|c| c == 'é'));
    }

    #[test]
    fn long_names_keep_their_extension() {
        let out = sanitize_filename(&format!("{}.mp4", "a".repeat(300)));
        assert_eq!(out.len(), MAX_NAME_BYTES);
        assert!(out.ends_with("aaa.mp4"));

        // Collision suffix and temp suffix still fit in NAME_MAX.
        assert!(format!("{} (9999).part", out).len() <= NAME_MAX);
    }

    #[test]
    fn long_dotted_tail_is_not_treated_as_extension() {
        let out = sanitize_filename(&format!("clip.{}", "b".repeat(300)));
        assert_eq!(out.len(), MAX_NAME_BYTES);
        assert!(out.starts_with("clip.bbb"));
    }
}
