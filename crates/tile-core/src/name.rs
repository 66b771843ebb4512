//! Filename helpers shared by the resolver and the scanner
//!
//! All comparisons are ASCII case-insensitive, matching how tile names are
//! written on the case-insensitive filesystems the packs come from.

/// Check whether `name` ends with `suffix`, ignoring ASCII case
pub fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    tail_start(name, suffix).is_some()
}

/// Strip `suffix` from the end of `name`, ignoring ASCII case
///
/// Returns `None` when the suffix is absent.
pub fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    tail_start(name, suffix).map(|start| &name[..start])
}

/// Check for the image extension with at least one character before it
///
/// - "stone.png" -> true
/// - "STONE.PNG" -> true
/// - ".png" -> false
/// - "stone.jpg" -> false
pub fn is_image_file(name: &str, extension: &str) -> bool {
    strip_image_extension(name, extension).is_some()
}

/// Remove the image extension, returning the working name
pub fn strip_image_extension<'a>(name: &'a str, extension: &str) -> Option<&'a str> {
    strip_suffix_ignore_case(name, extension).filter(|stem| !stem.is_empty())
}

fn tail_start(name: &str, suffix: &str) -> Option<usize> {
    let start = name.len().checked_sub(suffix.len())?;
    if !name.is_char_boundary(start) {
        return None;
    }
    name[start..].eq_ignore_ascii_case(suffix).then_some(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ends_with_ignore_case() {
        assert!(ends_with_ignore_case("stone_N", "_n"));
        assert!(ends_with_ignore_case("stone", ""));
        assert!(!ends_with_ignore_case("n", "_n"));
        assert!(!ends_with_ignore_case("stone_s", "_n"));
    }

    #[test]
    fn test_strip_suffix_keeps_original_case() {
        assert_eq!(strip_suffix_ignore_case("Stone_Normal", "_normal"), Some("Stone"));
        assert_eq!(strip_suffix_ignore_case("stone", "_normal"), None);
    }

    #[test]
    fn test_strip_suffix_multibyte_boundary() {
        // 'é' is two bytes; a one-byte suffix window would split it
        assert_eq!(strip_suffix_ignore_case("pierr\u{e9}", "x"), None);
        assert!(!ends_with_ignore_case("\u{e9}", "a"));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("stone.png", ".png"));
        assert!(is_image_file("STONE.PNG", ".png"));
        assert!(!is_image_file(".png", ".png"));
        assert!(!is_image_file("stone.jpg", ".png"));
        assert!(!is_image_file("stone.png.txt", ".png"));
    }

    #[test]
    fn test_strip_image_extension() {
        assert_eq!(strip_image_extension("rock_n.Png", ".png"), Some("rock_n"));
        assert_eq!(strip_image_extension("readme.txt", ".png"), None);
    }
}
