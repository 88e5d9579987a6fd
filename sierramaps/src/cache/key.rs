//! Cache key derivation.
//!
//! Tile URLs are mapped to flat filenames by replacing every character
//! outside `[A-Za-z0-9]` with `_`. The mapping is deterministic but not
//! injective: `a/b` and `a:b` share a key. For URLs generated from a single
//! tile template that never happens in practice.
//!
//! Example: `https://host/tiles/1/2/3` → `https___host_tiles_1_2_3`

/// Replacement for every non-alphanumeric character.
pub const KEY_SEPARATOR: char = '_';

/// Derive the cache key for a URL.
///
/// Only ASCII letters and digits are kept; anything else (including
/// non-ASCII letters) becomes [`KEY_SEPARATOR`], one per `char`.
pub fn sanitize(url: &str) -> String {
    url.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else {
                KEY_SEPARATOR
            }
        })
        .collect()
}

/// Returns true if `key` could have been produced by [`sanitize`].
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == KEY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_tile_url() {
        assert_eq!(
            sanitize("https://sierramapstiles.onrender.com/tiles/12/34/5"),
            "https___sierramapstiles_onrender_com_tiles_12_34_5"
        );
    }

    #[test]
    fn test_sanitize_keeps_alphanumerics() {
        assert_eq!(sanitize("abcXYZ0189"), "abcXYZ0189");
    }

    #[test]
    fn test_sanitize_query_string() {
        assert_eq!(sanitize("a?b=c&d"), "a_b_c_d");
    }

    #[test]
    fn test_sanitize_non_ascii_is_one_separator_per_char() {
        assert_eq!(sanitize("tÿle"), "t_le");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize(""), "");
        assert!(!is_valid_key(""));
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("https___host_tiles_1_2_3"));
        assert!(!is_valid_key("../etc/passwd"));
        assert!(!is_valid_key("tile.png"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_sanitize_output_charset(url in ".*") {
                let key = sanitize(&url);
                prop_assert!(key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == KEY_SEPARATOR));
            }

            #[test]
            fn test_sanitize_is_deterministic(url in ".*") {
                prop_assert_eq!(sanitize(&url), sanitize(&url));
            }

            #[test]
            fn test_sanitize_preserves_char_count(url in ".*") {
                prop_assert_eq!(sanitize(&url).chars().count(), url.chars().count());
            }

            #[test]
            fn test_sanitize_is_idempotent(url in ".*") {
                let once = sanitize(&url);
                prop_assert_eq!(sanitize(&once), once.clone());
            }
        }
    }
}
