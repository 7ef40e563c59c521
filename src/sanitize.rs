//! Filesystem-safe name sanitization.
//!
//! Track and folder titles come from the API as arbitrary Unicode and may
//! contain characters that are illegal in Windows paths. Every title is run
//! through [`sanitize`] before it becomes a path segment, at every tree depth.

/// Characters that cannot appear in a Windows path segment.
pub const RESTRICTED_CHARS: [char; 8] = ['?', '<', '>', ':', '/', '\\', '*', '|'];

/// Filesystem character-set restrictions of the target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Restricted character set (`? < > : / \ * |` are illegal).
    Windows,
    /// No restriction beyond NUL; titles pass through unchanged.
    Unix,
}

impl Platform {
    /// Returns the platform the crate was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// Maps a title to a filesystem-safe path segment.
///
/// On [`Platform::Windows`] every restricted character is replaced with `_`;
/// on [`Platform::Unix`] the title is returned unchanged. Pure and total.
#[must_use]
pub fn sanitize(name: &str, platform: Platform) -> String {
    match platform {
        Platform::Unix => name.to_string(),
        Platform::Windows => name
            .chars()
            .map(|c| if RESTRICTED_CHARS.contains(&c) { '_' } else { c })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_replaces_restricted_chars() {
        assert_eq!(sanitize("a:b*c", Platform::Windows), "a_b_c");
        assert_eq!(sanitize("01 <op> ?.wav", Platform::Windows), "01 _op_ _.wav");
        assert_eq!(sanitize(r"dir\file|x", Platform::Windows), "dir_file_x");
    }

    #[test]
    fn windows_passes_safe_names_through() {
        assert_eq!(sanitize("track 01.mp3", Platform::Windows), "track 01.mp3");
        assert_eq!(sanitize("おやすみボイス", Platform::Windows), "おやすみボイス");
    }

    #[test]
    fn unix_is_identity() {
        assert_eq!(sanitize("a:b*c", Platform::Unix), "a:b*c");
        assert_eq!(sanitize("", Platform::Unix), "");
    }

    #[test]
    fn empty_name_stays_empty() {
        assert_eq!(sanitize("", Platform::Windows), "");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn windows_output_never_contains_restricted(name in ".*") {
                let out = sanitize(&name, Platform::Windows);
                prop_assert!(!out.chars().any(|c| RESTRICTED_CHARS.contains(&c)));
            }

            #[test]
            fn windows_preserves_char_count(name in ".*") {
                let out = sanitize(&name, Platform::Windows);
                prop_assert_eq!(out.chars().count(), name.chars().count());
            }

            #[test]
            fn unix_round_trips(name in ".*") {
                prop_assert_eq!(sanitize(&name, Platform::Unix), name);
            }
        }
    }
}
