// src/organize/matcher.rs

use crate::config::Destination;

/// Returns true if `filename` satisfies `dest`.
///
/// - prefix and suffix set: both must hold.
/// - only one set: that one must hold.
/// - neither set: never matches.
///
/// Empty strings count as unset.
pub fn matches(filename: &str, dest: &Destination) -> bool {
    match (dest.prefix(), dest.suffix()) {
        (Some(prefix), Some(suffix)) => {
            filename.starts_with(prefix) && filename.ends_with(suffix)
        }
        (Some(prefix), None) => filename.starts_with(prefix),
        (None, Some(suffix)) => filename.ends_with(suffix),
        (None, None) => false,
    }
}
