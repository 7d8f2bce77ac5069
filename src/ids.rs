//! Byte-level helpers for annotation identifiers
//!
//! F-structure identifiers encode their hierarchy in the id string itself,
//! e.g. `s3392_0_f_7` for functional level 7 and `s3392_0_f_7_PRED` for a
//! PRED attribute on that level. `_f_0` is the functional root.

use memchr::memmem;

/// Marker separating the sentence prefix from the functional level number
pub const FUNCTIONAL_MARKER: &str = "_f_";

/// Marker opening a set-valued (bracketed) f-structure element
pub const SET_MARKER: u8 = b'$';

/// Does this id belong to the functional layer?
#[inline]
pub fn is_functional_id(id: &str) -> bool {
    memmem::find(id.as_bytes(), FUNCTIONAL_MARKER.as_bytes()).is_some()
}

/// Divide a bytestring into two at the last occurrence of delim
#[inline]
pub fn bs_rsplit_once(bytes: &[u8], delim: u8) -> Option<(&[u8], &[u8])> {
    let pos = memchr::memrchr(delim, bytes)?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}

/// The last `_`-separated segment of an id
#[inline]
pub fn last_segment(id: &str) -> &str {
    match id.rfind('_') {
        Some(pos) => &id[pos + 1..],
        None => id,
    }
}

/// Numeric functional level of an id ending in `_f_<n>`
///
/// Returns None when the id does not end in a functional level suffix.
pub fn level_number(id: &str) -> Option<usize> {
    let bytes = id.as_bytes();
    let (head, tail) = bs_rsplit_once(bytes, b'_')?;
    if !head.ends_with(b"_f") && head != b"f" {
        return None;
    }
    if tail.is_empty() || !tail.iter().all(u8::is_ascii_digit) {
        return None;
    }
    atoi::atoi::<usize>(tail)
}

/// Is this the functional root (`..._f_0`)?
#[inline]
pub fn is_root_level(id: &str) -> bool {
    level_number(id) == Some(0)
}

/// Does `haystack` contain `level` such that the match is not followed by
/// another digit? `s1_f_1` occurs in `s1_f_1` and `s1_f_1_SUBJ`, not in `s1_f_12`.
pub fn contains_level(haystack: &str, level: &str) -> bool {
    if level.is_empty() {
        return false;
    }
    let bytes = haystack.as_bytes();
    memmem::find_iter(bytes, level.as_bytes()).any(|start| {
        bytes
            .get(start + level.len())
            .is_none_or(|next| !next.is_ascii_digit())
    })
}

/// Strip `_<suffix>` from the end of an id
#[inline]
pub fn strip_attribute<'a>(id: &'a str, suffix: &str) -> Option<&'a str> {
    id.strip_suffix(suffix)?.strip_suffix('_')
}
