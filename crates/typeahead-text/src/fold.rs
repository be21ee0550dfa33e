//! Locale-aware lowercasing and case-insensitive substring search.
//!
//! Query normalization follows the host page's locale. The only casing rule
//! that differs from plain Unicode lowercasing in practice here is Turkish,
//! where `I` lowers to dotless `ı` and `İ` lowers to plain `i` (Unicode's
//! default lowers `İ` to `i` plus a combining dot).

use std::ops::Range;

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

/// Lowercase expansion of one scalar. Three is the Unicode maximum.
type Lowered = SmallVec<[char; 3]>;

/// Casing locale for query normalization and match search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Default Unicode simple lowercasing.
    #[default]
    En,
    /// Turkish: `I` -> `ı`, `İ` -> `i`.
    Tr,
}

impl Locale {
    /// Lowercase a single scalar under this locale.
    fn lower_char(self, c: char) -> Lowered {
        if self == Locale::Tr {
            match c {
                'I' => return SmallVec::from_slice(&['ı']),
                'İ' => return SmallVec::from_slice(&['i']),
                _ => {}
            }
        }
        c.to_lowercase().collect()
    }

    /// Lowercase a whole string under this locale.
    #[must_use]
    pub fn lower(self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            out.extend(self.lower_char(c));
        }
        out
    }
}

/// Canonical form of typed input: locale lowercase, then trim.
#[must_use]
pub fn normalize_query(input: &str, locale: Locale) -> String {
    locale.lower(input).trim().to_string()
}

/// Byte range of the first locale-case-insensitive occurrence of `needle`
/// in `haystack`.
///
/// Match boundaries never split a grapheme cluster: candidate starts are
/// cluster boundaries, and a match whose end would land inside a cluster is
/// rejected. An empty needle never matches.
#[must_use]
pub fn find_fold(haystack: &str, needle: &str, locale: Locale) -> Option<Range<usize>> {
    if needle.is_empty() || haystack.is_empty() {
        return None;
    }

    let folded: Vec<char> = needle.chars().flat_map(|c| locale.lower_char(c)).collect();

    for (start, _) in haystack.grapheme_indices(true) {
        if let Some(end) = match_at(haystack, start, &folded, locale)
            && is_cluster_boundary(haystack, end)
        {
            return Some(start..end);
        }
    }
    None
}

/// Try to match the folded needle starting at byte `start`. Returns the end
/// byte offset on success. The needle must be exhausted exactly at a scalar
/// boundary of the haystack; running out mid-expansion is a mismatch.
fn match_at(haystack: &str, start: usize, folded: &[char], locale: Locale) -> Option<usize> {
    let mut ni = 0;
    let mut pos = start;
    for c in haystack[start..].chars() {
        if ni == folded.len() {
            break;
        }
        for fc in locale.lower_char(c) {
            if ni == folded.len() || fc != folded[ni] {
                return None;
            }
            ni += 1;
        }
        pos += c.len_utf8();
    }
    (ni == folded.len()).then_some(pos)
}

fn is_cluster_boundary(s: &str, offset: usize) -> bool {
    offset == s.len() || s.grapheme_indices(true).any(|(i, _)| i == offset)
}
