//! Revision label arithmetic.
//!
//! Labels encode recency as an integer suffix after a configured prefix
//! (`PM1`, `PM2`, ...). The next label is always derived by scanning the labels
//! that exist, never from stored counter state.

use std::cmp::Ordering as CmpOrdering;

use crate::model::Revision;

/// The integer suffix of `label` if it is exactly `<prefix><digits>`
pub fn label_number(label: &str, prefix: &str) -> Option<u64> {
    let digits = label.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn format_label(prefix: &str, number: u64) -> String {
    format!("{}{}", prefix, number)
}

/// Highest-numbered revision in the prefix namespace
///
/// Ties keep the first revision encountered.
pub fn highest_labeled<'a, I>(revisions: I, prefix: &str) -> Option<(u64, &'a Revision)>
where
    I: IntoIterator<Item = &'a Revision>,
{
    let mut best: Option<(u64, &'a Revision)> = None;
    for revision in revisions {
        if let Some(n) = label_number(&revision.label, prefix) {
            if best.map_or(true, |(max, _)| n > max) {
                best = Some((n, revision));
            }
        }
    }
    best
}

/// Label following the highest one in the namespace; `<prefix>1` when empty
pub fn next_label<'a, I>(revisions: I, prefix: &str) -> String
where
    I: IntoIterator<Item = &'a Revision>,
{
    let next = highest_labeled(revisions, prefix)
        .map(|(n, _)| n.saturating_add(1))
        .unwrap_or(1);
    format_label(prefix, next)
}

/// First run of ASCII digits anywhere in the label
pub fn first_embedded_integer(label: &str) -> Option<u64> {
    let start = label.find(|c: char| c.is_ascii_digit())?;
    let digits: String = label[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Natural label order: embedded integer first (`V.2` < `V.10`), then text;
/// labels without digits sort after all numbered labels
pub fn natural_cmp(a: &str, b: &str) -> CmpOrdering {
    match (first_embedded_integer(a), first_embedded_integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => a.cmp(b),
    }
}
