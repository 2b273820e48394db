//! Index selection.

use super::IndexDefinition;
use std::collections::BTreeSet;

/// Picks the declared index that best covers a set of requested fields.
///
/// An index is a candidate when every one of its fields is requested. The
/// winner is the candidate leaving the fewest requested fields uncovered;
/// ties go to the earliest-declared candidate. Returns the winner's
/// position in `indexes`, or `None` when nothing is requested or no index
/// is a candidate.
pub fn select_index<'a, I>(indexes: I, requested: &BTreeSet<&str>) -> Option<usize>
where
    I: IntoIterator<Item = &'a IndexDefinition>,
{
    if requested.is_empty() {
        return None;
    }

    let mut best: Option<(usize, usize)> = None;
    for (pos, definition) in indexes.into_iter().enumerate() {
        let fields = definition.field_set();
        if !fields.is_subset(requested) {
            continue;
        }
        let leftover = requested.len() - fields.len();
        if best.map_or(true, |(_, fewest)| leftover < fewest) {
            best = Some((pos, leftover));
        }
    }
    best.map(|(pos, _)| pos)
}
