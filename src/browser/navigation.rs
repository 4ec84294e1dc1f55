//! Position lookup and wraparound stepping over the visible list.

use crate::model::BugRecord;

/// Position of the bug addressed by `(project, id)` in `list`.
///
/// Linear scan; the first match wins.
pub fn resolve_index<'a, I>(list: I, project: &str, id: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a BugRecord>,
{
    list.into_iter().position(|bug| bug.is(project, id))
}

/// Position after `index`, wrapping to the start.
#[must_use]
pub const fn next_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((index + 1) % len)
}

/// Position before `index`, wrapping to the end.
#[must_use]
pub const fn previous_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((index % len + len - 1) % len)
}
