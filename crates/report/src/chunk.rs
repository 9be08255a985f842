//! Splitting an assembled report into transport-sized payloads.

use tracing::warn;

use crate::assemble::GROUP_SEPARATOR;

/// Split `text` into payloads of at most `max_len` characters.
///
/// Text that fits is returned whole. Otherwise it is split on
/// [`GROUP_SEPARATOR`], one payload per group section, and never inside a
/// section. A section longer than `max_len` is kept intact and logged.
pub fn split_for_delivery(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    text.split(GROUP_SEPARATOR)
        .filter(|section| !section.trim().is_empty())
        .enumerate()
        .map(|(index, section)| {
            let len = section.chars().count();
            if len > max_len {
                warn!(section = index, len, max_len, "Group section exceeds transport limit");
            }
            section.to_string()
        })
        .collect()
}
