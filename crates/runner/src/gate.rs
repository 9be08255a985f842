//! Revision gate: decides whether a feed revision still needs delivering.

use svitlo_core::Fingerprint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Feed matches the last delivered revision; nothing to do.
    Unchanged,
    /// New revision, or no revision was ever delivered.
    Changed,
}

pub fn evaluate(feed: &Fingerprint, marker: Option<&Fingerprint>) -> Gate {
    match marker {
        Some(last) if last == feed => Gate::Unchanged,
        _ => Gate::Changed,
    }
}
