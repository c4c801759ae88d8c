//! Publish gate.
//!
//! A draft may be published only when every field is filled in with something
//! starting with a letter or digit, no two fields repeat (ignoring case), and no
//! other published list already uses the name.

use serde::Serialize;

use crate::list::{Draft, ListId, Top5List};

/// A single reason a draft cannot be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum PublishBlocker {
    /// Field `index` (0 = name, 1..=5 = items) is empty or starts with a non-alphanumeric character.
    InvalidField { index: usize },
    /// Fields `first` and `second` are equal ignoring case.
    DuplicateFields { first: usize, second: usize },
    /// Another published list already has this name.
    NameTaken { id: ListId },
}

/// Whether a single field is acceptable.
pub fn is_valid_field(value: &str) -> bool {
    value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
}

/// Every rule the draft violates, in field order.
pub fn publish_blockers(
    draft: &Draft,
    summaries: &[Top5List],
    current_id: ListId,
) -> Vec<PublishBlocker> {
    let fields = draft.fields();
    let mut blockers: Vec<PublishBlocker> = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !is_valid_field(f))
        .map(|(index, _)| PublishBlocker::InvalidField { index })
        .collect();

    let lowered = fields.map(str::to_lowercase);
    for first in 0..lowered.len() {
        for second in first + 1..lowered.len() {
            if lowered[first] == lowered[second] {
                blockers.push(PublishBlocker::DuplicateFields { first, second });
            }
        }
    }

    let name = &lowered[0];
    blockers.extend(
        summaries
            .iter()
            .filter(|s| s.published && s.id != current_id && s.name.to_lowercase() == *name)
            .map(|s| PublishBlocker::NameTaken { id: s.id }),
    );

    blockers
}

/// Whether the draft passes every publish rule.
pub fn is_publishable(draft: &Draft, summaries: &[Top5List], current_id: ListId) -> bool {
    publish_blockers(draft, summaries, current_id).is_empty()
}
