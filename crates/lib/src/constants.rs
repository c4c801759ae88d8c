//! Constants used throughout the library.
//!
//! Central definitions for list shape, placeholders and input limits.

/// Number of ranked items in every list.
pub const LIST_LENGTH: usize = 5;

/// Number of editable fields in a draft: the name followed by the five items.
pub const DRAFT_FIELDS: usize = LIST_LENGTH + 1;

/// Sentinel used for blank items in a freshly created list.
pub const PLACEHOLDER_ITEM: &str = "?";

/// Name prefix for newly created lists, followed by the store's list counter.
pub const UNTITLED_PREFIX: &str = "Untitled";

/// Maximum length, in characters, of comment text accepted at the input boundary.
pub const COMMENT_MAX_CHARS: usize = 250;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;
