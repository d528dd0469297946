//! Key layout of the persisted state.
//!
//! | Key | Value |
//! |---|---|
//! | `polls` | JSON array of polls |
//! | `darkMode` | `"true"` / `"false"` |
//! | `hasVoted_<pollId>` | `"true"` when present |

use pollbook_types::PollId;

/// Key holding the whole poll list.
pub const POLLS: &str = "polls";

/// Key holding the theme preference.
pub const DARK_MODE: &str = "darkMode";

/// Prefix of per-poll vote records.
pub const VOTED_PREFIX: &str = "hasVoted_";

/// Key of the vote record for `id`.
pub fn voted(id: &PollId) -> String {
    format!("{VOTED_PREFIX}{id}")
}
