use std::collections::HashSet;
use std::num::NonZeroUsize;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::PollId;

/// Minimum number of options a poll carries.
pub const MIN_OPTIONS: usize = 2;

/// One answer of a poll together with its vote counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    text: String,
    votes: u64,
}

impl PollOption {
    /// A fresh option with zero votes.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            votes: 0,
        }
    }

    /// An option with an explicit counter, as read back from storage.
    pub fn with_votes(text: impl Into<String>, votes: u64) -> Self {
        Self {
            text: text.into(),
            votes,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn votes(&self) -> u64 {
        self.votes
    }
}

/// How many options one vote may select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChoiceMode {
    /// Exactly one option per vote.
    SingleChoice,
    /// Between one and `max` options per vote.
    MultipleChoice { max: NonZeroUsize },
}

impl ChoiceMode {
    /// Upper bound on selected options per vote.
    pub fn max_choices(&self) -> usize {
        match self {
            Self::SingleChoice => 1,
            Self::MultipleChoice { max } => max.get(),
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::MultipleChoice { .. })
    }
}

/// A question with an ordered list of options and per-option vote counters.
///
/// The identity of a poll (`id`, `question`, option texts, `created_at`,
/// choice mode) is fixed at construction. Only the vote counters change, and
/// only through [`Poll::with_votes_added`] and [`Poll::zeroed`], both of which
/// return a new value. The total of all counters always fits in a `u64`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PollRecord", into = "PollRecord")]
pub struct Poll {
    id: PollId,
    question: String,
    options: Vec<PollOption>,
    created_at: DateTime<Utc>,
    mode: ChoiceMode,
}

impl Poll {
    /// Assemble a poll from parts, checking the structural invariants.
    ///
    /// Option texts are compared after trimming. `created_at` is truncated to
    /// millisecond precision so the persisted form is stable.
    pub fn from_parts(
        id: PollId,
        question: impl Into<String>,
        options: Vec<PollOption>,
        mode: ChoiceMode,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TypeError> {
        check_options(&id, &options, mode)?;
        Ok(Self {
            id,
            question: question.into(),
            options,
            created_at: truncate_to_millis(created_at),
            mode,
        })
    }

    pub fn id(&self) -> &PollId {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[PollOption] {
        &self.options
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `created_at` rendered the way it is persisted.
    pub fn created_at_iso(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn mode(&self) -> ChoiceMode {
        self.mode
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.mode.is_multiple()
    }

    pub fn max_choices(&self) -> usize {
        self.mode.max_choices()
    }

    /// Sum of all option counters.
    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(PollOption::votes).sum()
    }

    /// A copy with one more vote on every option named in `indices`.
    ///
    /// A repeated index counts once. Fails without touching anything if an
    /// index is out of range or the new total would overflow.
    pub fn with_votes_added(&self, indices: &[usize]) -> Result<Self, TypeError> {
        let mut picked = vec![false; self.options.len()];
        for &index in indices {
            match picked.get_mut(index) {
                Some(slot) => *slot = true,
                None => {
                    return Err(TypeError::OptionIndex {
                        id: self.id.to_string(),
                        index,
                        options: self.options.len(),
                    })
                }
            }
        }

        let added = picked.iter().filter(|&&p| p).count() as u64;
        if self.total_votes().checked_add(added).is_none() {
            return Err(TypeError::VoteOverflow {
                id: self.id.to_string(),
            });
        }

        let mut next = self.clone();
        for (option, picked) in next.options.iter_mut().zip(picked) {
            if picked {
                option.votes += 1;
            }
        }
        Ok(next)
    }

    /// A copy with every counter set to zero.
    pub fn zeroed(&self) -> Self {
        let mut next = self.clone();
        for option in &mut next.options {
            option.votes = 0;
        }
        next
    }
}

fn check_options(id: &PollId, options: &[PollOption], mode: ChoiceMode) -> Result<(), TypeError> {
    if options.len() < MIN_OPTIONS {
        return Err(TypeError::TooFewOptions {
            id: id.to_string(),
            found: options.len(),
        });
    }

    let mut seen = HashSet::with_capacity(options.len());
    for (index, option) in options.iter().enumerate() {
        let text = option.text.trim();
        if text.is_empty() {
            return Err(TypeError::EmptyOption {
                id: id.to_string(),
                index,
            });
        }
        if !seen.insert(text) {
            return Err(TypeError::DuplicateOption {
                id: id.to_string(),
                text: text.to_string(),
            });
        }
    }

    if mode.max_choices() > options.len() {
        return Err(TypeError::InvalidChoiceCount {
            id: id.to_string(),
            max: mode.max_choices(),
            options: options.len(),
        });
    }

    let total = options
        .iter()
        .try_fold(0u64, |total, option| total.checked_add(option.votes));
    if total.is_none() {
        return Err(TypeError::VoteOverflow { id: id.to_string() });
    }
    Ok(())
}

fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    let millis = at.nanosecond() / 1_000_000 * 1_000_000;
    at.with_nanosecond(millis).unwrap_or(at)
}

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

/// Flat camelCase record as it sits in the `polls` blob.
///
/// `multipleChoice` and `maxChoices` were optional in older data: a missing
/// flag means single choice, and a missing bound on a multiple-choice poll
/// means every option may be picked.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollRecord {
    id: PollId,
    question: String,
    options: Vec<PollOption>,
    #[serde(with = "iso_millis")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    multiple_choice: bool,
    #[serde(default)]
    max_choices: Option<usize>,
}

impl TryFrom<PollRecord> for Poll {
    type Error = TypeError;

    fn try_from(record: PollRecord) -> Result<Self, Self::Error> {
        let mode = if record.multiple_choice {
            let requested = record.max_choices.unwrap_or(record.options.len());
            let max = NonZeroUsize::new(requested).ok_or_else(|| TypeError::InvalidChoiceCount {
                id: record.id.to_string(),
                max: requested,
                options: record.options.len(),
            })?;
            ChoiceMode::MultipleChoice { max }
        } else {
            ChoiceMode::SingleChoice
        };
        Poll::from_parts(
            record.id,
            record.question,
            record.options,
            mode,
            record.created_at,
        )
    }
}

impl From<Poll> for PollRecord {
    fn from(poll: Poll) -> Self {
        Self {
            multiple_choice: poll.mode.is_multiple(),
            max_choices: Some(poll.mode.max_choices()),
            id: poll.id,
            question: poll.question,
            options: poll.options,
            created_at: poll.created_at,
        }
    }
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
