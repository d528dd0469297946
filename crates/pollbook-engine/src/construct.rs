use std::collections::HashSet;
use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use pollbook_types::poll::MIN_OPTIONS;
use pollbook_types::{ChoiceMode, Poll, PollId, PollOption};

use crate::draft::PollDraft;
use crate::error::ValidationError;

/// Build a new poll from a draft with a fresh id and the current time.
///
/// Options are trimmed; every counter starts at zero. For single-choice
/// drafts `max_choices` is ignored and the poll allows exactly one option.
pub fn construct(draft: &PollDraft) -> Result<Poll, ValidationError> {
    construct_with(draft, PollId::generate(), Utc::now())
}

/// Like [`construct`], with the id and creation time supplied by the caller.
pub fn construct_with(
    draft: &PollDraft,
    id: PollId,
    created_at: DateTime<Utc>,
) -> Result<Poll, ValidationError> {
    if draft.question.trim().is_empty() {
        return Err(ValidationError::EmptyQuestion);
    }
    let options = trimmed_options(&draft.options)?;
    let mode = choice_mode(draft, options.len())?;

    let options = options.into_iter().map(PollOption::new).collect();
    let poll = Poll::from_parts(id, draft.question.clone(), options, mode, created_at)?;
    Ok(poll)
}

fn trimmed_options(raw: &[String]) -> Result<Vec<String>, ValidationError> {
    if raw.len() < MIN_OPTIONS {
        return Err(ValidationError::TooFewOptions { found: raw.len() });
    }

    let trimmed: Vec<String> = raw.iter().map(|text| text.trim().to_string()).collect();
    if let Some(index) = trimmed.iter().position(String::is_empty) {
        return Err(ValidationError::EmptyOption { index });
    }

    let mut seen = HashSet::with_capacity(trimmed.len());
    for text in &trimmed {
        if !seen.insert(text.as_str()) {
            return Err(ValidationError::DuplicateOption { text: text.clone() });
        }
    }
    Ok(trimmed)
}

fn choice_mode(draft: &PollDraft, option_count: usize) -> Result<ChoiceMode, ValidationError> {
    if !draft.multiple_choice {
        return Ok(ChoiceMode::SingleChoice);
    }
    match NonZeroUsize::new(draft.max_choices) {
        Some(max) if max.get() <= option_count => Ok(ChoiceMode::MultipleChoice { max }),
        _ => Err(ValidationError::InvalidChoiceCount {
            requested: draft.max_choices,
            options: option_count,
        }),
    }
}
