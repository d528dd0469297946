use pollbook_types::{Poll, TypeError};

use crate::error::VoteError;

/// A de-duplicated, ascending set of option indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection(Vec<usize>);

impl Selection {
    /// Sort and de-duplicate raw indices.
    pub fn normalize(indices: &[usize]) -> Self {
        let mut indices = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Record one vote on `poll`, returning the updated poll.
///
/// Indices are de-duplicated first, so each selected option advances by
/// exactly one. The input poll is never touched: on error nothing changed,
/// on success every selected counter changed together.
pub fn cast_vote(poll: &Poll, selected: &[usize], has_voted: bool) -> Result<Poll, VoteError> {
    if has_voted {
        return Err(VoteError::AlreadyVoted);
    }
    let selection = Selection::normalize(selected);
    check_selection(poll, &selection)?;

    poll.with_votes_added(selection.indices())
        .map_err(|err| match err {
            TypeError::OptionIndex { index, options, .. } => VoteError::InvalidIndex { index, options },
            _ => VoteError::CounterOverflow,
        })
}

fn check_selection(poll: &Poll, selection: &Selection) -> Result<(), VoteError> {
    if selection.is_empty() {
        return Err(VoteError::NoSelection);
    }
    let options = poll.option_count();
    if let Some(&index) = selection.indices().iter().find(|&&i| i >= options) {
        return Err(VoteError::InvalidIndex { index, options });
    }
    let max = poll.max_choices();
    if selection.len() > max {
        return Err(VoteError::TooManySelections {
            selected: selection.len(),
            max,
        });
    }
    Ok(())
}

/// Zero every counter of `poll`.
///
/// Clearing the caller's vote record is the caller's job.
pub fn reset_votes(poll: &Poll) -> Poll {
    poll.zeroed()
}
