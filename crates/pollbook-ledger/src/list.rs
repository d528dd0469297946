use pollbook_types::{Poll, PollId};
use serde::Serialize;

use crate::error::ListError;

/// Ordered list of polls with unique ids; order is creation order.
///
/// All operations are pure list manipulation. Persisting the result is the
/// job of [`PollRepository`](crate::PollRepository).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PollList(Vec<Poll>);

impl PollList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Poll> {
        self.0.iter()
    }

    pub fn get(&self, id: &PollId) -> Option<&Poll> {
        self.0.iter().find(|poll| poll.id() == id)
    }

    pub fn contains(&self, id: &PollId) -> bool {
        self.get(id).is_some()
    }

    /// Append a poll. Fails if its id is already taken.
    pub fn add(&mut self, poll: Poll) -> Result<(), ListError> {
        if self.contains(poll.id()) {
            return Err(ListError::DuplicateId(poll.id().clone()));
        }
        self.0.push(poll);
        Ok(())
    }

    /// Remove the poll with `id`, returning it. Absent ids are a no-op.
    pub fn remove(&mut self, id: &PollId) -> Option<Poll> {
        let index = self.0.iter().position(|poll| poll.id() == id)?;
        Some(self.0.remove(index))
    }

    /// Swap in a new value for the poll with the same id, keeping its position.
    pub fn replace(&mut self, poll: Poll) -> Result<Poll, ListError> {
        let slot = self
            .0
            .iter_mut()
            .find(|existing| existing.id() == poll.id())
            .ok_or_else(|| ListError::NotFound(poll.id().clone()))?;
        Ok(std::mem::replace(slot, poll))
    }

    pub fn into_vec(self) -> Vec<Poll> {
        self.0
    }
}

impl<'a> IntoIterator for &'a PollList {
    type Item = &'a Poll;
    type IntoIter = std::slice::Iter<'a, Poll>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for PollList {
    type Item = Poll;
    type IntoIter = std::vec::IntoIter<Poll>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pollbook_types::{ChoiceMode, PollOption};

    /// Helper: a two-option single-choice poll with the given id.
    pub(crate) fn poll(id: &str) -> Poll {
        poll_with_votes(id, 0, 0)
    }

    /// Helper: like [`poll`], with stored counters for "Yes" and "No".
    pub(crate) fn poll_with_votes(id: &str, yes: u64, no: u64) -> Poll {
        Poll::from_parts(
            PollId::parse(id).unwrap(),
            format!("Question {id}?"),
            vec![PollOption::with_votes("Yes", yes), PollOption::with_votes("No", no)],
            ChoiceMode::SingleChoice,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        )
        .unwrap()
    }

    fn pid(id: &str) -> PollId {
        PollId::parse(id).unwrap()
    }

    #[test]
    fn add_keeps_insertion_order() {
        let mut list = PollList::new();
        list.add(poll("a")).unwrap();
        list.add(poll("b")).unwrap();
        list.add(poll("c")).unwrap();
        let ids: Vec<&str> = list.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut list = PollList::new();
        list.add(poll("a")).unwrap();
        let err = list.add(poll("a")).unwrap_err();
        assert_eq!(err, ListError::DuplicateId(pid("a")));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_returns_poll_and_absent_is_noop() {
        let mut list = PollList::new();
        list.add(poll("a")).unwrap();
        list.add(poll("b")).unwrap();
        assert_eq!(list.remove(&pid("a")).map(|p| p.id().clone()), Some(pid("a")));
        assert!(list.remove(&pid("a")).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn replace_keeps_position() {
        let mut list = PollList::new();
        list.add(poll("a")).unwrap();
        list.add(poll("b")).unwrap();

        let updated = poll_with_votes("a", 4, 4);
        let old = list.replace(updated).unwrap();
        assert_eq!(old.total_votes(), 0);
        assert_eq!(list.iter().next().unwrap().total_votes(), 8);
    }

    #[test]
    fn replace_missing_reports_not_found() {
        let mut list = PollList::new();
        let err = list.replace(poll("zz")).unwrap_err();
        assert_eq!(err, ListError::NotFound(pid("zz")));
    }
}
