use std::sync::Arc;

use chrono::Utc;
use pollbook_engine::{cast_vote, construct_with, reset_votes, tally, PollDraft, TallyRow};
use pollbook_ledger::{PollList, PollRepository, Preferences, VoteLedger};
use pollbook_store::{FileStore, KeyValueStore};
use pollbook_types::{Poll, PollId};
use rand::Rng;
use tracing::{debug, info};

use crate::config::PollbookConfig;
use crate::error::{SdkError, SdkResult};

/// Attempts at drawing an unused id before giving up.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// High-level Pollbook API.
///
/// Every mutating call reads the current list, runs the pure engine
/// operation, and writes the outcome back in one store batch. A vote and its
/// "already voted" record are therefore persisted together or not at all.
pub struct Pollbook<S> {
    config: PollbookConfig,
    store: Arc<S>,
    repo: PollRepository<S>,
    ledger: VoteLedger<S>,
    prefs: Preferences<S>,
    selected: Option<PollId>,
}

impl Pollbook<FileStore> {
    /// Open the file-backed store named by `config`.
    pub fn open_file(config: PollbookConfig) -> SdkResult<Self> {
        let store = Arc::new(FileStore::open(&config.store_path)?);
        Ok(Self::open(store, config))
    }
}

impl<S: KeyValueStore> Pollbook<S> {
    /// Wrap an existing store.
    pub fn open(store: Arc<S>, config: PollbookConfig) -> Self {
        Self {
            repo: PollRepository::new(Arc::clone(&store)),
            ledger: VoteLedger::new(Arc::clone(&store)),
            prefs: Preferences::new(Arc::clone(&store)),
            store,
            config,
            selected: None,
        }
    }

    // ---- Polls ----

    /// Validate and store a new poll, then select it.
    pub fn create_poll(
        &mut self,
        question: &str,
        options: &[String],
        multiple_choice: bool,
        max_choices: usize,
    ) -> SdkResult<Poll> {
        let mut draft = PollDraft::new(question).with_options(options.iter().cloned());
        if multiple_choice {
            draft = draft.allow_multiple(max_choices);
        }
        self.create_from_draft(&draft)
    }

    pub fn create_from_draft(&mut self, draft: &PollDraft) -> SdkResult<Poll> {
        self.create_with_rng(draft, &mut rand::thread_rng())
    }

    /// Like [`create_from_draft`](Self::create_from_draft), drawing ids from
    /// `rng`. After [`MAX_ID_ATTEMPTS`] taken ids the insert fails with
    /// `ListError::DuplicateId`.
    pub fn create_with_rng<R: Rng + ?Sized>(
        &mut self,
        draft: &PollDraft,
        rng: &mut R,
    ) -> SdkResult<Poll> {
        let mut list = self.repo.load_all();
        let created_at = Utc::now();

        let mut poll = construct_with(draft, PollId::generate_with(rng), created_at)?;
        for _ in 1..MAX_ID_ATTEMPTS {
            if !list.contains(poll.id()) {
                break;
            }
            debug!(id = %poll.id(), "generated id already taken, drawing another");
            poll = construct_with(draft, PollId::generate_with(rng), created_at)?;
        }

        list.add(poll.clone())?;
        self.repo.save_all(&list)?;
        info!(id = %poll.id(), options = poll.option_count(), "created poll");
        self.selected = Some(poll.id().clone());
        Ok(poll)
    }

    pub fn polls(&self) -> PollList {
        self.repo.load_all()
    }

    pub fn poll(&self, id: &PollId) -> SdkResult<Poll> {
        self.repo
            .load_all()
            .get(id)
            .cloned()
            .ok_or_else(|| SdkError::PollNotFound(id.clone()))
    }

    /// Remove a poll and its vote record in one batch.
    pub fn delete_poll(&mut self, id: &PollId) -> SdkResult<Poll> {
        let mut list = self.repo.load_all();
        let removed = list
            .remove(id)
            .ok_or_else(|| SdkError::PollNotFound(id.clone()))?;

        self.store
            .apply(&[self.repo.save_op(&list)?, self.ledger.clear_op(id)])?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        info!(%id, "deleted poll");
        Ok(removed)
    }

    // ---- Selection ----

    pub fn select_poll(&mut self, id: &PollId) -> SdkResult<Poll> {
        let poll = self.poll(id)?;
        self.selected = Some(id.clone());
        Ok(poll)
    }

    /// The selected poll as currently stored, if it still exists.
    pub fn selected(&self) -> Option<Poll> {
        let id = self.selected.as_ref()?;
        self.repo.load_all().get(id).cloned()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ---- Voting ----

    pub fn has_voted(&self, id: &PollId) -> SdkResult<bool> {
        Ok(self.ledger.has_voted(id)?)
    }

    /// Cast a vote and mark the poll as voted, atomically.
    pub fn vote(&self, id: &PollId, indices: &[usize]) -> SdkResult<Poll> {
        let mut list = self.repo.load_all();
        let current = list
            .get(id)
            .ok_or_else(|| SdkError::PollNotFound(id.clone()))?;
        let has_voted = self.ledger.has_voted(id)?;
        let updated = cast_vote(current, indices, has_voted)?;

        list.replace(updated.clone())?;
        self.store
            .apply(&[self.repo.save_op(&list)?, self.ledger.mark_op(id)])?;
        info!(%id, selected = indices.len(), total = updated.total_votes(), "recorded vote");
        Ok(updated)
    }

    /// Zero a poll's counters and clear its vote record, atomically.
    pub fn reset_vote(&self, id: &PollId) -> SdkResult<Poll> {
        let mut list = self.repo.load_all();
        let current = list
            .get(id)
            .ok_or_else(|| SdkError::PollNotFound(id.clone()))?;
        let updated = reset_votes(current);

        list.replace(updated.clone())?;
        self.store
            .apply(&[self.repo.save_op(&list)?, self.ledger.clear_op(id)])?;
        info!(%id, "reset votes");
        Ok(updated)
    }

    pub fn tally(&self, id: &PollId) -> SdkResult<Vec<TallyRow>> {
        Ok(tally(&self.poll(id)?))
    }

    // ---- Preferences ----

    pub fn dark_mode(&self) -> SdkResult<bool> {
        Ok(self.prefs.dark_mode(self.config.prefer_dark)?)
    }

    pub fn set_dark_mode(&self, enabled: bool) -> SdkResult<()> {
        Ok(self.prefs.set_dark_mode(enabled)?)
    }

    pub fn toggle_dark_mode(&self) -> SdkResult<bool> {
        Ok(self.prefs.toggle_dark_mode(self.config.prefer_dark)?)
    }

    // ---- Accessors ----

    pub fn config(&self) -> &PollbookConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollbook_engine::{ValidationError, VoteError};
    use pollbook_ledger::{LedgerError, ListError};
    use pollbook_store::{InMemoryStore, StoreError, StoreOp, StoreResult};

    fn book() -> Pollbook<InMemoryStore> {
        Pollbook::open(Arc::new(InMemoryStore::new()), PollbookConfig::default())
    }

    fn opts(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn votes(poll: &Poll) -> Vec<u64> {
        poll.options().iter().map(|o| o.votes()).collect()
    }

    // ---- Creation ----

    #[test]
    fn create_stores_single_choice_poll() {
        let mut book = book();
        let poll = book
            .create_poll("Color?", &opts(&["Red", "Blue"]), false, 5)
            .unwrap();
        assert_eq!(poll.max_choices(), 1);
        assert_eq!(votes(&poll), vec![0, 0]);
        assert_eq!(book.polls().len(), 1);
        assert_eq!(book.selected().unwrap().id(), poll.id());
    }

    #[test]
    fn create_rejects_duplicate_options_and_stores_nothing() {
        let mut book = book();
        let err = book
            .create_poll("Q", &opts(&["A", "A"]), false, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::Validation(ValidationError::DuplicateOption { .. })
        ));
        assert!(book.polls().is_empty());
    }

    #[test]
    fn polls_keep_creation_order() {
        let mut book = book();
        let a = book.create_poll("A?", &opts(&["x", "y"]), false, 1).unwrap();
        let b = book.create_poll("B?", &opts(&["x", "y"]), false, 1).unwrap();
        let ids: Vec<PollId> = book.polls().iter().map(|p| p.id().clone()).collect();
        assert_eq!(ids, vec![a.id().clone(), b.id().clone()]);
    }

    // ---- Id collisions ----

    fn seeded() -> rand::rngs::StdRng {
        use rand::SeedableRng;
        rand::rngs::StdRng::seed_from_u64(7)
    }

    #[test]
    fn colliding_id_is_redrawn() {
        let mut book = book();
        let draft = PollDraft::new("Q").with_options(["A", "B"]);

        let mut expected = seeded();
        let first_draw = PollId::generate_with(&mut expected);
        let second_draw = PollId::generate_with(&mut expected);

        let first = book.create_with_rng(&draft, &mut seeded()).unwrap();
        assert_eq!(first.id(), &first_draw);

        let second = book.create_with_rng(&draft, &mut seeded()).unwrap();
        assert_eq!(second.id(), &second_draw);
        assert_eq!(book.polls().len(), 2);
    }

    #[test]
    fn exhausted_id_attempts_report_duplicate() {
        let mut book = book();
        let draft = PollDraft::new("Q").with_options(["A", "B"]);
        for _ in 0..MAX_ID_ATTEMPTS {
            book.create_with_rng(&draft, &mut seeded()).unwrap();
        }

        let err = book.create_with_rng(&draft, &mut seeded()).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Ledger(LedgerError::List(ListError::DuplicateId(_)))
        ));
        assert_eq!(book.polls().len(), MAX_ID_ATTEMPTS);
    }

    // ---- Voting ----

    #[test]
    fn vote_counts_and_marks_in_one_step() {
        let mut book = book();
        let poll = book.create_poll("Color?", &opts(&["Red", "Blue"]), false, 1).unwrap();

        let voted = book.vote(poll.id(), &[0]).unwrap();
        assert_eq!(votes(&voted), vec![1, 0]);
        assert!(book.has_voted(poll.id()).unwrap());

        let rows = book.tally(poll.id()).unwrap();
        assert_eq!(rows[0].percent, 100.0);
        assert_eq!(rows[1].percent, 0.0);
    }

    #[test]
    fn second_vote_is_rejected_and_counts_unchanged() {
        let mut book = book();
        let poll = book.create_poll("Color?", &opts(&["Red", "Blue"]), false, 1).unwrap();
        book.vote(poll.id(), &[0]).unwrap();

        let err = book.vote(poll.id(), &[1]).unwrap_err();
        assert!(matches!(err, SdkError::Vote(VoteError::AlreadyVoted)));
        assert_eq!(votes(&book.poll(poll.id()).unwrap()), vec![1, 0]);
    }

    #[test]
    fn multiple_choice_flow() {
        let mut book = book();
        let poll = book
            .create_poll("Pick", &opts(&["A", "B", "C"]), true, 2)
            .unwrap();
        let voted = book.vote(poll.id(), &[0, 1]).unwrap();
        assert_eq!(votes(&voted), vec![1, 1, 0]);

        book.reset_vote(poll.id()).unwrap();
        let err = book.vote(poll.id(), &[0, 1, 2]).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Vote(VoteError::TooManySelections { selected: 3, max: 2 })
        ));
        assert!(!book.has_voted(poll.id()).unwrap());
    }

    #[test]
    fn reset_allows_voting_again() {
        let mut book = book();
        let poll = book.create_poll("Q", &opts(&["A", "B"]), false, 1).unwrap();
        book.vote(poll.id(), &[1]).unwrap();

        let reset = book.reset_vote(poll.id()).unwrap();
        assert_eq!(votes(&reset), vec![0, 0]);
        assert!(!book.has_voted(poll.id()).unwrap());
        assert!(book.tally(poll.id()).unwrap().iter().all(|r| r.percent == 0.0));

        book.vote(poll.id(), &[0]).unwrap();
        assert_eq!(votes(&book.poll(poll.id()).unwrap()), vec![1, 0]);
    }

    #[test]
    fn vote_on_unknown_poll() {
        let book = book();
        let id = PollId::parse("missing").unwrap();
        assert!(matches!(
            book.vote(&id, &[0]).unwrap_err(),
            SdkError::PollNotFound(_)
        ));
    }

    // ---- Deletion and selection ----

    #[test]
    fn delete_removes_poll_record_and_selection() {
        let mut book = book();
        let poll = book.create_poll("Q", &opts(&["A", "B"]), false, 1).unwrap();
        book.vote(poll.id(), &[0]).unwrap();
        book.select_poll(poll.id()).unwrap();

        book.delete_poll(poll.id()).unwrap();
        assert!(book.polls().is_empty());
        assert!(!book.has_voted(poll.id()).unwrap());
        assert!(book.selected().is_none());
        assert!(!book.store().contains(&format!("hasVoted_{}", poll.id())).unwrap());
    }

    #[test]
    fn delete_keeps_unrelated_selection() {
        let mut book = book();
        let a = book.create_poll("A?", &opts(&["x", "y"]), false, 1).unwrap();
        let b = book.create_poll("B?", &opts(&["x", "y"]), false, 1).unwrap();
        book.select_poll(a.id()).unwrap();
        book.delete_poll(b.id()).unwrap();
        assert_eq!(book.selected().unwrap().id(), a.id());
    }

    #[test]
    fn delete_unknown_poll_is_not_found() {
        let mut book = book();
        let id = PollId::parse("ghost").unwrap();
        assert!(matches!(
            book.delete_poll(&id).unwrap_err(),
            SdkError::PollNotFound(_)
        ));
    }

    #[test]
    fn select_unknown_poll_keeps_previous_selection() {
        let mut book = book();
        let poll = book.create_poll("Q", &opts(&["A", "B"]), false, 1).unwrap();
        let ghost = PollId::parse("ghost").unwrap();
        assert!(book.select_poll(&ghost).is_err());
        assert_eq!(book.selected().unwrap().id(), poll.id());
        book.clear_selection();
        assert!(book.selected().is_none());
    }

    // ---- Preferences ----

    #[test]
    fn dark_mode_defaults_from_config_then_persists() {
        let config = PollbookConfig {
            prefer_dark: true,
            ..PollbookConfig::default()
        };
        let book = Pollbook::open(Arc::new(InMemoryStore::new()), config);
        assert!(book.dark_mode().unwrap());
        assert!(!book.toggle_dark_mode().unwrap());
        assert!(!book.dark_mode().unwrap());
        book.set_dark_mode(true).unwrap();
        assert_eq!(
            book.store().get("darkMode").unwrap().as_deref(),
            Some("true")
        );
    }

    // ---- Atomicity ----

    /// Store whose batches always fail, leaving state untouched.
    struct FailingBatches(InMemoryStore);

    impl KeyValueStore for FailingBatches {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            self.0.set(key, value)
        }
        fn remove(&self, key: &str) -> StoreResult<bool> {
            self.0.remove(key)
        }
        fn apply(&self, _ops: &[StoreOp]) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn failed_batch_leaves_neither_count_nor_record() {
        let store = Arc::new(FailingBatches(InMemoryStore::new()));
        let mut book = Pollbook::open(Arc::clone(&store), PollbookConfig::default());
        let poll = book.create_poll("Q", &opts(&["A", "B"]), false, 1).unwrap();

        assert!(matches!(
            book.vote(poll.id(), &[0]).unwrap_err(),
            SdkError::Store(_)
        ));
        assert_eq!(book.poll(poll.id()).unwrap().total_votes(), 0);
        assert!(!book.has_voted(poll.id()).unwrap());
    }

    // ---- File-backed ----

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = PollbookConfig::default().with_store_path(dir.path().join("state.json"));

        let mut book = Pollbook::open_file(config.clone()).unwrap();
        let poll = book.create_poll("Q", &opts(&["A", "B"]), false, 1).unwrap();
        book.vote(poll.id(), &[1]).unwrap();
        drop(book);

        let reopened = Pollbook::open_file(config).unwrap();
        assert_eq!(votes(&reopened.poll(poll.id()).unwrap()), vec![0, 1]);
        assert!(reopened.has_voted(poll.id()).unwrap());
        assert!(reopened.selected().is_none());
    }

    #[test]
    fn persisted_layout_matches_key_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut book =
            Pollbook::open_file(PollbookConfig::default().with_store_path(&path)).unwrap();
        let poll = book.create_poll("Q", &opts(&["A", "B"]), false, 1).unwrap();
        book.vote(poll.id(), &[0]).unwrap();
        book.set_dark_mode(false).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let on_disk: std::collections::HashMap<String, String> =
            serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk[&format!("hasVoted_{}", poll.id())], "true");
        assert_eq!(on_disk["darkMode"], "false");
        let polls: serde_json::Value = serde_json::from_str(&on_disk["polls"]).unwrap();
        assert_eq!(polls[0]["options"][0]["votes"], 1);
        assert_eq!(polls[0]["multipleChoice"], false);
        assert_eq!(polls[0]["maxChoices"], 1);
    }
}
