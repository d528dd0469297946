use pollbook_types::TypeError;

/// Reasons a poll draft is refused at creation time.
///
/// The messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("A poll needs at least 2 options, got {found}.")]
    TooFewOptions { found: usize },

    #[error("Please fill in all options (option {} is empty).", .index + 1)]
    EmptyOption { index: usize },

    #[error("Options must be unique ({text:?} appears more than once).")]
    DuplicateOption { text: String },

    #[error("Invalid number of choices: {requested} (must be between 1 and {options}).")]
    InvalidChoiceCount { requested: usize, options: usize },

    /// The assembled poll failed a structural check.
    #[error(transparent)]
    Malformed(#[from] TypeError),
}

/// Reasons a vote is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    #[error("You have already voted in this poll.")]
    AlreadyVoted,

    #[error("Select at least one option.")]
    NoSelection,

    #[error("Option {index} does not exist (poll has {options} options).")]
    InvalidIndex { index: usize, options: usize },

    #[error("You can select at most {max} option(s), got {selected}.")]
    TooManySelections { selected: usize, max: usize },

    #[error("This poll cannot count any more votes.")]
    CounterOverflow,
}
