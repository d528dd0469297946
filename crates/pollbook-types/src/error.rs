use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid poll id: {0:?}")]
    InvalidId(String),

    #[error("poll {id} needs at least 2 options, found {found}")]
    TooFewOptions { id: String, found: usize },

    #[error("poll {id} has an empty option at index {index}")]
    EmptyOption { id: String, index: usize },

    #[error("poll {id} has duplicate option {text:?}")]
    DuplicateOption { id: String, text: String },

    #[error("poll {id} allows {max} choices but has {options} options")]
    InvalidChoiceCount { id: String, max: usize, options: usize },

    #[error("poll {id} has no option at index {index} ({options} options)")]
    OptionIndex { id: String, index: usize, options: usize },

    #[error("poll {id} vote total does not fit in a 64-bit counter")]
    VoteOverflow { id: String },
}
