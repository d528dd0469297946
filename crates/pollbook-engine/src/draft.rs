/// User input for a new poll, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PollDraft {
    pub question: String,
    /// Raw option texts, untrimmed.
    pub options: Vec<String>,
    pub multiple_choice: bool,
    /// Only consulted when `multiple_choice` is set.
    pub max_choices: usize,
}

impl PollDraft {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            options: Vec::new(),
            multiple_choice: false,
            max_choices: 1,
        }
    }

    pub fn with_option(mut self, text: impl Into<String>) -> Self {
        self.options.push(text.into());
        self
    }

    pub fn with_options<I, T>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.options.extend(texts.into_iter().map(Into::into));
        self
    }

    /// Allow up to `max_choices` options per vote.
    pub fn allow_multiple(mut self, max_choices: usize) -> Self {
        self.multiple_choice = true;
        self.max_choices = max_choices;
        self
    }
}
