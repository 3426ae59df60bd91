//! Error types for the question set builder.

/// Errors from editing or validating a question batch.
///
/// Every variant is a local validation failure: the batch is left exactly
/// as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    /// A batch must hold at least one question.
    #[error("question count must be at least 1")]
    InvalidQuestionCount,

    /// Requested more questions than `QuizConfig::max_question_count`.
    #[error("question count {count} exceeds the maximum of {max}")]
    TooManyQuestions { count: usize, max: usize },

    /// Edit addressed a slot past the end of the batch (0-based index).
    #[error("no question at index {0}")]
    NoSuchQuestion(usize),

    /// Edit addressed an option other than 0–3.
    #[error("no option at index {0} (questions have 4 options)")]
    NoSuchOption(usize),

    /// A pasted block had too few non-empty lines.
    #[error(
        "paste needs 6 non-empty lines (prompt, 4 options, answer), found {found}"
    )]
    PasteFormat { found: usize },

    #[error("question {position}: prompt is empty")]
    EmptyPrompt { position: usize },

    #[error("question {position}: option {option} is empty")]
    EmptyOption { position: usize, option: usize },

    #[error("question {position}: correct answer is missing")]
    MissingCorrect { position: usize },

    #[error("question {position}: correct answer {marker:?} is not a number")]
    CorrectNotInteger { position: usize, marker: String },

    #[error("question {position}: correct answer {index} is outside 0-3")]
    CorrectOutOfRange { position: usize, index: i64 },
}

impl QuizError {
    /// The 1-based question position a submission error refers to.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::EmptyPrompt { position }
            | Self::EmptyOption { position, .. }
            | Self::MissingCorrect { position }
            | Self::CorrectNotInteger { position, .. }
            | Self::CorrectOutOfRange { position, .. } => Some(*position),
            _ => None,
        }
    }
}
