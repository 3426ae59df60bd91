//! A single editable question and its validation into wire form.

use quizhost_protocol::QuestionPayload;

use crate::QuizError;

/// Every question has exactly this many options.
pub const OPTION_COUNT: usize = 4;

pub(crate) const DEFAULT_TIME_LIMIT_SECS: u32 = 15;

/// One question as the host is editing it.
///
/// Nothing here is validated: `correct` is whatever the host typed, and
/// any field may be blank until [`Question::to_payload`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    /// Raw correct-answer marker, expected to be "0".."3" at submission.
    pub correct: String,
    /// Seconds allowed for the question. 0 means "use the default".
    pub time_limit: u32,
}

impl Question {
    /// An empty question with the given time limit.
    pub fn blank(time_limit: u32) -> Self {
        Self {
            text: String::new(),
            options: Default::default(),
            correct: String::new(),
            time_limit,
        }
    }

    /// Applies a single-field edit. No validation happens here.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Text(text) => self.text = text,
            FieldEdit::Correct(marker) => self.correct = marker,
            FieldEdit::TimeLimit(secs) => self.time_limit = secs,
        }
    }

    /// Validates this question and converts it to the wire form.
    ///
    /// `position` is 1-based and only used for error reporting. The
    /// correct marker is replaced with the text of the option it points
    /// at; a zero time limit becomes `default_time_limit`.
    pub fn to_payload(
        &self,
        position: usize,
        default_time_limit: u32,
    ) -> Result<QuestionPayload, QuizError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(QuizError::EmptyPrompt { position });
        }
        if let Some(blank) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuizError::EmptyOption {
                position,
                option: blank + 1,
            });
        }
        let index = CorrectIndex::parse(&self.correct, position)?;

        let options = self.options.clone().map(|o| o.trim().to_string());
        let correct = options[index.get()].clone();

        Ok(QuestionPayload {
            text: text.to_string(),
            options,
            correct,
            time_limit: if self.time_limit == 0 {
                default_time_limit
            } else {
                self.time_limit
            },
        })
    }
}

/// A single-field edit, as produced by one input control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Text(String),
    Correct(String),
    TimeLimit(u32),
}

/// A correct-answer position that is known to address one of the options.
///
/// Only [`CorrectIndex::parse`] constructs it, so indexing an options array
/// with [`get`](Self::get) cannot go out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectIndex(u8);

impl CorrectIndex {
    /// Parses a raw marker for the question at `position` (1-based).
    pub fn parse(marker: &str, position: usize) -> Result<Self, QuizError> {
        let marker = marker.trim();
        if marker.is_empty() {
            return Err(QuizError::MissingCorrect { position });
        }
        let index: i64 =
            marker.parse().map_err(|_| QuizError::CorrectNotInteger {
                position,
                marker: marker.to_string(),
            })?;
        match u8::try_from(index) {
            Ok(i) if usize::from(i) < OPTION_COUNT => Ok(Self(i)),
            _ => Err(QuizError::CorrectOutOfRange { position, index }),
        }
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}
