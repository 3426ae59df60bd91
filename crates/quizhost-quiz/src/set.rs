//! The editable question batch.

use quizhost_protocol::QuestionPayload;
use tracing::{debug, info};

use crate::paste::parse_paste;
use crate::question::{FieldEdit, OPTION_COUNT, Question};
use crate::{QuizConfig, QuizError};

/// An ordered, fixed-length batch of questions under edit.
///
/// The length always equals the configured count: changing the count
/// throws the old batch away and starts over with blanks. That is a reset,
/// not a resize, so nothing typed so far survives it.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    config: QuizConfig,
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Creates a blank batch of `config.default_question_count` questions.
    pub fn new(config: QuizConfig) -> Self {
        let config = config.validated();
        let questions = blank_batch(
            config.default_question_count,
            config.default_time_limit_secs,
        );
        Self { config, questions }
    }

    /// Regenerates the batch as `count` blank questions.
    ///
    /// Runs even when `count` equals the current length; every call is a
    /// full reset.
    ///
    /// # Errors
    /// [`QuizError::InvalidQuestionCount`] if `count` is 0,
    /// [`QuizError::TooManyQuestions`] above the configured maximum. The
    /// batch is left untouched.
    pub fn set_question_count(&mut self, count: usize) -> Result<(), QuizError> {
        if count == 0 {
            return Err(QuizError::InvalidQuestionCount);
        }
        let max = self.config.max_question_count;
        if count > max {
            return Err(QuizError::TooManyQuestions { count, max });
        }
        self.questions = blank_batch(count, self.config.default_time_limit_secs);
        info!(count, "question batch regenerated");
        Ok(())
    }

    /// Applies a single-field edit to the question at `index` (0-based).
    pub fn edit_field(&mut self, index: usize, edit: FieldEdit) -> Result<(), QuizError> {
        self.slot_mut(index)?.apply(edit);
        Ok(())
    }

    /// Replaces one option of the question at `index`.
    pub fn edit_option(
        &mut self,
        index: usize,
        option: usize,
        value: impl Into<String>,
    ) -> Result<(), QuizError> {
        if option >= OPTION_COUNT {
            return Err(QuizError::NoSuchOption(option));
        }
        self.slot_mut(index)?.options[option] = value.into();
        Ok(())
    }

    /// Replaces the question at `index` with one parsed from `raw`.
    ///
    /// The slot keeps its time limit; everything else is overwritten.
    pub fn apply_bulk_paste(&mut self, index: usize, raw: &str) -> Result<(), QuizError> {
        let time_limit = self.slot_mut(index)?.time_limit;
        let question = parse_paste(raw, time_limit)?;
        debug!(index, prompt = %question.text, "bulk paste applied");
        self.questions[index] = question;
        Ok(())
    }

    /// Validates every question and returns the batch in wire form.
    ///
    /// Stops at the first invalid question; the error names its 1-based
    /// position. Takes `&self`: a failed validation leaves no trace on the
    /// batch, and a successful one does not consume it either.
    pub fn validate(&self) -> Result<Vec<QuestionPayload>, QuizError> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| q.to_payload(i + 1, self.config.default_time_limit_secs))
            .collect()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`: a batch holds at least one question.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn default_time_limit(&self) -> u32 {
        self.config.default_time_limit_secs
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Question, QuizError> {
        self.questions
            .get_mut(index)
            .ok_or(QuizError::NoSuchQuestion(index))
    }
}

impl Default for QuestionSet {
    fn default() -> Self {
        Self::new(QuizConfig::default())
    }
}

fn blank_batch(count: usize, time_limit: u32) -> Vec<Question> {
    (0..count).map(|_| Question::blank(time_limit)).collect()
}
