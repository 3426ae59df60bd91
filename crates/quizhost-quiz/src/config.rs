//! Batch defaults.

use tracing::warn;

use crate::question::DEFAULT_TIME_LIMIT_SECS;

/// Defaults applied when a batch is (re)generated.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Number of blank questions in a fresh batch. Default: 3.
    pub default_question_count: usize,
    /// Time limit given to every blank question, in seconds. Default: 15.
    pub default_time_limit_secs: u32,
    /// Largest batch `set_question_count` accepts. Default: 100.
    pub max_question_count: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            default_question_count: 3,
            default_time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            max_question_count: 100,
        }
    }
}

impl QuizConfig {
    /// Replaces zero values with the built-in defaults.
    ///
    /// Called automatically by [`QuestionSet::new`](crate::QuestionSet::new).
    pub fn validated(mut self) -> Self {
        if self.default_question_count == 0 {
            warn!("default_question_count is 0, using 1");
            self.default_question_count = 1;
        }
        if self.default_time_limit_secs == 0 {
            warn!(
                fallback = DEFAULT_TIME_LIMIT_SECS,
                "default_time_limit_secs is 0, using fallback"
            );
            self.default_time_limit_secs = DEFAULT_TIME_LIMIT_SECS;
        }
        if self.max_question_count < self.default_question_count {
            warn!(
                max = self.max_question_count,
                default = self.default_question_count,
                "max_question_count below default_question_count, raising it"
            );
            self.max_question_count = self.default_question_count;
        }
        self
    }
}
