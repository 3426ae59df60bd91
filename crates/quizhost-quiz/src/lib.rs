//! Question set builder for quizhost.
//!
//! The host edits a fixed-length batch of questions, optionally filling a
//! slot from a pasted block of text, and finally validates the whole batch
//! into the wire form the coordinating service expects.
//!
//! # Key types
//!
//! - [`QuestionSet`] — the editable batch
//! - [`Question`] — one editable entry, correct answer kept as typed
//! - [`FieldEdit`] — a single-field edit
//! - [`CorrectIndex`] — a validated answer position (always 0–3)
//! - [`QuizConfig`] — batch defaults

mod config;
mod error;
mod paste;
mod question;
mod set;

pub use config::QuizConfig;
pub use error::QuizError;
pub use paste::parse_paste;
pub use question::{CorrectIndex, FieldEdit, OPTION_COUNT, Question};
pub use set::QuestionSet;
