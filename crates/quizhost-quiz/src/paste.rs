//! Bulk paste: one question from a block of lines.
//!
//! ```text
//! Capital of France?     ← prompt
//! Paris                  ← option 0
//! Rome                   ← option 1
//! Berlin                 ← option 2
//! Madrid                 ← option 3
//! 0                      ← correct marker (last line, kept as typed)
//! ```

use crate::question::Question;
use crate::QuizError;

/// Parses a pasted block into a question carrying `time_limit`.
///
/// Lines are trimmed and blank lines dropped. The first line is the
/// prompt, the next four are the options and the *last* line is the
/// correct marker; anything between option 4 and the last line is ignored.
pub fn parse_paste(raw: &str, time_limit: u32) -> Result<Question, QuizError> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let [text, a, b, c, d, .., correct] = lines.as_slice() else {
        return Err(QuizError::PasteFormat { found: lines.len() });
    };

    Ok(Question {
        text: (*text).to_string(),
        options: [a, b, c, d].map(|o| (*o).to_string()),
        correct: correct.to_string(),
        time_limit,
    })
}
