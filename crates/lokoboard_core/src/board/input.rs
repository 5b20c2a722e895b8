//! User input seam.

use std::collections::VecDeque;

/// Source of user answers for the board's prompts.
///
/// `prompt` returns `None` when the user cancels; callers abort the whole
/// operation in that case.
pub trait InputSource {
    /// Asks for one line of text, optionally pre-filled with `default`.
    fn prompt(&mut self, label: &str, default: Option<&str>) -> Option<String>;
    /// Asks a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
    /// Shows a message that needs no answer.
    fn alert(&mut self, message: &str);
}

/// Pre-recorded answers, consumed in order.
///
/// Once the prompt queue is exhausted every further prompt is cancelled; once
/// the confirmation queue is exhausted `confirm_default` is returned.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    answers: VecDeque<Option<String>>,
    confirmations: VecDeque<bool>,
    confirm_default: bool,
    alerts: Vec<String>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one prompt answer; `None` simulates a cancelled prompt.
    pub fn answer(mut self, value: Option<&str>) -> Self {
        self.answers.push_back(value.map(str::to_string));
        self
    }

    /// Queues several non-cancelled prompt answers.
    pub fn answers<'a>(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        self.answers
            .extend(values.into_iter().map(|value| Some(value.to_string())));
        self
    }

    pub fn confirmation(mut self, value: bool) -> Self {
        self.confirmations.push_back(value);
        self
    }

    pub fn confirm_by_default(mut self, value: bool) -> Self {
        self.confirm_default = value;
        self
    }

    /// Alerts shown so far.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Prompt answers not consumed yet.
    pub fn pending_answers(&self) -> usize {
        self.answers.len()
    }
}

impl InputSource for ScriptedInput {
    fn prompt(&mut self, _label: &str, _default: Option<&str>) -> Option<String> {
        self.answers.pop_front().flatten()
    }

    fn confirm(&mut self, _message: &str) -> bool {
        self.confirmations
            .pop_front()
            .unwrap_or(self.confirm_default)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{InputSource, ScriptedInput};

    #[test]
    fn scripted_input_replays_answers_then_cancels() {
        let mut input = ScriptedInput::new().answers(["a"]).answer(None).answers(["b"]);
        assert_eq!(input.prompt("x", None).as_deref(), Some("a"));
        assert_eq!(input.prompt("x", None), None);
        assert_eq!(input.prompt("x", None).as_deref(), Some("b"));
        assert_eq!(input.prompt("x", None), None);
    }

    #[test]
    fn scripted_input_falls_back_to_default_confirmation() {
        let mut input = ScriptedInput::new().confirmation(false).confirm_by_default(true);
        assert!(!input.confirm("first"));
        assert!(input.confirm("second"));
    }
}
