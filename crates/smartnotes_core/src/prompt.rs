//! User prompt capability injected into the note board.
//!
//! # Responsibility
//! - Ask yes/no confirmations before destructive actions.
//! - Surface rejection messages to the user.
//!
//! # Invariants
//! - Both calls are synchronous; the board waits for `confirm` to return.

/// Confirmation and notification surface owned by the renderer.
pub trait Prompt {
    /// Asks the user to confirm `message`; `true` means confirmed.
    fn confirm(&mut self, message: &str) -> bool;
    /// Shows `message` to the user; no answer expected.
    fn notify(&mut self, message: &str);
}

/// Prompt that answers every confirmation the same way and drops notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPrompt {
    answer: bool,
}

impl FixedPrompt {
    pub fn accept_all() -> Self {
        Self { answer: true }
    }

    pub fn decline_all() -> Self {
        Self { answer: false }
    }
}

impl Prompt for FixedPrompt {
    fn confirm(&mut self, _message: &str) -> bool {
        self.answer
    }

    fn notify(&mut self, _message: &str) {}
}

/// Prompt that records every question and notice it receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingPrompt {
    answer: bool,
    pub confirmations: Vec<String>,
    pub notifications: Vec<String>,
}

impl RecordingPrompt {
    /// Creates a recorder that answers confirmations with `answer`.
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    /// Changes the answer given to later confirmations.
    pub fn set_answer(&mut self, answer: bool) {
        self.answer = answer;
    }
}

impl Prompt for RecordingPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.answer
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedPrompt, Prompt, RecordingPrompt};

    #[test]
    fn recording_prompt_keeps_messages_in_order() {
        let mut prompt = RecordingPrompt::answering(false);
        assert!(!prompt.confirm("first?"));
        prompt.notify("done");
        prompt.set_answer(true);
        assert!(prompt.confirm("second?"));

        assert_eq!(prompt.confirmations, vec!["first?", "second?"]);
        assert_eq!(prompt.notifications, vec!["done"]);
    }

    #[test]
    fn fixed_prompt_answers_consistently() {
        assert!(FixedPrompt::accept_all().confirm("x"));
        assert!(!FixedPrompt::decline_all().confirm("x"));
    }
}
