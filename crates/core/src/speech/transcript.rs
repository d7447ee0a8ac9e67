use super::RecognitionEvent;
use serde::{Deserialize, Serialize};

pub const LISTENING_PLACEHOLDER: &str = "Listening...";
pub const IDLE_PLACEHOLDER: &str = "Recognized speech will appear here once recording starts.";

/// Text recognized during one recording.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    finalized: String,
    interim: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one recognizer event in. Errors leave the text untouched.
    pub fn apply(&mut self, event: &RecognitionEvent) {
        match event {
            RecognitionEvent::Final(text) => {
                if text.is_empty() {
                    return;
                }
                if !self.finalized.is_empty() {
                    self.finalized.push(' ');
                }
                self.finalized.push_str(text);
                self.interim.clear();
            }
            RecognitionEvent::Interim(text) => {
                self.interim.clone_from(text);
            }
            RecognitionEvent::Error(_) => {}
        }
    }

    pub fn clear(&mut self) {
        self.finalized.clear();
        self.interim.clear();
    }

    pub fn finalized(&self) -> &str {
        &self.finalized
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn is_empty(&self) -> bool {
        self.finalized.is_empty() && self.interim.is_empty()
    }

    /// Main line shown in the transcript panel.
    pub fn display_text(&self, recording: bool) -> &str {
        if !self.finalized.is_empty() {
            &self.finalized
        } else if !recording {
            IDLE_PLACEHOLDER
        } else if !self.interim.is_empty() {
            &self.interim
        } else {
            LISTENING_PLACEHOLDER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_(s: &str) -> RecognitionEvent {
        RecognitionEvent::Final(s.to_owned())
    }

    fn interim(s: &str) -> RecognitionEvent {
        RecognitionEvent::Interim(s.to_owned())
    }

    #[test]
    fn finals_are_joined_with_spaces() {
        let mut t = Transcript::new();
        t.apply(&final_("I have been"));
        t.apply(&final_("busy at work"));
        assert_eq!(t.finalized(), "I have been busy at work");
    }

    #[test]
    fn final_clears_interim() {
        let mut t = Transcript::new();
        t.apply(&interim("my bo"));
        t.apply(&interim("my boss"));
        assert_eq!(t.interim(), "my boss");
        t.apply(&final_("my boss asked me"));
        assert_eq!(t.interim(), "");
        assert_eq!(t.finalized(), "my boss asked me");
    }

    #[test]
    fn errors_do_not_touch_text() {
        let mut t = Transcript::new();
        t.apply(&final_("hello"));
        t.apply(&RecognitionEvent::Error("network".to_owned()));
        assert_eq!(t.finalized(), "hello");
    }

    #[test]
    fn display_prefers_finalized_then_interim_then_placeholder() {
        let mut t = Transcript::new();
        assert_eq!(t.display_text(false), IDLE_PLACEHOLDER);
        assert_eq!(t.display_text(true), LISTENING_PLACEHOLDER);
        t.apply(&interim("so"));
        assert_eq!(t.display_text(true), "so");
        t.apply(&final_("so tired"));
        assert_eq!(t.display_text(true), "so tired");
        assert_eq!(t.display_text(false), "so tired");
    }

    #[test]
    fn clear_resets_everything() {
        let mut t = Transcript::new();
        t.apply(&final_("a"));
        t.apply(&interim("b"));
        t.clear();
        assert!(t.is_empty());
    }
}
