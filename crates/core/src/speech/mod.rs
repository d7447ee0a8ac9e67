mod scripted;
mod transcript;

use crate::config::RecognitionLang;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use scripted::ScriptedRecognizer;
pub use transcript::Transcript;

/// One callback from a continuous recognizer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Best guess for the segment currently being spoken.
    Interim(String),
    /// A segment the recognizer will not revise.
    Final(String),
    /// Diagnostic from the recognizer; recording carries on.
    Error(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SpeechError {
    #[error("unsupported recognition language: {0}")]
    UnsupportedLang(String),
    #[error("event channel closed")]
    ChannelClosed,
}

/// Continuous speech-to-text with interim results.
///
/// `listen` emits events until the returned future is dropped or the
/// receiver goes away. Recording works without a recognizer at all.
pub trait SpeechRecognizer: Send + Sync {
    fn listen(
        &self,
        lang: RecognitionLang,
        tx: tokio::sync::mpsc::Sender<RecognitionEvent>,
    ) -> BoxFuture<'static, Result<(), SpeechError>>;
}
