use crate::config::RecognitionLang;
use crate::speech::{RecognitionEvent, SpeechError, SpeechRecognizer};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::{sync::Arc, time::Duration};

const LOG_TARGET: &str = "speech::scripted";

/// Replays a fixed sequence of recognizer events, each after its own delay.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRecognizer {
    script: Arc<Vec<(Duration, RecognitionEvent)>>,
    /// When set, listening in any other language is refused.
    lang: Option<RecognitionLang>,
}

impl ScriptedRecognizer {
    pub fn new(script: Vec<(Duration, RecognitionEvent)>) -> Self {
        Self {
            script: Arc::new(script),
            lang: None,
        }
    }

    /// Restricts the script to a single recognition language.
    pub fn for_lang(mut self, lang: RecognitionLang) -> Self {
        self.lang = Some(lang);
        self
    }

    /// Short scripted utterance with interim guesses before each final.
    pub fn demo() -> Self {
        let step = Duration::from_millis(700);
        let interim = |s: &str| (step, RecognitionEvent::Interim(s.to_owned()));
        let final_ = |s: &str| (step, RecognitionEvent::Final(s.to_owned()));
        Self::new(vec![
            interim("lately"),
            interim("lately at work"),
            final_("lately at work my boss keeps asking me for things"),
            interim("and I"),
            interim("and I can't say"),
            final_("and I can't say no"),
        ])
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn listen(
        &self,
        lang: RecognitionLang,
        tx: tokio::sync::mpsc::Sender<RecognitionEvent>,
    ) -> BoxFuture<'static, Result<(), SpeechError>> {
        let script = Arc::clone(&self.script);
        let supported = self.lang.clone();
        async move {
            if supported.is_some_and(|s| s != lang) {
                return Err(SpeechError::UnsupportedLang(lang.as_str().to_owned()));
            }
            tracing::debug!(
                target: LOG_TARGET,
                lang = lang.as_str(),
                events = script.len(),
                "scripted recognizer listening"
            );
            for (delay, event) in script.iter() {
                tokio::time::sleep(*delay).await;
                tx.send(event.clone())
                    .await
                    .map_err(|_| SpeechError::ChannelClosed)?;
            }
            Ok(())
        }
        .boxed()
    }
}
