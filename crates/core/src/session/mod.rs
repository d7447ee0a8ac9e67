//! One recording screen's worth of state: the toggle, the elapsed-seconds
//! counter, the transcript and the waveform visualizer.

use crate::clock::Clock;
use crate::config::{AppConfig, FrameInterval, RecognitionLang};
use crate::render::SharedSurface;
use crate::speech::{RecognitionEvent, SpeechRecognizer, Transcript};
use crate::visualizer::{Visualizer, VisualizerHandle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

const LOG_TARGET: &str = "session";
const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("already recording")]
    AlreadyRecording,
    #[error("not recording")]
    NotRecording,
}

pub struct RecordingSession {
    lang: RecognitionLang,
    frame_interval: FrameInterval,
    clock: Arc<dyn Clock>,
    surface: SharedSurface,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    transcript: Arc<Mutex<Transcript>>,
    elapsed_secs: Arc<AtomicU64>,
    active: Option<ActiveRecording>,
}

/// Tasks owned by a running recording. Dropping it stops all of them.
struct ActiveRecording {
    visualizer: VisualizerHandle,
    timer: JoinHandle<()>,
    speech: Option<JoinHandle<()>>,
}

impl Drop for ActiveRecording {
    fn drop(&mut self) {
        self.visualizer.cancel();
        self.timer.abort();
        if let Some(speech) = &self.speech {
            speech.abort();
        }
    }
}

impl RecordingSession {
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>, surface: SharedSurface) -> Self {
        Self {
            lang: config.lang.clone(),
            frame_interval: config.frame_interval,
            clock,
            surface,
            recognizer: None,
            transcript: Arc::new(Mutex::new(Transcript::new())),
            elapsed_secs: Arc::new(AtomicU64::new(0)),
            active: None,
        }
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Starts recording. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyRecording);
        }

        lock(&self.transcript).clear();
        self.elapsed_secs.store(0, Ordering::Relaxed);

        let visualizer = VisualizerHandle::spawn(
            Visualizer::new(Arc::clone(&self.clock), Arc::clone(&self.surface)),
            self.frame_interval.duration(),
        );
        let timer = spawn_timer(Arc::clone(&self.elapsed_secs));
        let speech = self.recognizer.as_ref().map(|recognizer| {
            spawn_listener(
                Arc::clone(recognizer),
                self.lang.clone(),
                Arc::clone(&self.transcript),
            )
        });

        tracing::info!(
            target: LOG_TARGET,
            lang = self.lang.as_str(),
            speech = speech.is_some(),
            "recording started"
        );

        self.active = Some(ActiveRecording {
            visualizer,
            timer,
            speech,
        });
        Ok(())
    }

    /// Stops recording, halting the visualizer and clearing the surface.
    /// The elapsed time and transcript stay readable until the next start.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        let active = self.active.take().ok_or(SessionError::NotRecording)?;
        drop(active);

        tracing::info!(
            target: LOG_TARGET,
            elapsed_secs = self.elapsed_secs(),
            transcript_chars = lock(&self.transcript).finalized().chars().count(),
            "recording stopped"
        );
        Ok(())
    }

    /// Flips between recording and idle; returns whether it is now recording.
    pub fn toggle(&mut self) -> Result<bool, SessionError> {
        if self.is_recording() {
            self.stop()?;
        } else {
            self.start()?;
        }
        Ok(self.is_recording())
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs.load(Ordering::Relaxed)
    }

    /// Whether the flow may move on to the result screen. Stays true after
    /// `stop` because the elapsed time is kept until the next start.
    pub fn can_proceed(&self) -> bool {
        self.is_recording() || self.elapsed_secs() > 0
    }

    pub fn transcript(&self) -> Transcript {
        lock(&self.transcript).clone()
    }

    pub fn visualizer(&self) -> Option<&VisualizerHandle> {
        self.active.as_ref().map(|a| &a.visualizer)
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }
}

fn lock(transcript: &Mutex<Transcript>) -> MutexGuard<'_, Transcript> {
    transcript.lock().unwrap_or_else(PoisonError::into_inner)
}

fn spawn_timer(elapsed: Arc<AtomicU64>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = Duration::from_secs(1);
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            ticker.tick().await;
            elapsed.fetch_add(1, Ordering::Relaxed);
        }
    })
}

fn spawn_listener(
    recognizer: Arc<dyn SpeechRecognizer>,
    lang: RecognitionLang,
    transcript: Arc<Mutex<Transcript>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (tx, mut rx) = tokio::sync::mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let listen = recognizer.listen(lang, tx);
        let pump = async move {
            while let Some(event) = rx.recv().await {
                if let RecognitionEvent::Error(error) = &event {
                    tracing::warn!(target: LOG_TARGET, %error, "speech recognition error");
                }
                lock(&transcript).apply(&event);
            }
        };

        let (result, ()) = tokio::join!(listen, pump);
        if let Err(e) = result {
            tracing::warn!(target: LOG_TARGET, error = %e, "speech recognition ended");
        }
    })
}
