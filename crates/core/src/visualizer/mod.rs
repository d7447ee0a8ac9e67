//! Drives the waveform: one generate → smooth → draw step per tick, on a
//! cancellable tokio loop paced by a fixed delay between draws.

use crate::clock::Clock;
use crate::render::{draw_frame, lock_surface, SharedSurface};
use crate::waveform::{generate, Smoother, SmoothedFrame};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

const LOG_TARGET: &str = "visualizer";

/// Per-session renderer state. Built fresh for every recording so the
/// smoother always starts unseeded.
pub struct Visualizer {
    smoother: Smoother,
    clock: Arc<dyn Clock>,
    surface: SharedSurface,
}

impl Visualizer {
    pub fn new(clock: Arc<dyn Clock>, surface: SharedSurface) -> Self {
        Self {
            smoother: Smoother::new(),
            clock,
            surface,
        }
    }

    /// Advances one frame and draws it if a pixmap is attached.
    pub fn tick(&mut self) -> SmoothedFrame {
        let (frame, _) = self.advance(|| true);
        frame
    }

    /// Advances one frame, drawing only if `still_active` holds once the
    /// surface lock is taken. Returns the frame and whether it was drawn.
    fn advance(&mut self, still_active: impl Fn() -> bool) -> (SmoothedFrame, bool) {
        let now = self.clock.now_ms();
        let frame = self.smoother.smooth(&generate(now));

        let mut surface = lock_surface(&self.surface);
        if !still_active() {
            return (frame, false);
        }
        match surface.pixmap_mut() {
            Some(pixmap) => {
                draw_frame(pixmap, &frame, now);
                (frame, true)
            }
            None => (frame, false),
        }
    }

    pub fn smoother(&self) -> &Smoother {
        &self.smoother
    }
}

#[derive(Default)]
struct Progress {
    ticks: AtomicU64,
    draws: AtomicU64,
    last_frame: Mutex<Option<SmoothedFrame>>,
}

/// Running visualizer loop. Dropping the handle cancels it.
pub struct VisualizerHandle {
    active: Arc<AtomicBool>,
    progress: Arc<Progress>,
    surface: SharedSurface,
    task: Option<JoinHandle<()>>,
}

impl VisualizerHandle {
    /// Spawns the loop on the current tokio runtime. The first frame is drawn
    /// right away; each later one follows `interval` after the previous.
    pub fn spawn(visualizer: Visualizer, interval: Duration) -> Self {
        let active = Arc::new(AtomicBool::new(true));
        let progress = Arc::new(Progress::default());
        let surface = Arc::clone(&visualizer.surface);

        tracing::debug!(
            target: LOG_TARGET,
            interval_ms = interval.as_millis() as u64,
            "visualizer started"
        );

        let task = tokio::spawn(run(
            visualizer,
            interval,
            Arc::clone(&active),
            Arc::clone(&progress),
        ));

        Self {
            active,
            progress,
            surface,
            task: Some(task),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn ticks(&self) -> u64 {
        self.progress.ticks.load(Ordering::Relaxed)
    }

    pub fn draws(&self) -> u64 {
        self.progress.draws.load(Ordering::Relaxed)
    }

    pub fn last_frame(&self) -> Option<SmoothedFrame> {
        *self
            .progress
            .last_frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Halts the loop and clears the surface. No frame is drawn once this
    /// returns.
    pub fn cancel(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        self.active.store(false, Ordering::Release);
        task.abort();
        lock_surface(&self.surface).clear();

        tracing::debug!(
            target: LOG_TARGET,
            ticks = self.ticks(),
            draws = self.draws(),
            "visualizer stopped"
        );
    }
}

impl Drop for VisualizerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run(
    mut visualizer: Visualizer,
    interval: Duration,
    active: Arc<AtomicBool>,
    progress: Arc<Progress>,
) {
    loop {
        let (frame, drawn) = visualizer.advance(|| active.load(Ordering::Acquire));
        if !active.load(Ordering::Acquire) {
            break;
        }

        progress.ticks.fetch_add(1, Ordering::Relaxed);
        if drawn {
            progress.draws.fetch_add(1, Ordering::Relaxed);
        }
        *progress
            .last_frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(frame);

        tokio::time::sleep(interval).await;
        if !active.load(Ordering::Acquire) {
            break;
        }
    }
}
