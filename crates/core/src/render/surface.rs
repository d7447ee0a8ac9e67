use super::RenderError;
use crate::config::CanvasSize;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tiny_skia::{Color, Pixmap};

/// Drawing target that may or may not have a pixmap attached yet.
#[derive(Debug, Default)]
pub struct Surface {
    pixmap: Option<Pixmap>,
}

pub type SharedSurface = Arc<Mutex<Surface>>;

pub fn shared(surface: Surface) -> SharedSurface {
    Arc::new(Mutex::new(surface))
}

/// Locks the surface, recovering it if a drawing thread panicked mid-frame.
pub fn lock_surface(surface: &SharedSurface) -> MutexGuard<'_, Surface> {
    surface.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Surface {
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn attached(size: CanvasSize) -> Result<Self, RenderError> {
        let mut surface = Self::detached();
        surface.attach(size)?;
        Ok(surface)
    }

    /// Attaches a fresh transparent pixmap, replacing any previous one.
    pub fn attach(&mut self, size: CanvasSize) -> Result<(), RenderError> {
        let pixmap = Pixmap::new(size.width, size.height).ok_or(RenderError::Allocation {
            width: size.width,
            height: size.height,
        })?;
        self.pixmap = Some(pixmap);
        Ok(())
    }

    pub fn detach(&mut self) -> Option<Pixmap> {
        self.pixmap.take()
    }

    pub fn is_attached(&self) -> bool {
        self.pixmap.is_some()
    }

    pub fn pixmap_mut(&mut self) -> Option<&mut Pixmap> {
        self.pixmap.as_mut()
    }

    pub fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    pub fn snapshot(&self) -> Option<Pixmap> {
        self.pixmap.clone()
    }

    pub fn is_blank(&self) -> bool {
        self.pixmap
            .as_ref()
            .map_or(true, |p| p.pixels().iter().all(|px| px.alpha() == 0))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let pixmap = self.pixmap.as_ref().ok_or(RenderError::Detached)?;
        pixmap
            .save_png(path)
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::draw_frame;
    use crate::waveform::generate;

    #[test]
    fn detached_surface_has_nothing_to_draw_on() {
        let mut surface = Surface::detached();
        assert!(!surface.is_attached());
        assert!(surface.pixmap_mut().is_none());
        assert!(surface.snapshot().is_none());
        assert!(surface.is_blank());
        surface.clear();
        assert!(matches!(surface.save_png("unused.png"), Err(RenderError::Detached)));
    }

    #[test]
    fn clear_wipes_a_drawn_frame() {
        let mut surface = Surface::attached(CanvasSize::default()).expect("attach");
        let pixmap = surface.pixmap_mut().expect("attached");
        draw_frame(pixmap, &generate(1_000.0), 1_000.0);
        assert!(!surface.is_blank());
        surface.clear();
        assert!(surface.is_blank());
        assert!(surface.is_attached());
    }

    #[test]
    fn detach_hands_back_the_pixmap() {
        let size = CanvasSize::new(32, 16).expect("size");
        let mut surface = Surface::attached(size).expect("attach");
        let pixmap = surface.detach().expect("pixmap");
        assert_eq!((pixmap.width(), pixmap.height()), (32, 16));
        assert!(!surface.is_attached());
    }

    #[test]
    fn shared_surface_survives_poisoning() {
        let surface = shared(Surface::attached(CanvasSize::default()).expect("attach"));
        let clone = Arc::clone(&surface);
        let _ = std::thread::spawn(move || {
            let _guard = clone.lock().expect("first lock");
            panic!("poison");
        })
        .join();
        assert!(lock_surface(&surface).is_attached());
    }

    #[test]
    fn saves_png_to_disk() {
        let dir = std::env::temp_dir()
            .join(format!("emotion-voice-surface-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("tmp dir");
        let path = dir.join("frame.png");

        let mut surface = Surface::attached(CanvasSize::default()).expect("attach");
        if let Some(pixmap) = surface.pixmap_mut() {
            draw_frame(pixmap, &generate(0.0), 0.0);
        }
        surface.save_png(&path).expect("save");
        assert!(std::fs::metadata(&path).expect("written").len() > 0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
