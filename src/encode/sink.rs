use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{MoireError, MoireResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames that will follow, when known.
    pub frames: Option<u64>,
}

/// Consumer of rendered frames.
///
/// `push_frame` is called with strictly increasing indices, starting at `0`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> MoireResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> MoireResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> MoireResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_finished(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> MoireResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> MoireResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> MoireResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes every frame as `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing into `dir`, which is created on `begin` when missing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: 0,
        }
    }

    /// Path of frame `idx` inside `dir`.
    pub fn frame_path(dir: &Path, idx: u64) -> PathBuf {
        dir.join(format!("frame_{idx:05}.png"))
    }

    /// Frames written since the last `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> MoireResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> MoireResult<()> {
        let Some(cfg) = self.cfg else {
            return Err(MoireError::validation("push_frame called before begin"));
        };
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(MoireError::validation(format!(
                "frame {idx} is {}x{}, sink expects {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        let path = Self::frame_path(&self.dir, idx);
        write_png(&path, frame)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> MoireResult<()> {
        tracing::info!(frames = self.written, dir = %self.dir.display(), "png sequence written");
        Ok(())
    }
}

/// Encode `frame` as a straight-alpha RGBA PNG at `path`.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> MoireResult<()> {
    let rgba = frame.to_straight_rgba8();
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
