use crate::assets::custom::CustomAssets;
use crate::assets::text::{FontBook, TextLayoutEngine};
use crate::compile::compiler::compile_frame;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Canvas;
use crate::foundation::error::{MoireError, MoireResult};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::{CpuBackend, CpuBackendOpts};
use crate::settings::model::Settings;

/// Options controlling a [`MoireEngine`].
#[derive(Clone, Debug)]
pub struct EngineOpts {
    pub(crate) time_step: f64,
    pub(crate) base_cache: bool,
    pub(crate) fonts: FontBook,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            time_step: 0.016,
            base_cache: true,
            fonts: FontBook::from_env(),
        }
    }
}

impl EngineOpts {
    /// Time advanced per animated tick.
    pub fn with_time_step(mut self, step: f64) -> Self {
        self.time_step = step;
        self
    }

    /// Enable or disable the background and base layer cache.
    pub fn with_base_cache(mut self, enabled: bool) -> Self {
        self.base_cache = enabled;
        self
    }

    /// Font lookup used by the text modes.
    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    /// Time advanced per animated tick.
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Signed time advance for `settings`: negative when running in reverse.
    pub(crate) fn signed_step(&self, settings: &Settings) -> f64 {
        if settings.global.reverse {
            -self.time_step
        } else {
            self.time_step
        }
    }

    pub(crate) fn backend_opts(&self) -> CpuBackendOpts {
        CpuBackendOpts::default().with_base_cache(self.base_cache)
    }
}

/// Lifecycle of a [`MoireEngine`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngineState {
    /// Ticks produce nothing.
    #[default]
    Stopped,
    /// Ticks advance time and render.
    Running,
}

/// Interactive moiré renderer.
///
/// Holds the settings snapshot, elapsed time and surface size, and renders one frame per
/// [`MoireEngine::tick`]. Rendering is single-threaded; custom assets decode in the background
/// and are picked up by [`MoireEngine::poll_assets`].
pub struct MoireEngine {
    canvas: Canvas,
    settings: Settings,
    opts: EngineOpts,
    state: EngineState,
    time: f64,
    text: TextLayoutEngine,
    assets: CustomAssets,
    backend: CpuBackend,
    frame: FrameRGBA,
    dirty: bool,
}

impl std::fmt::Debug for MoireEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoireEngine")
            .field("canvas", &self.canvas)
            .field("mode", &self.settings.mode)
            .field("state", &self.state)
            .field("time", &self.time)
            .finish()
    }
}

impl MoireEngine {
    /// Stopped engine at time `0` for `canvas`.
    pub fn new(canvas: Canvas, settings: Settings, opts: EngineOpts) -> MoireResult<Self> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        let mut assets = CustomAssets::new();
        assets.sync(&settings);
        Ok(Self {
            canvas,
            text: TextLayoutEngine::new(opts.fonts.clone()),
            backend: CpuBackend::new(opts.backend_opts()),
            settings,
            opts,
            state: EngineState::Stopped,
            time: 0.0,
            assets,
            frame: FrameRGBA::default(),
            dirty: true,
        })
    }

    /// Start ticking. Starting a running engine does nothing.
    pub fn start(&mut self) {
        if self.state == EngineState::Running {
            return;
        }
        self.state = EngineState::Running;
        tracing::info!(time = self.time, "engine started");
    }

    /// Stop ticking. Stopping a stopped engine does nothing.
    pub fn stop(&mut self) {
        if self.state == EngineState::Stopped {
            return;
        }
        self.state = EngineState::Stopped;
        tracing::info!(time = self.time, "engine stopped");
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Replace the settings snapshot; effective from the next render.
    pub fn update_settings(&mut self, settings: Settings) {
        self.assets.sync(&settings);
        self.settings = settings;
        self.dirty = true;
    }

    /// Change the surface size.
    pub fn resize(&mut self, width: u32, height: u32) -> MoireResult<()> {
        let canvas = Canvas::new(width, height)?;
        if canvas != self.canvas {
            tracing::debug!(width, height, "surface resized");
            self.canvas = canvas;
            self.backend.invalidate_base();
            self.dirty = true;
        }
        Ok(())
    }

    /// Advance one frame.
    ///
    /// `None` while stopped. With animation enabled, time moves by the signed step before
    /// rendering; with animation disabled and nothing changed, the last frame is returned as is.
    pub fn tick(&mut self) -> MoireResult<Option<&FrameRGBA>> {
        if self.state == EngineState::Stopped {
            return Ok(None);
        }
        self.poll_assets();
        if self.settings.global.animation_enabled {
            self.time += self.opts.signed_step(&self.settings);
            self.dirty = true;
        }
        if self.dirty {
            self.render_current()?;
        }
        Ok(Some(&self.frame))
    }

    /// Render at the current time regardless of state.
    pub fn render(&mut self) -> MoireResult<&FrameRGBA> {
        self.render_current()?;
        Ok(&self.frame)
    }

    /// Elapsed time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Jump to `time`.
    pub fn seek(&mut self, time: f64) -> MoireResult<()> {
        if !time.is_finite() {
            return Err(MoireError::validation(format!("seek time must be finite, got {time}")));
        }
        self.time = time;
        self.dirty = true;
        Ok(())
    }

    /// The last rendered frame; empty before the first render.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Active settings snapshot.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Collect finished custom asset loads. Returns `true` when the next frame must redraw.
    pub fn poll_assets(&mut self) -> bool {
        let changed = self.assets.poll();
        self.dirty |= changed;
        changed
    }

    /// Block until every requested custom asset finished loading.
    pub fn settle_assets(&mut self) -> bool {
        let changed = self.assets.settle();
        self.dirty |= changed;
        changed
    }

    /// Start, tick `frames` times pushing every frame into `sink`, then stop.
    pub fn run(&mut self, frames: u64, sink: &mut dyn FrameSink) -> MoireResult<()> {
        sink.begin(SinkConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            frames: Some(frames),
        })?;
        self.start();
        let res = self.push_ticks(frames, sink);
        self.stop();
        res?;
        sink.end()
    }

    fn push_ticks(&mut self, frames: u64, sink: &mut dyn FrameSink) -> MoireResult<()> {
        for idx in 0..frames {
            if let Some(frame) = self.tick()? {
                sink.push_frame(idx, frame)?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), fields(time = self.time))]
    fn render_current(&mut self) -> MoireResult<()> {
        let plan = compile_frame(
            &self.settings,
            self.time,
            self.canvas,
            &mut self.text,
            &self.assets,
        );
        self.backend
            .render_into(&plan, &mut self.text, &self.assets, &mut self.frame)?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
