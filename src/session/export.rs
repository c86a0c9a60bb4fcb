use rayon::prelude::*;

use crate::assets::custom::{AssetSnapshot, CustomAssets};
use crate::assets::text::TextLayoutEngine;
use crate::compile::compiler::compile_frame;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Canvas;
use crate::foundation::error::{MoireError, MoireResult};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuBackend;
use crate::session::engine::EngineOpts;
use crate::settings::model::Settings;

/// Frames rendered in parallel before being handed to the sink.
const CHUNK_FRAMES: u64 = 32;

/// Frame times of a sequence, accumulated one step at a time exactly like a fresh engine's
/// clock; frame `i` is the `i + 1`-th tick.
///
/// Sequences with animation disabled stay at time `0`.
pub fn sequence_times(settings: &Settings, opts: &EngineOpts) -> impl Iterator<Item = f64> {
    let step = if settings.global.animation_enabled {
        opts.signed_step(settings)
    } else {
        0.0
    };
    std::iter::successors(Some(step), move |t| Some(t + step))
}

/// Time of frame `idx` in a sequence; see [`sequence_times`].
pub fn sequence_time(settings: &Settings, opts: &EngineOpts, idx: u64) -> f64 {
    let idx = usize::try_from(idx).unwrap_or(usize::MAX);
    sequence_times(settings, opts).nth(idx).unwrap_or(0.0)
}

/// Render `frames` frames into memory; see [`export_sequence`].
pub fn render_sequence(
    settings: &Settings,
    canvas: Canvas,
    opts: &EngineOpts,
    frames: u64,
    threads: Option<usize>,
) -> MoireResult<Vec<FrameRGBA>> {
    let mut out = Vec::with_capacity(usize::try_from(frames).unwrap_or(0));
    let mut collect = Collect(&mut out);
    export_sequence(settings, canvas, opts, frames, threads, &mut collect)?;
    Ok(out)
}

/// Render the same frames [`crate::session::engine::MoireEngine::run`] would produce from a
/// fresh engine, with independent frames spread over a `rayon` pool.
///
/// Custom assets are loaded to completion first. Each worker owns its backend and text engine;
/// frames reach `sink` in index order.
#[tracing::instrument(level = "info", skip(settings, opts, sink), fields(mode = settings.mode.as_str()))]
pub fn export_sequence(
    settings: &Settings,
    canvas: Canvas,
    opts: &EngineOpts,
    frames: u64,
    threads: Option<usize>,
    sink: &mut dyn FrameSink,
) -> MoireResult<()> {
    let canvas = Canvas::new(canvas.width, canvas.height)?;
    let pool = build_thread_pool(threads)?;

    let mut loader = CustomAssets::new();
    loader.sync(settings);
    loader.settle();
    let snapshot = loader.snapshot();

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        frames: Some(frames),
    })?;

    let job = SequenceJob {
        settings,
        canvas,
        opts,
        snapshot: &snapshot,
    };
    let mut clock = sequence_times(settings, opts);
    let mut start = 0;
    while start < frames {
        let end = (start + CHUNK_FRAMES).min(frames);
        let times: Vec<f64> = clock.by_ref().take((end - start) as usize).collect();
        let rendered = pool.install(|| {
            times
                .par_iter()
                .map_init(|| job.worker(), |w, &time| job.render(w, time))
                .collect::<Vec<_>>()
        });
        for (idx, frame) in (start..end).zip(rendered) {
            sink.push_frame(idx, &frame?)?;
        }
        tracing::debug!(start, end, "sequence chunk rendered");
        start = end;
    }
    sink.end()
}

#[derive(Clone, Copy)]
struct SequenceJob<'a> {
    settings: &'a Settings,
    canvas: Canvas,
    opts: &'a EngineOpts,
    snapshot: &'a AssetSnapshot,
}

struct Worker {
    text: TextLayoutEngine,
    assets: CustomAssets,
    backend: CpuBackend,
}

impl SequenceJob<'_> {
    fn worker(&self) -> Worker {
        Worker {
            text: TextLayoutEngine::new(self.opts.fonts.clone()),
            assets: CustomAssets::from_snapshot(self.snapshot),
            backend: CpuBackend::new(self.opts.backend_opts()),
        }
    }

    fn render(&self, w: &mut Worker, time: f64) -> MoireResult<FrameRGBA> {
        let plan = compile_frame(self.settings, time, self.canvas, &mut w.text, &w.assets);
        w.backend.render_plan(&plan, &mut w.text, &w.assets)
    }
}

struct Collect<'a>(&'a mut Vec<FrameRGBA>);

impl FrameSink for Collect<'_> {
    fn begin(&mut self, _cfg: SinkConfig) -> MoireResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: u64, frame: &FrameRGBA) -> MoireResult<()> {
        self.0.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> MoireResult<()> {
        Ok(())
    }
}

fn build_thread_pool(threads: Option<usize>) -> MoireResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(MoireError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("moire-render-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MoireError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/export.rs"]
mod tests;
