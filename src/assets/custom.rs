//! Custom image slots of the overlay-pattern mode.
//!
//! Each layer has one slot. A slot loads on a background thread and is polled by the frame
//! driver; until it turns ready the `custom` pattern draws nothing.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::assets::decode::{PreparedImage, decode_image, looks_like_svg, parse_svg};
use crate::assets::svg_raster::{rasterize_svg_to_premul_rgba8, svg_raster_params};
use crate::draw::patterns::CustomImage;
use crate::foundation::error::{MoireError, MoireResult};
use crate::settings::model::{Mode, Pattern, Settings};

/// Shorter raster side vector sources are rendered at.
const SVG_RASTER_TARGET: f64 = 1024.0;

/// Which layer a custom asset belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// `custom1`, the base layer.
    Base,
    /// `custom2`, the reveal layer.
    Reveal,
}

impl SlotId {
    /// Both slots, base first.
    pub const ALL: [SlotId; 2] = [SlotId::Base, SlotId::Reveal];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Base => 0,
            Self::Reveal => 1,
        }
    }
}

/// A decoded custom image.
#[derive(Clone, Debug)]
pub struct LoadedAsset {
    /// Intrinsic width; placement keeps this aspect ratio.
    pub width: f64,
    /// Intrinsic height.
    pub height: f64,
    /// Pixels. Vector sources are rasterized above their intrinsic size.
    pub pixels: PreparedImage,
}

/// Load state of one slot.
#[derive(Debug, Default)]
pub enum AssetSlot {
    /// No custom source requested.
    #[default]
    Empty,
    /// Decoding on a background thread.
    Loading {
        /// Requested source.
        source: String,
        /// Completion channel.
        rx: Receiver<MoireResult<LoadedAsset>>,
    },
    /// Decoded and drawable.
    Ready {
        /// Source the asset was loaded from.
        source: String,
        /// Decoded asset.
        asset: Arc<LoadedAsset>,
        /// Monotonic id, distinct for every asset that turned ready.
        generation: u64,
    },
    /// Loading failed; retried only when the source changes.
    Failed {
        /// Source that failed.
        source: String,
    },
}

impl AssetSlot {
    fn source(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Loading { source, .. }
            | Self::Ready { source, .. }
            | Self::Failed { source } => Some(source),
        }
    }

    /// `true` once the asset can be drawn.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// The two custom asset slots.
#[derive(Debug, Default)]
pub struct CustomAssets {
    slots: [AssetSlot; 2],
    generations: u64,
}

impl CustomAssets {
    /// Both slots empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the sources `settings` asks for, starting loads for changed sources and emptying
    /// slots no longer in use.
    pub fn sync(&mut self, settings: &Settings) {
        for id in SlotId::ALL {
            let wanted = wanted_source(settings, id);
            let slot = &mut self.slots[id.index()];
            if slot.source() == wanted {
                continue;
            }
            *slot = match wanted {
                None => AssetSlot::Empty,
                Some(source) => spawn_load(id, source.to_owned()),
            };
        }
    }

    /// Collect finished loads without blocking. Returns `true` when a slot changed state.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for id in SlotId::ALL {
            let AssetSlot::Loading { rx, .. } = &self.slots[id.index()] else {
                continue;
            };
            let outcome = match rx.try_recv() {
                Ok(res) => res,
                Err(TryRecvError::Empty) => continue,
                Err(TryRecvError::Disconnected) => {
                    Err(MoireError::asset("asset loader exited without a result"))
                }
            };
            self.finish(id, outcome);
            changed = true;
        }
        changed
    }

    /// Block until no slot is loading. Returns `true` when a slot changed state.
    pub fn settle(&mut self) -> bool {
        let mut changed = false;
        for id in SlotId::ALL {
            let AssetSlot::Loading { rx, .. } = &self.slots[id.index()] else {
                continue;
            };
            let outcome = rx
                .recv()
                .unwrap_or_else(|_| Err(MoireError::asset("asset loader exited without a result")));
            self.finish(id, outcome);
            changed = true;
        }
        changed
    }

    fn finish(&mut self, id: SlotId, outcome: MoireResult<LoadedAsset>) {
        let slot = &mut self.slots[id.index()];
        let source = slot.source().unwrap_or_default().to_owned();
        *slot = match outcome {
            Ok(asset) => {
                self.generations += 1;
                tracing::debug!(slot = ?id, w = asset.width, h = asset.height, "custom asset ready");
                AssetSlot::Ready {
                    source,
                    asset: Arc::new(asset),
                    generation: self.generations,
                }
            }
            Err(err) => {
                tracing::warn!(slot = ?id, error = %err, "custom asset failed to load");
                AssetSlot::Failed { source }
            }
        };
    }

    /// Current state of `id`.
    pub fn slot(&self, id: SlotId) -> &AssetSlot {
        &self.slots[id.index()]
    }

    /// The decoded asset of `id`, when ready.
    pub fn ready(&self, id: SlotId) -> Option<&Arc<LoadedAsset>> {
        match &self.slots[id.index()] {
            AssetSlot::Ready { asset, .. } => Some(asset),
            _ => None,
        }
    }

    /// Generation of the ready asset in `id`, `0` when not ready.
    pub fn generation(&self, id: SlotId) -> u64 {
        match &self.slots[id.index()] {
            AssetSlot::Ready { generation, .. } => *generation,
            _ => 0,
        }
    }

    /// Placement size of the ready asset in `id`.
    pub fn custom_image(&self, id: SlotId) -> Option<CustomImage> {
        self.ready(id).map(|a| CustomImage {
            slot: id,
            width: a.width,
            height: a.height,
        })
    }
}

/// Ready assets detached from their loaders, shareable across render threads.
#[derive(Clone, Debug, Default)]
pub struct AssetSnapshot {
    slots: [Option<(String, Arc<LoadedAsset>, u64)>; 2],
}

impl CustomAssets {
    /// Copy out the ready slots. Loading and failed slots are left out.
    pub fn snapshot(&self) -> AssetSnapshot {
        let mut out = AssetSnapshot::default();
        for id in SlotId::ALL {
            if let AssetSlot::Ready {
                source,
                asset,
                generation,
            } = &self.slots[id.index()]
            {
                out.slots[id.index()] = Some((source.clone(), Arc::clone(asset), *generation));
            }
        }
        out
    }

    /// Slots holding exactly the assets of `snapshot`, with their generations.
    pub fn from_snapshot(snapshot: &AssetSnapshot) -> Self {
        let mut assets = Self::new();
        for (slot, ready) in assets.slots.iter_mut().zip(&snapshot.slots) {
            if let Some((source, asset, generation)) = ready {
                assets.generations = assets.generations.max(*generation);
                *slot = AssetSlot::Ready {
                    source: source.clone(),
                    asset: Arc::clone(asset),
                    generation: *generation,
                };
            }
        }
        assets
    }
}

fn wanted_source(settings: &Settings, id: SlotId) -> Option<&str> {
    if settings.mode != Mode::Svg {
        return None;
    }
    let (pattern, source) = match id {
        SlotId::Base => (&settings.svg.pattern1, &settings.svg.custom1),
        SlotId::Reveal => (&settings.svg.pattern2, &settings.svg.custom2),
    };
    let source = source.trim();
    (*pattern == Pattern::Custom && !source.is_empty()).then_some(source)
}

fn spawn_load(id: SlotId, source: String) -> AssetSlot {
    let (tx, rx) = mpsc::channel();
    let job = source.clone();
    let spawned = std::thread::Builder::new()
        .name("moire-asset".to_owned())
        .spawn(move || {
            let _ = tx.send(load_source(&job));
        });
    match spawned {
        Ok(_) => {
            tracing::debug!(slot = ?id, "custom asset loading");
            AssetSlot::Loading { source, rx }
        }
        Err(err) => {
            tracing::warn!(slot = ?id, error = %err, "failed to spawn asset loader");
            AssetSlot::Failed { source }
        }
    }
}

/// Decode a custom source: inline SVG markup when it starts with `<`, a file path otherwise.
pub fn load_source(source: &str) -> MoireResult<LoadedAsset> {
    let source = source.trim();
    let bytes: Cow<'_, [u8]> = if source.starts_with('<') {
        Cow::Borrowed(source.as_bytes())
    } else {
        Cow::Owned(std::fs::read(source).map_err(|e| {
            MoireError::asset(format!("failed to read custom asset '{source}': {e}"))
        })?)
    };

    if looks_like_svg(&bytes) {
        let tree = parse_svg(&bytes)?;
        let size = tree.size();
        let (w, h) = (f64::from(size.width()), f64::from(size.height()));
        let scale = (SVG_RASTER_TARGET / w.min(h)).max(1.0);
        let (pw, ph) = svg_raster_params(&tree, scale)?;
        let rgba = rasterize_svg_to_premul_rgba8(&tree, pw, ph)?;
        return Ok(LoadedAsset {
            width: w,
            height: h,
            pixels: PreparedImage {
                width: pw,
                height: ph,
                rgba8_premul: Arc::new(rgba),
            },
        });
    }

    let pixels = decode_image(&bytes)?;
    if pixels.width == 0 || pixels.height == 0 {
        return Err(MoireError::asset("custom image is empty"));
    }
    Ok(LoadedAsset {
        width: f64::from(pixels.width),
        height: f64::from(pixels.height),
        pixels,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/custom.rs"]
mod tests;
