//! Font resolution and text shaping.
//!
//! Families resolve through a [`FontBook`]: explicit `family → file` mappings first, then font
//! directories (including `MOIRE_FONT_DIR`), then installed system fonts. Shaping goes through
//! `parley`; glyphs are drawn with `vello_cpu`.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use usvg::fontdb;

use crate::draw::list::TextRun;
use crate::draw::text::TextMeasure;
use crate::foundation::core::Vec2;
use crate::foundation::error::{MoireError, MoireResult};

/// Environment variable listing extra font directories.
pub const FONT_DIR_ENV: &str = "MOIRE_FONT_DIR";

const MAX_SHAPED: usize = 256;

/// Brush carried through `parley`; text is painted with the layer color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush;

/// Where font families are looked up.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    files: BTreeMap<String, PathBuf>,
    dirs: Vec<PathBuf>,
    system: bool,
}

impl FontBook {
    /// Empty book: no mappings, no directories, no system fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// System fonts plus every directory in `MOIRE_FONT_DIR`.
    pub fn from_env() -> Self {
        let mut book = Self::new().with_system_fonts(true);
        if let Some(v) = std::env::var_os(FONT_DIR_ENV) {
            book.dirs.extend(std::env::split_paths(&v));
        }
        book
    }

    /// Map `family` to a font file. Mappings take precedence over directories.
    pub fn with_font(mut self, family: impl AsRef<str>, path: impl Into<PathBuf>) -> Self {
        self.files
            .insert(family.as_ref().to_ascii_lowercase(), path.into());
        self
    }

    /// Scan `dir` for `.ttf`/`.otf` files named after their family.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    /// Enable or disable installed system fonts as the last resort.
    pub fn with_system_fonts(mut self, enabled: bool) -> Self {
        self.system = enabled;
        self
    }

    /// Parse a `family=path` mapping.
    pub fn parse_mapping(s: &str) -> MoireResult<(String, PathBuf)> {
        let (family, path) = s
            .split_once('=')
            .ok_or_else(|| MoireError::validation(format!("expected family=path, got '{s}'")))?;
        let family = family.trim();
        let path = path.trim();
        if family.is_empty() || path.is_empty() {
            return Err(MoireError::validation(format!(
                "expected family=path, got '{s}'"
            )));
        }
        Ok((family.to_owned(), PathBuf::from(path)))
    }

    /// File providing `family`, from the explicit mappings or the font directories.
    ///
    /// In directories a `<family>-Bold` file is preferred over `<family>`.
    pub fn find_file(&self, family: &str) -> Option<PathBuf> {
        let key = family.to_ascii_lowercase();
        if let Some(p) = self.files.get(&key) {
            return Some(p.clone());
        }
        let bold = format!("{key}-bold");
        let mut regular = None;
        for dir in &self.dirs {
            let Ok(entries) = std::fs::read_dir(dir) else {
                continue;
            };
            let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
            paths.sort();
            for path in paths {
                if !is_font_file(&path) {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let stem = stem.to_ascii_lowercase();
                if stem == bold {
                    return Some(path);
                }
                if stem == key && regular.is_none() {
                    regular = Some(path);
                }
            }
        }
        regular
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
}

/// A shaped single-line run, ready to draw.
#[derive(Clone, Debug)]
pub struct ShapedText {
    /// Font the glyph ids refer to.
    pub font: vello_cpu::peniko::FontData,
    /// Pixel size.
    pub font_size: f32,
    /// Glyphs in layout coordinates (top-left origin).
    pub glyphs: Vec<vello_cpu::Glyph>,
    /// Advance width, letter spacing included.
    pub width: f64,
    /// Translation moving the horizontal center and the vertical middle onto the origin.
    pub anchor: Vec2,
}

#[derive(Clone, Debug)]
struct LoadedFace {
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ShapeKey {
    text: String,
    family: String,
    size_bits: u64,
    spacing_bits: u64,
}

/// Shapes bold text runs and caches the results.
pub struct TextLayoutEngine {
    book: FontBook,
    system_db: Option<fontdb::Database>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    faces: HashMap<String, Option<LoadedFace>>,
    shaped: HashMap<ShapeKey, Option<Arc<ShapedText>>>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new(FontBook::from_env())
    }
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("book", &self.book)
            .field("faces", &self.faces.len())
            .field("shaped", &self.shaped.len())
            .finish()
    }
}

impl TextLayoutEngine {
    /// Engine resolving families through `book`.
    pub fn new(book: FontBook) -> Self {
        Self {
            book,
            system_db: None,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
            shaped: HashMap::new(),
        }
    }

    /// Shape `run`, or `None` when its family cannot be resolved or nothing would be drawn.
    pub fn shape(&mut self, run: &TextRun) -> Option<Arc<ShapedText>> {
        if run.text.is_empty() || !(run.size.is_finite() && run.size > 0.0) {
            return None;
        }
        let key = ShapeKey {
            text: run.text.clone(),
            family: run.family.to_ascii_lowercase(),
            size_bits: run.size.to_bits(),
            spacing_bits: run.letter_spacing.to_bits(),
        };
        if let Some(hit) = self.shaped.get(&key) {
            return hit.clone();
        }

        let shaped = self.face(&run.family).map(|face| Arc::new(self.layout(run, &face)));
        if self.shaped.len() >= MAX_SHAPED {
            tracing::debug!(entries = self.shaped.len(), "text shape cache cleared");
            self.shaped.clear();
        }
        self.shaped.insert(key, shaped.clone());
        shaped
    }

    fn layout(&mut self, run: &TextRun, face: &LoadedFace) -> ShapedText {
        use parley::style::{FontStack, FontWeight, StyleProperty};

        let font_size = run.size as f32;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &run.text, 1.0, true);
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Owned(
            face.family_name.clone(),
        ))));
        builder.push_default(StyleProperty::FontSize(font_size));
        builder.push_default(StyleProperty::FontWeight(FontWeight::BOLD));
        builder.push_default(StyleProperty::LetterSpacing(run.letter_spacing as f32));
        builder.push_default(StyleProperty::Brush(TextBrush));

        let mut layout: parley::Layout<TextBrush> = builder.build(&run.text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut middle = f64::from(font_size) / 2.0;
        for (i, line) in layout.lines().enumerate() {
            if i == 0 {
                let m = line.metrics();
                middle = f64::from(m.baseline - (m.ascent - m.descent) / 2.0);
            }
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                glyphs.extend(glyph_run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        let width = f64::from(layout.width());
        ShapedText {
            font: face.font.clone(),
            font_size,
            glyphs,
            width,
            anchor: Vec2::new(-width / 2.0, -middle),
        }
    }

    fn face(&mut self, family: &str) -> Option<LoadedFace> {
        let key = family.to_ascii_lowercase();
        if let Some(hit) = self.faces.get(&key) {
            return hit.clone();
        }
        let loaded = match self.load_face(family) {
            Ok(face) => {
                tracing::debug!(family, resolved = %face.family_name, "font resolved");
                Some(face)
            }
            Err(err) => {
                tracing::warn!(family, error = %err, "font unavailable, text skipped");
                None
            }
        };
        self.faces.insert(key, loaded.clone());
        loaded
    }

    fn load_face(&mut self, family: &str) -> MoireResult<LoadedFace> {
        let (bytes, index) = match self.book.find_file(family) {
            Some(path) => {
                let bytes = std::fs::read(&path).map_err(|e| {
                    MoireError::asset(format!("failed to read font '{}': {e}", path.display()))
                })?;
                (bytes, 0)
            }
            None => self.system_face(family)?,
        };

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| MoireError::asset("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MoireError::asset("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index);
        Ok(LoadedFace { family_name, font })
    }

    fn system_face(&mut self, family: &str) -> MoireResult<(Vec<u8>, u32)> {
        if !self.book.system {
            return Err(MoireError::asset(format!(
                "no font file for family '{family}'"
            )));
        }
        let db = self.system_db.get_or_insert_with(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "system fonts loaded");
            db
        });
        let families = [fontdb::Family::Name(family), fontdb::Family::SansSerif];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::BOLD,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = db.query(&query).ok_or_else(|| {
            MoireError::asset(format!("no installed font matches '{family}'"))
        })?;
        db.with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| MoireError::asset(format!("font data for '{family}' unavailable")))
    }
}

impl TextMeasure for TextLayoutEngine {
    fn measure(&mut self, run: &TextRun) -> f64 {
        self.shape(run).map_or(0.0, |s| s.width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
