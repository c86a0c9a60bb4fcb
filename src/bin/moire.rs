use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "moire", version, about = "Render parametric moiré patterns")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render numbered PNG frames into a directory.
    Sequence(SequenceArgs),
    /// List the built-in presets.
    Presets,
    /// Print a settings document as JSON.
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Surface width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,

    #[command(flatten)]
    source: SourceArgs,

    /// Map a font family to a font file, as `family=path`. Repeatable.
    #[arg(long = "font", value_name = "FAMILY=PATH")]
    fonts: Vec<String>,

    /// Directory scanned for `<family>.ttf` / `<family>.otf`. Repeatable.
    #[arg(long = "font-dir", value_name = "DIR")]
    font_dirs: Vec<PathBuf>,

    /// Disable the per-frame base layer cache.
    #[arg(long, default_value_t = false)]
    no_base_cache: bool,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Settings JSON document.
    #[arg(long, conflicts_with = "attributes")]
    settings: Option<PathBuf>,

    /// Flat attribute map as a JSON object of strings.
    #[arg(long)]
    attributes: Option<PathBuf>,

    /// Preset merged over the settings.
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Time to render at.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Number of frames.
    #[arg(long)]
    frames: u64,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[command(flatten)]
    source: SourceArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Presets => cmd_presets(),
        Command::Settings(args) => cmd_settings(args),
    }
}

fn load_settings(src: &SourceArgs) -> anyhow::Result<moire::Settings> {
    let mut settings = match (&src.settings, &src.attributes) {
        (Some(path), _) => moire::Settings::from_path(path)?,
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read attributes '{}'", path.display()))?;
            let attrs: BTreeMap<String, String> = serde_json::from_str(&text)
                .with_context(|| format!("parse attributes '{}'", path.display()))?;
            moire::from_attributes(&attrs)
        }
        (None, None) => moire::Settings::default(),
    };
    if let Some(name) = &src.preset {
        let preset: moire::Preset = name.parse()?;
        preset.apply(&mut settings);
    }
    Ok(settings)
}

fn engine_opts(scene: &SceneArgs) -> anyhow::Result<moire::EngineOpts> {
    let mut book = moire::FontBook::from_env();
    for dir in &scene.font_dirs {
        book = book.with_dir(dir);
    }
    for mapping in &scene.fonts {
        let (family, path) = moire::FontBook::parse_mapping(mapping)?;
        book = book.with_font(family, path);
    }
    Ok(moire::EngineOpts::default()
        .with_fonts(book)
        .with_base_cache(!scene.no_base_cache))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.scene.source)?;
    let canvas = moire::Canvas::new(args.scene.width, args.scene.height)?;
    let mut engine = moire::MoireEngine::new(canvas, settings, engine_opts(&args.scene)?)?;
    engine.settle_assets();
    engine.seek(args.time)?;
    let frame = engine.render()?;

    ensure_parent(&args.out)?;
    moire::write_png(&args.out, frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.scene.source)?;
    let canvas = moire::Canvas::new(args.scene.width, args.scene.height)?;
    let opts = engine_opts(&args.scene)?;
    let mut sink = moire::PngSequenceSink::new(&args.out);
    moire::export_sequence(&settings, canvas, &opts, args.frames, args.threads, &mut sink)
        .with_context(|| format!("render sequence into '{}'", args.out.display()))?;
    eprintln!("wrote {} frames to {}", sink.written(), args.out.display());
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    for preset in moire::Preset::ALL {
        println!("{preset}");
    }
    Ok(())
}

fn cmd_settings(args: SettingsArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.source)?;
    println!("{}", settings.to_json_pretty()?);
    Ok(())
}
