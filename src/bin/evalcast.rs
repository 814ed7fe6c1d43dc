use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use evalcast::{
    AssetStore, CastConfig, CpuRenderer, FfmpegSink, FrameIndex, FrameSink,
    PngSequenceSink, RenderOpts, Timeline, encode::write_png, render_frame, render_range, scenes,
};

#[derive(Parser, Debug)]
#[command(name = "evalcast", version)]
struct Cli {
    /// JSON settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory images and fonts are resolved against (overrides the settings file).
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Log more (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the shipped scenes.
    List,
    /// Record a scene and write its timeline JSON.
    Plan(PlanArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a whole scene as an MP4 (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Source {
    /// Scene name (see `list`).
    #[arg(long)]
    scene: Option<String>,

    /// Timeline JSON written by `plan`.
    #[arg(long)]
    timeline: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Scene name (see `list`).
    #[arg(long)]
    scene: String,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: Source,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: Source,

    /// Output MP4 path, or directory with `--png-sequence`.
    #[arg(long)]
    out: PathBuf,

    /// Write numbered PNGs instead of an MP4.
    #[arg(long, default_value_t = false)]
    png_sequence: bool,

    /// Rasterize every frame, even unchanged ones.
    #[arg(long, default_value_t = false)]
    no_elision: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref(), cli.assets)?;
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Plan(args) => cmd_plan(args, &config),
        Command::Frame(args) => cmd_frame(args, &config),
        Command::Render(args) => cmd_render(args, &config),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn load_config(path: Option<&Path>, assets: Option<PathBuf>) -> anyhow::Result<CastConfig> {
    let mut config = match path {
        Some(path) => CastConfig::load(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => CastConfig::default(),
    };
    if let Some(assets) = assets {
        config.assets = assets;
    }
    Ok(config)
}

fn load_timeline(source: &Source, config: &CastConfig) -> anyhow::Result<Timeline> {
    match (&source.scene, &source.timeline) {
        (Some(name), _) => {
            let scene = scenes::find(name)?;
            Ok(scenes::record(scene, config).with_context(|| format!("record scene '{name}'"))?)
        }
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read timeline '{}'", path.display()))?;
            let timeline = Timeline::from_json(&text)
                .with_context(|| format!("parse timeline '{}'", path.display()))?;
            timeline.validate()?;
            Ok(timeline)
        }
        (None, None) => anyhow::bail!("one of --scene or --timeline is required"),
    }
}

fn cmd_list() -> anyhow::Result<()> {
    for scene in scenes::all() {
        println!("{:<28} {}", scene.name(), scene.summary());
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs, config: &CastConfig) -> anyhow::Result<()> {
    let scene = scenes::find(&args.scene)?;
    let timeline = scenes::record(scene, config)
        .with_context(|| format!("record scene '{}'", args.scene))?;
    let json = timeline.to_json_pretty()?;
    match args.out {
        Some(out) => {
            evalcast::encode::ensure_parent_dir(&out)?;
            std::fs::write(&out, json)
                .with_context(|| format!("write timeline '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs, config: &CastConfig) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.source, config)?;
    let assets = AssetStore::prepare(&timeline, &config.assets)?;
    let mut renderer = CpuRenderer::new(&assets);
    let frame = render_frame(&timeline, FrameIndex(args.frame), &mut renderer, &assets)?;
    write_png(&args.out, &frame).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs, config: &CastConfig) -> anyhow::Result<()> {
    let timeline = load_timeline(&args.source, config)?;
    let assets = AssetStore::prepare(&timeline, &config.assets)?;
    let mut renderer = CpuRenderer::new(&assets);

    let mut sink: Box<dyn FrameSink> = if args.png_sequence {
        Box::new(PngSequenceSink::new(&args.out))
    } else {
        Box::new(FfmpegSink::new(&args.out, timeline.background))
    };
    let opts = RenderOpts {
        static_frame_elision: !args.no_elision,
    };
    let stats = render_range(
        &timeline,
        timeline.frame_range(),
        &mut renderer,
        &assets,
        sink.as_mut(),
        &opts,
    )?;

    eprintln!(
        "wrote {} ({} frames, {} elided)",
        args.out.display(),
        stats.frames_total,
        stats.frames_elided
    );
    Ok(())
}
