use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrubframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a numbered frame sequence from a video (requires `ffmpeg` on PATH).
    Extract(ExtractArgs),
    /// Render the frame shown at one scroll progress value as a PNG.
    Frame(FrameArgs),
    /// Simulate a scroll through the whole span and print the frame painted on each tick.
    Scrub(ScrubArgs),
    /// Write the procedural paper fold to disk as a numbered frame sequence.
    Paper(PaperArgs),
}

#[derive(Parser, Debug)]
struct NamingArgs {
    /// Frame file name prefix.
    #[arg(long, default_value = "frame_")]
    prefix: String,

    /// Zero-padding width of the 1-based frame number.
    #[arg(long, default_value_t = 4)]
    digits: usize,

    /// Frame file extension.
    #[arg(long, default_value = "jpg")]
    ext: String,
}

impl NamingArgs {
    fn naming(&self) -> scrubframe::FrameNaming {
        scrubframe::FrameNaming {
            prefix: self.prefix.clone(),
            digits: self.digits,
            ext: self.ext.clone(),
        }
    }
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Input video.
    #[arg(long)]
    video: PathBuf,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Sampling rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    #[command(flatten)]
    naming: NamingArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Engine config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    /// Engine config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Number of evenly spaced scroll positions from top to bottom.
    #[arg(long, default_value_t = 11)]
    steps: u32,

    /// Seconds between ticks.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
}

#[derive(Parser, Debug)]
struct PaperArgs {
    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Frame width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Frame height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Number of frames.
    #[arg(long, default_value_t = scrubframe::PAPER_FRAME_COUNT)]
    frames: u64,

    /// Texture seed.
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    naming: NamingArgs,
}

const SCROLL_VIEWPORT: f64 = 1000.0;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Extract(args) => cmd_extract(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
        Command::Paper(args) => cmd_paper(args),
    }
}

fn cmd_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let cfg = scrubframe::ExtractConfig {
        video: args.video,
        out_dir: args.out_dir,
        fps: args.fps,
        naming: args.naming.naming(),
    };
    let count = scrubframe::extract_frames(&cfg)?;
    eprintln!("extracted {count} frames to {}", cfg.out_dir.display());
    Ok(())
}

fn load_engine(
    config_path: &Path,
) -> anyhow::Result<scrubframe::ScrubEngine<scrubframe::PixmapSurface>> {
    let cfg = scrubframe::EngineConfig::from_json_file(config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let report = |event: &scrubframe::LoadEvent| {
        if let scrubframe::LoadEvent::Progress(p) = event {
            tracing::debug!(percent = p.percent, "loading frames");
        }
    };
    let store = cfg
        .build_store(base_dir, &cfg.load_options(), &report)
        .with_context(|| format!("load frames for '{}'", config_path.display()))?;

    let canvas = store
        .frame_canvas()
        .context("frame store has no frame size after loading")?;
    let surface = scrubframe::PixmapSurface::new(canvas, cfg.clear_rgba)?;
    Ok(scrubframe::ScrubEngine::new(
        store,
        surface,
        cfg.curve,
        cfg.smoothing()?,
    ))
}

/// A container exactly two viewports tall: the scroll span is `[0, SCROLL_VIEWPORT]`.
fn demo_layout() -> scrubframe::ContainerLayout {
    scrubframe::ContainerLayout {
        top: 0.0,
        height: 2.0 * SCROLL_VIEWPORT,
        viewport_height: SCROLL_VIEWPORT,
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be in [0, 1], got {}", args.progress);
    }
    let mut engine = load_engine(&args.config)?;
    let layout = demo_layout();
    engine.activate(&layout, scrubframe::Subscription::noop())?;
    engine.on_scroll(args.progress * SCROLL_VIEWPORT);
    engine.tick(0.0)?;

    let state = engine.renderer().state();
    let index = state
        .current_frame
        .context("no frame was painted (bug)")?;
    let frame = engine.renderer().surface().snapshot()?;
    write_image(&args.out, &frame)?;

    eprintln!("wrote {} (frame {})", args.out.display(), index.0);
    Ok(())
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    if args.steps < 2 {
        anyhow::bail!("--steps must be >= 2");
    }
    let mut engine = load_engine(&args.config)?;
    let initial = engine.activate(&demo_layout(), scrubframe::Subscription::noop())?;
    println!("step\toffset\tprogress\tframe");
    println!("-\t-\t-\t{}", initial.0);

    for step in 0..args.steps {
        let offset = f64::from(step) / f64::from(args.steps - 1) * SCROLL_VIEWPORT;
        engine.on_scroll(offset);
        engine.tick(args.dt)?;
        let frame = engine
            .renderer()
            .state()
            .current_frame
            .map_or_else(|| "-".to_string(), |f| f.0.to_string());
        let progress = engine.tracker().raw_progress().unwrap_or(0.0);
        println!("{step}\t{offset:.1}\t{progress:.4}\t{frame}");
    }

    engine.detach();
    eprintln!("{} paints", engine.renderer().paint_count());
    Ok(())
}

fn cmd_paper(args: PaperArgs) -> anyhow::Result<()> {
    use scrubframe::FrameGenerator as _;

    if args.frames == 0 {
        anyhow::bail!("--frames must be > 0");
    }
    let naming = args.naming.naming();
    naming.validate()?;

    let canvas = scrubframe::Canvas::new(args.width, args.height)?;
    let generator = scrubframe::PaperFrameGenerator::new(canvas, args.seed)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for i in 0..args.frames {
        let index = scrubframe::FrameIndex(i);
        let frame = generator.generate(index, args.frames)?;
        write_image(&args.out_dir.join(naming.file_name(index)), &frame)?;
    }

    eprintln!("wrote {} frames to {}", args.frames, args.out_dir.display());
    Ok(())
}

fn write_image(path: &Path, frame: &scrubframe::RasterFrame) -> anyhow::Result<()> {
    scrubframe::ensure_parent_dir(path)?;
    let format = image::ImageFormat::from_path(path)
        .with_context(|| format!("unknown image format for '{}'", path.display()))?;
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba8_premul.to_vec())
        .context("frame buffer does not match its dimensions (bug)")?;

    let res = match format {
        image::ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .save_with_format(path, format),
        _ => img.save_with_format(path, format),
    };
    res.with_context(|| format!("write image '{}'", path.display()))
}
