use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mlreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available scenes.
    List,
    /// Play a scene without rasterizing and print its event log as JSON.
    Dump(DumpArgs),
    /// Render a single moment of a scene as a PNG.
    Frame(FrameArgs),
    /// Render a whole scene as MP4 (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Scene name (see `mlreel list`).
    #[arg(long)]
    scene: String,

    /// Write JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[arg(long)]
    scene: String,

    /// Playback time in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the number of font faces available to text rendering.
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(long)]
    scene: String,

    /// Render config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path; defaults to `<output_dir>/<scene>.mp4` (or `<output_dir>/<scene>/`).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Dump(args) => cmd_dump(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn build_scene(name: &str) -> anyhow::Result<mlreel::Scene> {
    let Some(entry) = mlreel::scenes::find(name) else {
        let known: Vec<&str> = mlreel::scenes::catalog().iter().map(|e| e.name).collect();
        anyhow::bail!("unknown scene '{name}' (known: {})", known.join(", "));
    };
    (entry.build)().with_context(|| format!("build scene '{name}'"))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<mlreel::RenderConfig> {
    match path {
        Some(p) => Ok(mlreel::RenderConfig::from_path(p)?),
        None => Ok(mlreel::RenderConfig::default()),
    }
}

fn cmd_list() -> anyhow::Result<()> {
    for entry in mlreel::scenes::catalog() {
        let scene = (entry.build)().with_context(|| format!("build scene '{}'", entry.name))?;
        println!(
            "{:<20} {:>7.2}s  {}",
            entry.name,
            scene.duration(),
            entry.title
        );
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct Dump<'a> {
    scene: &'a mlreel::Scene,
    report: mlreel::PlaybackReport,
    events: Vec<mlreel::RenderEvent>,
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let scene = build_scene(&args.scene)?;
    let mut recorder = mlreel::RecordingRenderer::new();
    let report = scene
        .play(&mut recorder)
        .with_context(|| format!("play scene '{}'", scene.name))?;
    let dump = Dump {
        scene: &scene,
        report,
        events: recorder.into_events(),
    };
    let json = serde_json::to_string_pretty(&dump).context("serialize dump")?;

    match args.out {
        Some(out) => {
            mlreel::encode::sink::ensure_parent_dir(&out)?;
            std::fs::write(&out, json).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = build_scene(&args.scene)?;
    let cfg = load_config(args.config.as_deref())?;

    if args.dump_fonts {
        let raster = mlreel::render::cpu::CpuRasterizer::new(cfg.width_px, cfg.height_px, &cfg.fonts())?;
        eprintln!("font faces: {}", raster.font_faces());
    }

    let frame = mlreel::render_still(&scene, args.at, &cfg)?;
    let mut rgba = vec![0u8; frame.data.len()];
    if frame.premultiplied {
        mlreel::encode::sink::unpremultiply_rgba8(&mut rgba, &frame.data)?;
    } else {
        rgba.copy_from_slice(&frame.data);
    }

    mlreel::encode::sink::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = build_scene(&args.scene)?;
    let cfg = load_config(args.config.as_deref())?;
    let (out, report) = mlreel::render_to_path(&scene, &cfg, args.out)?;
    eprintln!(
        "wrote {} ({} steps, {:.2}s)",
        out.display(),
        report.steps.len(),
        report.duration_secs
    );
    Ok(())
}
