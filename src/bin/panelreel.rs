use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use panelreel::annotation::is_annotation_path;
use panelreel::naming::{count_images, list_files_sorted};
use panelreel::{
    CommandSynthesizer, FfmpegMuxer, LayoutMode, NameFormat, PageAnnotation, PipelineConfig,
    RedactionMode, Transcript, VoiceBank,
};

#[derive(Parser, Debug)]
#[command(name = "panelreel", version)]
struct Cli {
    /// Pipeline config JSON; command-line flags override its fields.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Redact text bubbles and write every frame variant.
    Redact(RedactArgs),
    /// Compose frame variants and narration into the final MP4 (requires `ffmpeg`).
    Render(RenderArgs),
    /// Redact, then render.
    Run(RunArgs),
    /// Write the speaker-attributed transcript for a folder of annotations.
    Transcript(TranscriptArgs),
    /// Synthesize one narration clip per transcript line with an external TTS program.
    Narrate(NarrateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    FullPage,
    Panels,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    Pad,
    Fit,
}

#[derive(Args, Debug)]
struct NamingArgs {
    /// Zero-padding width of name fields (default: derived from the page image count).
    #[arg(long)]
    width: Option<usize>,
}

#[derive(Args, Debug)]
struct RedactArgs {
    /// Directory of page images.
    #[arg(long)]
    images: PathBuf,
    /// Directory of per-page annotation JSON files.
    #[arg(long)]
    annotations: PathBuf,
    /// Output directory for frame variants.
    #[arg(long)]
    out: PathBuf,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Keep existing images in the output directory.
    #[arg(long)]
    no_nuke: bool,
    #[command(flatten)]
    naming: NamingArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Directory of frame variants.
    #[arg(long)]
    frames: PathBuf,
    /// Directory of narration clips.
    #[arg(long)]
    audio: PathBuf,
    /// Output directory for the videos.
    #[arg(long)]
    out: PathBuf,
    /// Page image directory, used to derive the name width.
    #[arg(long)]
    images: Option<PathBuf>,
    #[arg(long)]
    fps: Option<u32>,
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
    /// Keep the silent video after muxing.
    #[arg(long)]
    keep_intermediates: bool,
    #[command(flatten)]
    naming: NamingArgs,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    redact: RedactArgs,
    /// Directory of narration clips.
    #[arg(long)]
    audio: PathBuf,
    /// Output directory for the videos.
    #[arg(long)]
    video_out: PathBuf,
    #[arg(long)]
    fps: Option<u32>,
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
}

#[derive(Args, Debug)]
struct TranscriptArgs {
    /// Directory of per-page annotation JSON files.
    #[arg(long)]
    annotations: PathBuf,
    /// Transcript file to write.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct NarrateArgs {
    #[arg(long)]
    transcript: PathBuf,
    /// Voice bank directory (`male/` and `female/` sub-pools are optional).
    #[arg(long)]
    voices: PathBuf,
    /// Output directory for narration clips.
    #[arg(long)]
    out: PathBuf,
    /// TTS program to run once per line.
    #[arg(long)]
    tts: String,
    /// TTS argument; may use `{text}`, `{voice}`, `{language}` and `{out}`.
    #[arg(long = "tts-arg", allow_hyphen_values = true)]
    tts_args: Vec<String>,
    /// Page image directory, used to derive the name width.
    #[arg(long)]
    images: Option<PathBuf>,
    #[arg(long)]
    language: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    naming: NamingArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = match &cli.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };

    match cli.cmd {
        Command::Redact(args) => cmd_redact(args, cfg),
        Command::Render(args) => cmd_render(args, cfg),
        Command::Run(args) => cmd_run(args, cfg),
        Command::Transcript(args) => cmd_transcript(args),
        Command::Narrate(args) => cmd_narrate(args, cfg),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn name_format(naming: &NamingArgs, images: Option<&Path>) -> anyhow::Result<NameFormat> {
    if let Some(width) = naming.width {
        return Ok(NameFormat::new(width)?);
    }
    let images = images.context("pass --width or --images to determine the name width")?;
    Ok(NameFormat::for_image_count(count_images(images)?))
}

fn apply_render_flags(
    cfg: &mut PipelineConfig,
    fps: Option<u32>,
    layout: Option<LayoutArg>,
) -> anyhow::Result<()> {
    if let Some(fps) = fps {
        cfg.fps = fps;
    }
    if let Some(layout) = layout {
        cfg.layout = match layout {
            LayoutArg::Pad => LayoutMode::Pad,
            LayoutArg::Fit => LayoutMode::Fit,
        };
    }
    cfg.validate()?;
    Ok(())
}

fn redact(args: &RedactArgs, cfg: &mut PipelineConfig) -> anyhow::Result<NameFormat> {
    if let Some(mode) = args.mode {
        cfg.mode = match mode {
            ModeArg::FullPage => RedactionMode::FullPage,
            ModeArg::Panels => RedactionMode::Panels,
        };
    }
    if args.no_nuke {
        cfg.nuke = false;
    }
    let format = name_format(&args.naming, Some(&args.images))?;
    let report =
        panelreel::process_batch(&args.images, &args.annotations, &args.out, format, cfg)?;
    for failure in &report.failures {
        eprintln!("failed {}: {}", failure.image.display(), failure.error);
    }
    eprintln!(
        "wrote {} variants for {} pages to {}",
        report.variants_written(),
        report.pages.len(),
        args.out.display()
    );
    Ok(format)
}

fn cmd_redact(args: RedactArgs, mut cfg: PipelineConfig) -> anyhow::Result<()> {
    redact(&args, &mut cfg)?;
    Ok(())
}

fn cmd_render(args: RenderArgs, mut cfg: PipelineConfig) -> anyhow::Result<()> {
    apply_render_flags(&mut cfg, args.fps, args.layout)?;
    if args.keep_intermediates {
        cfg.delete_intermediates = false;
    }
    let format = name_format(&args.naming, args.images.as_deref())?;
    let report = panelreel::render_video(
        &args.frames,
        &args.audio,
        &args.out,
        format,
        &cfg,
        &mut FfmpegMuxer::new(),
    )?;
    eprintln!("wrote {}", report.output.path.display());
    Ok(())
}

fn cmd_run(args: RunArgs, mut cfg: PipelineConfig) -> anyhow::Result<()> {
    apply_render_flags(&mut cfg, args.fps, args.layout)?;
    let format = redact(&args.redact, &mut cfg)?;
    let report = panelreel::render_video(
        &args.redact.out,
        &args.audio,
        &args.video_out,
        format,
        &cfg,
        &mut FfmpegMuxer::new(),
    )?;
    eprintln!("wrote {}", report.output.path.display());
    Ok(())
}

fn cmd_transcript(args: TranscriptArgs) -> anyhow::Result<()> {
    let mut pages = Vec::new();
    for path in list_files_sorted(&args.annotations)? {
        if !is_annotation_path(&path) {
            continue;
        }
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        pages.push((id, PageAnnotation::from_path(&path)?));
    }
    let transcript =
        panelreel::build_transcript(pages.iter().map(|(id, ann)| (id.as_str(), ann)))?;
    transcript.write(&args.out)?;
    eprintln!(
        "wrote {} pages, {} speakers to {}",
        transcript.pages.len(),
        transcript.characters().len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_narrate(args: NarrateArgs, mut cfg: PipelineConfig) -> anyhow::Result<()> {
    if let Some(language) = args.language {
        cfg.language = language;
    }
    if let Some(seed) = args.seed {
        cfg.voice_seed = seed;
    }
    let format = name_format(&args.naming, args.images.as_deref())?;
    let transcript = Transcript::from_path(&args.transcript)?;
    let bank = VoiceBank::scan(&args.voices)?;
    let voices = panelreel::assign_voices(&transcript.characters(), &bank, cfg.voice_seed)?;

    let mut synth = CommandSynthesizer::new(args.tts, args.tts_args);
    let report = panelreel::narrate(
        &transcript,
        &voices,
        &mut synth,
        &args.out,
        format,
        &cfg.language,
    )?;
    eprintln!(
        "wrote {} clips ({} lines skipped) to {}",
        report.clips.len(),
        report.skipped.len(),
        args.out.display()
    );
    Ok(())
}
