use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bannerkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an edit document against a source image and write the result.
    Export(ExportArgs),
    /// Print the crop region a pan/zoom maps to, as JSON.
    Crop(CropArgs),
    /// Print the built-in color presets as JSON.
    Presets,
    /// Print the text font menu as JSON.
    Fonts,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Source image (png, jpeg, webp, ...).
    #[arg(long)]
    source: PathBuf,

    /// Edit document JSON. Defaults apply when omitted.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Directory the exported file is written to.
    #[arg(long)]
    out_dir: PathBuf,

    /// Extra font directory loaded next to system fonts.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Override the document's format (png, jpeg, webp).
    #[arg(long)]
    format: Option<String>,

    /// Override the document's quality (0..=1).
    #[arg(long)]
    quality: Option<f64>,
}

#[derive(Parser, Debug)]
struct CropArgs {
    /// Source width in pixels.
    #[arg(long)]
    width: u32,

    /// Source height in pixels.
    #[arg(long)]
    height: u32,

    /// Horizontal pan in preview pixels.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_x: f64,

    /// Vertical pan in preview pixels.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_y: f64,

    #[arg(long, default_value_t = 1.0)]
    zoom: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Crop(args) => cmd_crop(args),
        Command::Presets => cmd_presets(),
        Command::Fonts => cmd_fonts(),
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut opts = bannerkit::RenderOpts::from_env();
    if args.font_dir.is_some() {
        opts.font_dir = args.font_dir.clone();
    }

    let mut doc = match &args.params {
        Some(path) => bannerkit::EditDocument::from_path(path)?,
        None => bannerkit::EditDocument::default(),
    };
    if let Some(format) = &args.format {
        doc.export.format = format.parse()?;
    }
    if let Some(quality) = args.quality {
        doc.export.quality = quality;
    }

    let bytes = std::fs::read(&args.source)
        .with_context(|| format!("read source image '{}'", args.source.display()))?;
    let source = bannerkit::decode_image(&bytes)?;
    let session = doc.prepare(source)?;

    let fonts = opts.font_book();
    let exported = session.export(&fonts, &opts)?;
    let path = exported.write_to_dir(&args.out_dir)?;

    eprintln!(
        "wrote {} ({}, {}x{}, {} bytes)",
        path.display(),
        exported.format.mime_type(),
        exported.width,
        exported.height,
        exported.bytes.len()
    );
    println!("{}", path.display());
    Ok(())
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let region = bannerkit::map_crop(
        args.width,
        args.height,
        bannerkit::CropViewport::default(),
        bannerkit::Vec2::new(args.pan_x, args.pan_y),
        args.zoom,
    )?;
    println!("{}", serde_json::to_string_pretty(&region)?);
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&bannerkit::PRESETS)?);
    Ok(())
}

fn cmd_fonts() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&bannerkit::FONT_CHOICES)?);
    Ok(())
}
