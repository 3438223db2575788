use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spritetile", version)]
struct Cli {
    /// Raise log verbosity (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite the first frame into a single flat image.
    Flatten(FlattenArgs),
    /// Composite the first frame and write it out as raw tiles plus a manifest.
    Tile(TileArgs),
    /// Print the decoded canvas, layer table and frame summary.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct FlattenArgs {
    /// Input sprite document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output file path.
    #[arg(long)]
    out: PathBuf,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = FlatFormat::Json)]
    format: FlatFormat,
}

#[derive(Parser, Debug)]
struct TileArgs {
    /// Input sprite document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `manifest.json` and `tiles/`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = spritetile::DEFAULT_TILE_SIZE)]
    tile_size: u32,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input sprite document.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FlatFormat {
    /// `{width, height, frames: [{pixels}]}`
    Json,
    /// Raw `width*height*4` RGBA8 bytes.
    Bin,
    /// RGBA PNG.
    Png,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Flatten(args) => cmd_flatten(args),
        Command::Tile(args) => cmd_tile(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_document(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read sprite document '{}'", path.display()))
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))
}

fn cmd_flatten(args: FlattenArgs) -> anyhow::Result<()> {
    let bytes = read_document(&args.in_path)?;
    let flat = spritetile::flatten(&bytes)
        .with_context(|| format!("flatten '{}'", args.in_path.display()))?;

    if let Some(parent) = args.out.parent() {
        ensure_dir(parent)?;
    }

    match args.format {
        FlatFormat::Json => {
            let json = serde_json::to_vec(&flat.to_record()).context("serialize flat image")?;
            std::fs::write(&args.out, json)
                .with_context(|| format!("write json '{}'", args.out.display()))?;
        }
        FlatFormat::Bin => {
            std::fs::write(&args.out, flat.as_bytes())
                .with_context(|| format!("write raw pixels '{}'", args.out.display()))?;
        }
        FlatFormat::Png => {
            image::save_buffer_with_format(
                &args.out,
                flat.as_bytes(),
                flat.width,
                flat.height,
                image::ColorType::Rgba8,
                image::ImageFormat::Png,
            )
            .with_context(|| format!("write png '{}'", args.out.display()))?;
        }
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_tile(args: TileArgs) -> anyhow::Result<()> {
    let opts = spritetile::PipelineOpts {
        tile_size: args.tile_size,
    };
    opts.validate()?;

    let bytes = read_document(&args.in_path)?;
    let flat = spritetile::flatten(&bytes)
        .with_context(|| format!("flatten '{}'", args.in_path.display()))?;

    let tiles_dir = args.out_dir.join("tiles");
    ensure_dir(&tiles_dir)?;

    let mut written = 0usize;
    let manifest = spritetile::for_each_tile(&flat, opts.tile_size, |view| {
        let path = tiles_dir.join(view.file_name());
        std::fs::write(&path, view.pixels)
            .with_context(|| format!("write tile '{}'", path.display()))?;
        written += 1;
        Ok(())
    })?;

    let manifest_path = args.out_dir.join("manifest.json");
    let json = serde_json::to_vec(&manifest).context("serialize manifest")?;
    std::fs::write(&manifest_path, json)
        .with_context(|| format!("write manifest '{}'", manifest_path.display()))?;

    eprintln!("wrote {written} tiles and {}", manifest_path.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = read_document(&args.in_path)?;
    let doc = spritetile::decode_document(&bytes)
        .with_context(|| format!("decode '{}'", args.in_path.display()))?;

    println!("canvas: {}x{}", doc.width, doc.height);
    println!("layers:");
    for (index, layer) in doc.layers.iter().enumerate() {
        let visibility = if layer.visible() { "visible" } else { "hidden" };
        println!(
            "  [{index}] {:?} {visibility} opacity={}",
            layer.name, layer.opacity
        );
    }
    println!("frames:");
    for (index, frame) in doc.frames.iter().enumerate() {
        let empty = frame.cels.iter().filter(|c| c.is_empty()).count();
        println!(
            "  [{index}] {}ms cels={} empty={empty}",
            frame.duration_ms,
            frame.cels.len()
        );
    }
    Ok(())
}
