use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poppet", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an impact script over an image and write the composed frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long)]
    image: PathBuf,

    /// Impact script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the script's render time, in milliseconds.
    #[arg(long)]
    at_ms: Option<f64>,

    /// Override the script's RNG seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
    }
}

fn read_script_json(path: &Path) -> anyhow::Result<poppet::ImpactScript> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let r = BufReader::new(f);
    let script: poppet::ImpactScript =
        serde_json::from_reader(r).with_context(|| "parse impact script JSON")?;
    Ok(script)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut script = read_script_json(&args.script)?;
    if let Some(at_ms) = args.at_ms {
        script.render_at_ms = Some(at_ms);
    }
    if let Some(seed) = args.seed {
        script.opts.rng_seed = Some(seed);
    } else if script.opts.rng_seed.is_none() {
        script.opts.rng_seed = poppet::SessionOpts::from_env().rng_seed;
    }

    let image = std::fs::read(&args.image)
        .with_context(|| format!("read image '{}'", args.image.display()))?;
    let frame = script.replay(&image)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = frame.encode_png()?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
