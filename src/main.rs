//! termglyph CLI - Render images as terminal text

use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::PathBuf;
use termglyph::{Config, Converter, TermglyphError};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "termglyph", version, about = "Convert images to terminal text art")]
struct Args {
    /// Input image file (reads stdin when omitted)
    input: Option<PathBuf>,
    /// Glyphs to draw with, lightest to densest [default: " .,-~!;:=*&%$@#"]
    #[arg(short = 'c', long)]
    symbols: Option<String>,
    /// Source pixels per output column [default: 4]
    #[arg(short, long)]
    scale: Option<u32>,
    /// Output width in columns (overrides scale)
    #[arg(short, long)]
    width: Option<u32>,
    /// Output height in rows (overrides scale)
    #[arg(short = 'H', long)]
    height: Option<u32>,
    /// Fixed background color, r,g,b or #RRGGBB
    #[arg(short, long)]
    background: Option<String>,
    /// Swap foreground and background colors
    #[arg(short, long)]
    reverse: bool,
    /// Emit truecolor escapes
    #[arg(short = 'u', long)]
    color: bool,
    /// Resampling filter: nearest, bilinear, bicubic, lanczos [default: nearest]
    #[arg(long)]
    filter: Option<String>,
    /// Row/column ratio of a terminal cell [default: 0.5]
    #[arg(long)]
    aspect: Option<f32>,
    /// JSON config file; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

fn build_config(args: &Args) -> Result<Config, TermglyphError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(symbols) = &args.symbols {
        config = config.with_symbols(symbols.parse()?);
    }
    if let Some(scale) = args.scale {
        config = config.with_scale(scale);
    }
    if args.width.is_some() {
        config = config.with_width(args.width);
    }
    if args.height.is_some() {
        config = config.with_height(args.height);
    }
    if let Some(bg) = &args.background {
        config = config.with_background(Some(bg.parse()?));
    }
    if args.reverse {
        config = config.with_reverse(true);
    }
    if args.color {
        config = config.with_color(true);
    }
    if let Some(filter) = &args.filter {
        config = config.with_filter(filter.parse()?);
    }
    if let Some(aspect) = args.aspect {
        config = config.with_aspect_correction(aspect);
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), TermglyphError> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Fail on bad options before touching the image
    let converter = Converter::new(build_config(&args)?)?;

    let image = match &args.input {
        Some(path) => image::open(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            image::load_from_memory(&buf)?
        }
    };
    tracing::debug!(width = image.width(), height = image.height(), "decoded image");

    match &args.output {
        // Render fully first so a failed run leaves no file behind
        Some(path) => {
            let text = converter.convert(&image)?;
            text.write_to(BufWriter::new(File::create(path)?))
        }
        None => converter.render_to(&image, BufWriter::new(io::stdout().lock())),
    }
}
