use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use qrvec_core::Ecl;
use qrvec_encode::{ModuleShape, QrBuilder};

#[derive(Parser)]
#[command(name = "qrvec")]
#[command(version)]
#[command(about = "Generate QR codes as SVG from the command line", long_about = None)]
#[command(after_help = "\
Examples:
  qrvec 'https://example.com'
  qrvec --shape circle --fg '#3498db' 'Hello World'
  qrvec --gradient '#ff6b6b,#4ecdc4' --shape rounded 'Gradient QR'
  qrvec --logo logo.png --logo-width 100 'QR with logo'")]
struct Cli {
    #[arg(help = "Data to encode")]
    data: String,
    #[arg(short, long, default_value = "qrcode.svg", help = "Output file path")]
    output: PathBuf,
    #[arg(long, default_value_t = 512, help = "Output size in pixels")]
    size: u32,
    #[arg(
        long,
        default_value = "square",
        help = "Module shape: square, circle, rounded, diamond, dot, star, heart"
    )]
    shape: String,
    #[arg(long, default_value = "#000000", help = "Foreground color (hex)")]
    fg: String,
    #[arg(long, default_value = "#FFFFFF", help = "Background color (hex)")]
    bg: String,
    #[arg(
        long,
        help = "Gradient stops, comma-separated (e.g. '#ff0000,#0000ff'); overrides --fg"
    )]
    gradient: Option<String>,
    #[arg(long, default_value_t = 45.0, help = "Gradient angle in degrees")]
    gradient_angle: f64,
    #[arg(long, help = "Use a radial gradient instead of a linear one")]
    radial: bool,
    #[arg(long, default_value = "M", help = "Error correction level: L, M, Q, H")]
    ecl: String,
    #[arg(long, help = "Custom PNG/JPG for data modules")]
    module_img: Option<PathBuf>,
    #[arg(long, help = "Custom PNG/JPG for finder patterns")]
    finder_img: Option<PathBuf>,
    #[arg(long, help = "Custom PNG/JPG for alignment patterns")]
    align_img: Option<PathBuf>,
    #[arg(long, help = "Logo image to place in the center (PNG/JPG/SVG)")]
    logo: Option<PathBuf>,
    #[arg(long, help = "Logo width in pixels (auto when omitted)")]
    logo_width: Option<u32>,
    #[arg(long, help = "Logo height in pixels (auto when omitted)")]
    logo_height: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let ecl = match cli.ecl.to_ascii_uppercase().as_str() {
        "L" => Ecl::L,
        "M" => Ecl::M,
        "Q" => Ecl::Q,
        "H" => Ecl::H,
        other => bail!("invalid error correction level '{}', expected L, M, Q or H", other),
    };
    let shape = match ModuleShape::from_name(&cli.shape) {
        Some(shape) => shape,
        None => bail!("unknown shape '{}'", cli.shape),
    };

    let mut builder = QrBuilder::new(&cli.data)
        .size(cli.size)
        .error_correction(ecl)
        .shape(shape)
        .background(&cli.bg);

    builder = match cli.gradient {
        Some(gradient) => {
            let stops: Vec<String> = gradient
                .split(',')
                .map(|stop| stop.trim().to_owned())
                .collect();
            if cli.radial {
                builder.radial_gradient(0.5, 0.5, stops)
            } else {
                builder.linear_gradient(cli.gradient_angle, stops)
            }
        }
        None => builder.foreground(&cli.fg),
    };

    if let Some(path) = cli.module_img {
        builder = builder.module_image(path);
    }
    if let Some(path) = cli.finder_img {
        builder = builder.finder_image(path);
    }
    if let Some(path) = cli.align_img {
        builder = builder.alignment_image(path);
    }
    if let Some(path) = cli.logo {
        builder = builder.logo(path);
    }
    if let Some(pixels) = cli.logo_width {
        builder = builder.logo_width(pixels);
    }
    if let Some(pixels) = cli.logo_height {
        builder = builder.logo_height(pixels);
    }

    builder
        .save_as(&cli.output)
        .with_context(|| format!("cannot generate {}", cli.output.display()))?;

    println!("Generated QR code for {:?} -> {}", cli.data, cli.output.display());
    Ok(())
}
