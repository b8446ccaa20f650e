use clap::Parser;
use std::path::{Path, PathBuf};

use imagelab::imaging::{self, ChannelHistogram};
use imagelab::ui::Figure;
use imagelab::logging;

/// File the (possibly cropped) image is written to.
const OUTPUT_PATH: &str = "edited.png";

/// Report an image's size, plot its histogram, crop it and save the result.
#[derive(Parser)]
#[command(name = "imagelab-inspect", version)]
struct Args {
    /// Path to the image file
    input_path: PathBuf,
    /// Height to crop to, from the top-left corner (0 keeps the full image)
    crop_height: u32,
    /// Width to crop to, from the top-left corner (0 keeps the full image)
    crop_width: u32,
}

fn run(args: &Args) -> imagelab::Result<()> {
    let image = imaging::read_image(&args.input_path)?;

    let (height, width) = imaging::image_size(&image);
    println!("Image Size: {}x{}", height, width);

    let histogram = ChannelHistogram::compute(&image);

    let image = if args.crop_height > 0 && args.crop_width > 0 {
        imaging::crop_top_left(&image, args.crop_height, args.crop_width)?
    } else {
        image
    };

    imaging::save_image(&image, Path::new(OUTPUT_PATH))?;

    Figure::new("Cropped image")
        .with_plot(histogram)
        .with_image(&image)
        .show()
}

fn main() {
    logging::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("An error occurred: {err}");
        std::process::exit(1);
    }
}
