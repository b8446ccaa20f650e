use clap::Parser;
use std::path::PathBuf;

use imagelab::logging;
use imagelab::profile::ProfileTable;
use imagelab::ui::Figure;

/// Profile the images listed in an annotation file.
#[derive(Parser)]
#[command(name = "imagelab-profile", version)]
struct Args {
    /// Path to the annotation file in CSV format
    csv_path: PathBuf,
    /// Maximum width (integer)
    max_width: u32,
    /// Maximum height (integer)
    max_height: u32,
}

fn run(args: &Args) -> imagelab::Result<()> {
    let table = ProfileTable::from_csv(&args.csv_path)?;
    println!("{}", table.describe());

    println!("Source DataFrame:");
    println!("{table}\n");

    let mut filtered = table.filter_by_max(args.max_width, args.max_height);
    println!("Filtered DataFrame:");
    println!("{filtered}\n");

    filtered.add_area_column();
    let sorted = filtered.sort_by_area()?;
    println!("Sorted DataFrame by area:");
    println!("{sorted}");

    let histogram = sorted.area_histogram()?;
    if histogram.is_empty() {
        log::warn!("No images within {}x{}; nothing to plot", args.max_width, args.max_height);
        return Ok(());
    }
    Figure::new("Histogram by area").with_plot(histogram).show()
}

fn main() {
    logging::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("An error occurred: {err}");
        std::process::exit(1);
    }
}
