use clap::Parser;
use std::path::{Path, PathBuf};

use imagelab::annotation::{write_annotation_csv, AnnotationIterator, AnnotationOptions};
use imagelab::crawler::{Crawler, CrawlerConfig};
use imagelab::logging;

/// Download images for a keyword and build an annotation file for them.
#[derive(Parser)]
#[command(name = "imagelab-crawl", version)]
struct Args {
    /// Keyword to search images for
    keyword: String,
    /// Number of images to download (50 to 1000 is typical)
    num_images: usize,
    /// Folder the images are saved into
    download_path: PathBuf,
    /// Annotation file to write, in CSV format
    csv_path: PathBuf,
}

/// Print every image path listed in the annotation file.
fn display_images(csv_path: &Path) -> imagelab::Result<()> {
    for path in AnnotationIterator::open(csv_path, &AnnotationOptions::default())? {
        println!("{}", path?.display());
    }
    Ok(())
}

fn run(args: &Args) -> imagelab::Result<()> {
    let crawler = Crawler::google(CrawlerConfig::new(&args.download_path))?;
    let summary = crawler.crawl(&args.keyword, args.num_images)?;
    if summary.downloaded < args.num_images {
        log::warn!(
            "Only {} of {} requested images were downloaded",
            summary.downloaded,
            args.num_images
        );
    }

    write_annotation_csv(&args.download_path, &args.csv_path)?;
    display_images(&args.csv_path)
}

fn main() {
    logging::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("An error occurred: {err}");
        std::process::exit(1);
    }
}
