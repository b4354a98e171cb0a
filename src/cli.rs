use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zipview")]
#[command(version)]
#[command(about = "A page-image archive viewer with HTTP URL support", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipview book.cbz -l                      list the qualifying pages in book.cbz\n  \
  zipview book.cbz -p 3 -o page3.png       render page 3 to page3.png\n  \
  zipview https://example.com/book.cbz -o cover.png   render the first page of a remote archive")]
pub struct Cli {
    /// Archive path or HTTP URL
    #[arg(value_name = "ARCHIVE")]
    pub archive: String,

    /// List qualifying pages (in reading order)
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Page to render, 1-based (default: first page)
    #[arg(short = 'p', long, value_name = "N")]
    pub page: Option<usize>,

    /// Write the rendered surface to this PNG file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Logical viewport width
    #[arg(long, default_value_t = 800.0, value_name = "PX")]
    pub width: f64,

    /// Logical viewport height
    #[arg(long, default_value_t = 1200.0, value_name = "PX")]
    pub height: f64,

    /// Device pixel density factor
    #[arg(long, default_value_t = 1.0, value_name = "FACTOR")]
    pub density: f64,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.archive.starts_with("http://") || self.archive.starts_with("https://")
    }
}
