//! Main entry point for the zipview CLI.
//!
//! This binary drives the viewer pipeline from the command line: fetch an
//! archive from a local path or HTTP URL, list its pages, or navigate to a
//! page and write the rendered surface to a PNG file.

use anyhow::{Context, Result};
use clap::Parser;
use image::ImageFormat;

use zipview::{
    Archive, Cli, HttpSource, LocalFileSource, RenderOutcome, Surface, ViewerSession,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let archive = if cli.is_http_url() {
        let source = HttpSource::new(cli.archive.clone())?;
        Archive::from_source(&source).await?
    } else {
        let source = LocalFileSource::new(&cli.archive);
        Archive::from_source(&source).await?
    };

    if cli.list {
        return list_pages(archive);
    }

    render_page(archive, &cli).await
}

/// Print the qualifying pages of the archive in reading order.
fn list_pages(mut archive: Archive) -> Result<()> {
    archive.open()?;
    let pages = match archive.pages() {
        Some(pages) => pages,
        None => return Ok(()),
    };

    for (i, name) in pages.names().iter().enumerate() {
        println!("{:>4}  {}", i + 1, name);
    }
    println!("{} pages", pages.len());

    archive.close();
    Ok(())
}

/// Navigate to the requested page and write the surface snapshot.
async fn render_page(archive: Archive, cli: &Cli) -> Result<()> {
    let mut session = ViewerSession::new();
    session.attach(Surface::with_viewport(cli.width, cli.height, cli.density));

    let mut outcome = session.open_archive(archive).await?;
    let Some(first) = outcome.take() else {
        anyhow::bail!("archive contains no pages");
    };

    // Step forward until the requested page is the current one
    let target = cli.page.unwrap_or(1).max(1);
    let mut last = first;
    for _ in 1..target {
        if let Some(next) = session.next().await? {
            last = next;
        }
    }

    let shown = session
        .active_archive()
        .and_then(|a| a.pages())
        .and_then(|p| p.current().map(str::to_string))
        .unwrap_or_default();

    match &last {
        RenderOutcome::Rendered { width, height } => {
            println!(
                "page {} ({}x{}), progress {:.0}%",
                shown,
                width,
                height,
                session.progress() * 100.0
            );
        }
        RenderOutcome::Failed { reason } => {
            eprintln!("page {shown} did not decode: {reason}");
        }
    }

    if let Some(output) = &cli.output {
        let surface = session
            .surface()
            .context("no surface attached")?;
        surface
            .backing()
            .save_with_format(output, ImageFormat::Png)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("wrote {}", output.display());
    }

    session.close_active();
    Ok(())
}
