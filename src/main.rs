// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Initialize logging (stderr)
// 3. Crawl the site
// 4. Print the report as text or JSON
// 5. Exit with proper code (0 = all good, 2 = broken links, 1 = fatal error)
// =============================================================================

mod checker; // src/checker/ - fetching pages and extracting links
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - crawl options and defaults
mod crawl; // src/crawl/ - the breadth-first crawl
mod logging; // src/logging.rs - tracing setup

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use crawl::CrawlReport;

/// Exit code for errors that stop the crawl before it starts
const EXIT_FATAL: i32 = 1;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FATAL
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let options = cli.crawl_options();

    if !cli.json {
        println!("Link checker starting at {}", cli.root_url);
    }

    let report = crawl::crawl(&cli.root_url, options)
        .await
        .with_context(|| format!("could not crawl {}", cli.root_url))?;

    print_report(&report, cli.json)?;

    Ok(report.exit_code())
}

// Prints the report either as a text summary or JSON
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_summary(report);
    }
    Ok(())
}

fn print_summary(report: &CrawlReport) {
    println!();
    println!("Crawled pages: {}", report.visited.len());
    if report.mode.checks_external() {
        println!("External links checked: {}", report.external.len());
    }
    println!("Broken links found: {}", report.broken.len());

    if report.has_broken_links() {
        for broken in &report.broken {
            println!("- {}", broken);
        }
    } else {
        println!("No broken links found");
    }
}
