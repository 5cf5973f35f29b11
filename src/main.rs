use clap::Parser;
use site_sift::config::ScraperConfig;
use site_sift::crawler::Scraper;
use site_sift::render::WebDriverRenderer;
use site_sift::results;
use std::process::ExitCode;
use std::time::Duration;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ScraperConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ScraperConfig::default(),
    };

    ::log::info!("Starting crawl of {} (depth {})", args.url, args.depth);
    println!("Note: crawling requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default {}",
        config.webdriver_url
    );

    let renderer = WebDriverRenderer::new(
        &config.webdriver_url,
        Duration::from_secs(config.page_load_timeout_secs),
        Duration::from_secs(config.settle_delay_secs),
    );

    let mut scraper = match Scraper::new(&config, renderer) {
        Ok(scraper) => scraper,
        Err(e) => {
            ::log::error!("Failed to initialize scraper: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start_time = std::time::Instant::now();
    let result = scraper
        .scrape(&args.url, args.prompt.as_deref(), args.depth)
        .await;
    scraper.renderer_mut().shutdown().await;

    let pages = match result {
        Ok(pages) => pages,
        Err(e) => {
            ::log::error!("Crawl failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Crawl complete - {} pages in {:.2} seconds",
        pages.len(),
        start_time.elapsed().as_secs_f64()
    );

    match &args.output {
        Some(path) => {
            if let Err(e) = results::save_results(&pages, path) {
                ::log::error!("Failed to save results to {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            println!("Results saved to {}", path.display());
        }
        None => match serde_json::to_string_pretty(&pages) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                ::log::error!("Failed to serialize results: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
