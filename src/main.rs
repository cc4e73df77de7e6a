//! Mimic Web demo driver
//!
//! Launches a browser, attaches a simulated human to a page, and runs a
//! short explore / scroll / read session against it.

use anyhow::Context;
use chromiumoxide::browser::{Browser, BrowserConfig};
use clap::Parser;
use futures::StreamExt;
use mimic_web::driver::CdpDriver;
use mimic_web::simulator::SimulatorBuilder;
use mimic_web::{BehaviorProfile, ReadingSpeed, ScrollDirection, StatsBundle, TypingSpeed};
use tracing::{debug, info, warn};

/// Mimic Web session runner
#[derive(Parser, Debug)]
#[command(name = "mimic-web")]
#[command(version)]
#[command(about = "Human-paced browser interaction session")]
struct Args {
    /// Page to open
    #[arg(long, default_value = "https://example.com")]
    url: String,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a JSON statistics bundle overriding the built-ins
    #[arg(long)]
    stats: Option<std::path::PathBuf>,

    /// Typing proficiency: slow, average, fast, expert
    #[arg(long, default_value = "average")]
    typing_speed: String,

    /// Per-character typo probability
    #[arg(long, default_value = "0.02")]
    error_rate: f64,

    /// Path to Chrome/Chromium executable
    #[arg(long)]
    chrome_path: Option<String>,

    /// Run in headless mode
    #[arg(long, default_value = "true")]
    headless: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let stats = match &args.stats {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading stats bundle {}", path.display()))?;
            serde_json::from_str::<StatsBundle>(&raw).context("parsing stats bundle")?
        }
        None => StatsBundle::default(),
    };

    let typing_speed = match args.typing_speed.as_str() {
        "slow" => TypingSpeed::Slow,
        "average" => TypingSpeed::Average,
        "fast" => TypingSpeed::Fast,
        "expert" => TypingSpeed::Expert,
        other => anyhow::bail!("unknown typing speed: {other}"),
    };
    let profile = BehaviorProfile::new(typing_speed, 1.0, ReadingSpeed::Average, args.error_rate)
        .context("building behavior profile")?;

    let mut config = BrowserConfig::builder();
    if !args.headless {
        config = config.with_head();
    }
    if let Some(ref path) = args.chrome_path {
        config = config.chrome_executable(path);
    }
    let config = config
        .build()
        .map_err(|e| anyhow::anyhow!("browser config: {e}"))?;

    info!(url = %args.url, "launching browser");
    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .context("launching browser")?;
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                warn!("browser handler event error");
                break;
            }
        }
        debug!("browser handler finished");
    });

    let page = browser
        .new_page(args.url.as_str())
        .await
        .context("opening page")?;
    page.wait_for_navigation()
        .await
        .context("waiting for navigation")?;

    let mut builder = SimulatorBuilder::new()
        .stats(stats)
        .profile(profile);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let mut sim = builder.build(CdpDriver::new(page));
    info!(session = %sim.session_id(), "session attached");

    // A short believable visit: look around, scroll, settle in to read
    let visited = sim.explore().await?;
    info!(visited, "explored interactive elements");
    let scrolled = sim.scroll(ScrollDirection::Down, None).await?;
    info!(scrolled, "scrolled");
    let spent = sim.read(None).await?;
    info!(spent_ms = spent.as_millis() as u64, "finished reading");

    browser.close().await.context("closing browser")?;
    handler_task.abort();
    Ok(())
}
