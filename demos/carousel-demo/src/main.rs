//! Folio Carousel Demo
//!
//! Runs an auto-advancing carousel session and prints every page it shows.
//! Halfway through, a simulated drag pauses auto-advance.
//!
//! Usage:
//!   carousel-demo [--pages N] [--interval 2s] [--run 10s] [--linear] [--json]
//!
//! Set `RUST_LOG=folio_runtime=debug` to watch the controller work.

use std::time::Duration;

use folio_core::{Direction, DisplaySink, PageId, StaticProvider};
use folio_runtime::{init_tracing, Carousel, CarouselConfig, TelemetryConfig};
use tokio::time::Instant;
use tracing::info;

/// Sink that prints pages to stdout
struct TerminalSink {
    started: Instant,
}

impl DisplaySink for TerminalSink {
    fn display(&mut self, page: PageId, direction: Option<Direction>) {
        let arrow = match direction {
            None => "  ",
            Some(Direction::Next) => "->",
            Some(Direction::Previous) => "<-",
        };
        println!(
            "[{:>8}] {} page {}",
            humantime::format_duration(Duration::from_millis(
                self.started.elapsed().as_millis() as u64
            )),
            arrow,
            page
        );
    }
}

struct Options {
    pages: u64,
    interval: Duration,
    run_for: Duration,
    cyclic: bool,
    json: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            pages: 4,
            interval: Duration::from_secs(2),
            run_for: Duration::from_secs(10),
            cyclic: true,
            json: false,
        }
    }
}

fn parse_args() -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--pages" => options.pages = next_value(&mut args, &arg)?.parse()?,
            "--interval" => {
                options.interval = humantime::parse_duration(&next_value(&mut args, &arg)?)?
            }
            "--run" => options.run_for = humantime::parse_duration(&next_value(&mut args, &arg)?)?,
            "--linear" => options.cyclic = false,
            "--json" => options.json = true,
            other => return Err(format!("unknown argument: {}", other).into()),
        }
    }

    if options.pages == 0 {
        return Err("--pages must be positive".into());
    }
    Ok(options)
}

fn next_value(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    args.next()
        .ok_or_else(|| format!("{} needs a value", flag).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args()?;

    let mut telemetry = TelemetryConfig::from_env();
    if options.json {
        telemetry = telemetry.json();
    }
    init_tracing(&telemetry)?;

    println!("=== Folio Carousel Demo ===\n");
    println!(
        "{} pages, {}, every {}, for {}\n",
        options.pages,
        if options.cyclic { "cyclic" } else { "linear" },
        humantime::format_duration(options.interval),
        humantime::format_duration(options.run_for),
    );

    let provider = StaticProvider::new((1..=options.pages).map(PageId::new))
        .cyclic(options.cyclic)
        .with_interval(options.interval);
    let sink = TerminalSink {
        started: Instant::now(),
    };
    let carousel = Carousel::spawn(provider, None, sink, CarouselConfig::default())?;

    // Simulated drag in the middle of the run
    let half = options.run_for / 2;
    tokio::time::sleep(half).await;
    println!("           .. drag started, auto-advance paused");
    carousel.interaction_began().await?;
    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        carousel.interaction_changed().await?;
    }
    carousel.interaction_ended().await?;
    println!("           .. drag ended, resuming after the quiet period");

    tokio::time::sleep(options.run_for.saturating_sub(half)).await;

    let snapshot = carousel.query().await?;
    info!(current = ?snapshot.current, timer = ?snapshot.timer, "demo finished");
    carousel.shutdown().await?;

    println!("\nFinal page: {:?}", snapshot.current);
    Ok(())
}
