use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::{Builder, Target};
use log::LevelFilter;
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};

use reelshelf_carousel::carousel::{
    Carousel, CarouselHost, ControlVisibility, Direction, PositionChange,
    Sequence,
};
use reelshelf_carousel::{CarouselSettings, driver};
use reelshelf_model::{RecommendationItem, Recommendations};

/// Drive the recommendation carousel without a UI and log what a host
/// would render.
#[derive(Debug, Parser)]
#[command(name = "reelshelf-carousel", version)]
struct Args {
    /// Recommendations JSON as returned by the backend
    /// (`{"message": .., "recommendations": [..]}`).
    #[arg(long)]
    recommendations: Option<PathBuf>,

    /// Number of generated items when no recommendations file is given.
    #[arg(long, default_value_t = 12)]
    demo_items: usize,

    #[arg(long, default_value_t = 800.0)]
    viewport: f32,

    /// Settings file; defaults to the user config dir plus environment.
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long, default_value_t = 3000)]
    duration_ms: u64,

    #[arg(long, default_value_t = 500)]
    report_ms: u64,

    /// Pages to issue, e.g. `--pages right,right,left`.
    #[arg(long, value_delimiter = ',')]
    pages: Vec<PageArg>,

    /// Delay before the first page.
    #[arg(long, default_value_t = 1000)]
    page_after_ms: u64,

    /// Print snapshots as JSON lines instead of log lines.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PageArg {
    Left,
    Right,
}

impl From<PageArg> for Direction {
    fn from(value: PageArg) -> Self {
        match value {
            PageArg::Left => Direction::Left,
            PageArg::Right => Direction::Right,
        }
    }
}

#[derive(Debug)]
enum Step {
    Report,
    Page(Direction),
}

struct LoggingHost;

impl CarouselHost for LoggingHost {
    fn position_changed(&mut self, change: PositionChange) {
        if let Some(teleport) = change.teleport {
            log::info!(
                "teleport {:+} -> {:.1} ({:?})",
                teleport.shift,
                change.offset,
                change.cause
            );
        }
    }

    fn controls_changed(&mut self, controls: ControlVisibility) {
        log::info!(
            "controls: left={} right={}",
            controls.can_page_left,
            controls.can_page_right
        );
    }
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("reelshelf_carousel", LevelFilter::Debug)
        .init();
}

fn demo_items(count: usize) -> Vec<RecommendationItem> {
    const TITLES: [(&str, u16, &str); 8] = [
        ("Paprika", 2006, "Animation"),
        ("Arrival", 2016, "Sci-Fi"),
        ("Heat", 1995, "Crime"),
        ("The Grand Budapest Hotel", 2014, "Comedy"),
        ("Spirited Away", 2001, "Animation"),
        ("Alien", 1979, "Horror"),
        ("Amelie", 2001, "Romance"),
        ("Ronin", 1998, "Action"),
    ];
    (0..count)
        .map(|i| {
            let (title, year, genre) = TITLES[i % TITLES.len()];
            RecommendationItem::new(i as u64 + 1, title)
                .with_year(year)
                .with_genre(genre)
                .with_reason("Random pick from the catalog")
        })
        .collect()
}

fn load_items(args: &Args) -> Result<Vec<RecommendationItem>> {
    let Some(path) = &args.recommendations else {
        return Ok(demo_items(args.demo_items));
    };
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let recommendations: Recommendations = serde_json::from_str(&body)
        .with_context(|| format!("parsing {}", path.display()))?;
    if recommendations.is_empty() {
        log::warn!("No recommendations in {}; carousel stays empty", path.display());
    }
    Ok(recommendations.into_valid_items())
}

fn plan(args: &Args, settings: &CarouselSettings) -> Vec<(u64, Step)> {
    let mut steps = Vec::new();
    let report_every = args.report_ms.max(1);
    let mut at = report_every;
    while at <= args.duration_ms {
        steps.push((at, Step::Report));
        at += report_every;
    }
    let spacing = settings.transition_ms + 50;
    for (index, page) in args.pages.iter().enumerate() {
        let at = args.page_after_ms + index as u64 * spacing;
        steps.push((at, Step::Page((*page).into())));
    }
    steps.sort_by_key(|(at, _)| *at);
    steps
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => CarouselSettings::from_path(path)
            .with_context(|| format!("loading settings {}", path.display()))?,
        None => CarouselSettings::load().context("loading carousel settings")?,
    };

    let items = load_items(&args)?;
    for item in &items {
        log::debug!(
            "[{}] {} {}",
            item.poster_initials(),
            item.title,
            item.caption().unwrap_or_default()
        );
    }
    let titles: Vec<String> =
        items.iter().map(|item| item.title.clone()).collect();
    log::info!(
        "{} items, stride {}, viewport {}",
        items.len(),
        settings.stride,
        args.viewport
    );

    let (sequence_tx, sequence_rx) = watch::channel(Sequence::new(items));
    let handle =
        driver::spawn(Carousel::new(settings, LoggingHost), sequence_rx);
    handle.set_viewport_width(args.viewport)?;

    let start = Instant::now();
    for (at, step) in plan(&args, &settings) {
        sleep_until(start + Duration::from_millis(at)).await;
        match step {
            Step::Page(direction) => {
                log::info!("t={at}ms page {direction}");
                handle.page(direction)?;
            }
            Step::Report => {
                let snapshot = handle.snapshot();
                if args.json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                    continue;
                }
                let on_screen: Vec<&str> = snapshot
                    .visible
                    .iter()
                    .filter(|slot| {
                        slot.x > -settings.stride && slot.x < args.viewport
                    })
                    .filter_map(|slot| titles.get(slot.source_index))
                    .map(String::as_str)
                    .collect();
                log::info!(
                    "t={at}ms offset={:.1} mode={:?} showing {:?}",
                    snapshot.offset,
                    snapshot.mode,
                    on_screen
                );
            }
        }
    }

    drop(sequence_tx);
    handle.shutdown().await?;
    Ok(())
}
