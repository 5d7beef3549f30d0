pub mod config;
pub mod data;
pub mod eval;
pub mod evolve;
pub mod graph;
pub mod mutate;
pub mod output;
pub mod pool;
pub mod quality;
pub mod trial;

/// dimensional analysis types
pub type Target = f64;
pub type Probability = f64;

/// fitness seed so ordering is stable at population birth (§4.5)
pub const FITNESS_SEED_EPS: f64 = 1e-5;

/// initialize logging: a colored terminal logger plus a per-run debug
/// log file under `logs/`, the same combined-logger shape as the
/// teacher's `robopoker::init()`.
#[cfg(feature = "cli")]
pub fn init_logging() -> anyhow::Result<()> {
    use anyhow::Context;

    std::fs::create_dir_all("logs").context("create logs directory")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .context("system clock before unix epoch")?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).context("create log file")?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).context("initialize logger")?;
    Ok(())
}

/// progress bar for long-running trial loops
#[cfg(feature = "cli")]
pub fn progress(n: u64) -> indicatif::ProgressBar {
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan} {pos}/{len}";
    let style = indicatif::ProgressStyle::with_template(style).expect("valid progress template");
    let bar = indicatif::ProgressBar::new(n);
    bar.set_style(style);
    bar
}
