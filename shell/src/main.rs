mod pilot;
mod presenter;
mod shell_config;
mod sound;

use clap::Parser;

use engine::highscore::HighScoreStore;
use engine::session::{GameSession, run_game_loop};
use engine::{GameEngine, SessionRng, log, logger};

use pilot::AutoPilot;
use presenter::ShellPresenter;

#[derive(Parser)]
#[command(name = "snake_venture", about = "Headless Snake Venture demo run")]
struct Args {
    /// Path to the shell configuration file
    #[arg(long, default_value = shell_config::CONFIG_FILE)]
    config: String,

    /// Session RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the demo after this many ticks if the snake is still alive
    #[arg(long, default_value_t = 2000)]
    max_ticks: u64,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Shell".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = shell_config::config_manager(&args.config).load()?;

    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!("Starting Snake Venture (seed {})", rng.seed());

    let store = HighScoreStore::from_yaml_file(&config.high_score_file);
    let engine = GameEngine::with_store(config.game.clone(), rng, store);
    let session = GameSession::new(engine);

    let summary = run_game_loop(
        &session,
        ShellPresenter::new(config.muted),
        AutoPilot::new(),
        Some(args.max_ticks),
    )
    .await;

    log!(
        "Run finished after {} ticks: score {}, best {}",
        summary.ticks,
        summary.score,
        summary.high_score
    );

    Ok(())
}
