use anyhow::{Context, Result};
use std::time::Duration;
use turn_duel::{
    handle_error, logging, AnimationOutcome, CombatantId, DuelConfig, Presenter, TurnEngine,
    TurnOutcome,
};

/// Upper bound on turns so a match with unusable stats still terminates.
const MAX_TURNS: usize = 1_000;

/// Headless presenter: "plays" a clip by waiting its length.
struct ConsolePresenter {
    clip_length: Duration,
}

impl Presenter for ConsolePresenter {
    async fn play_attack_animation(&self, attacker: CombatantId) -> AnimationOutcome {
        log::debug!("Player {} swings", attacker);
        tokio::time::sleep(self.clip_length).await;
        AnimationOutcome::Played(self.clip_length)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => DuelConfig::load(&path)
            .map_err(|e| anyhow::anyhow!(handle_error(&e)))
            .with_context(|| format!("Failed to load config {}", path))?,
        None => {
            log::info!("No config given, using default stats");
            DuelConfig::default()
        }
    };

    let engine = TurnEngine::builder()
        .presenter(ConsolePresenter {
            clip_length: Duration::from_millis(200),
        })
        .stats_source(config.stats_source())
        .config(config.engine.clone())
        .build()
        .map_err(|e| anyhow::anyhow!(handle_error(&e)))
        .context("Failed to start the duel")?;

    for _ in 0..MAX_TURNS {
        match engine.request_turn().await {
            Ok(TurnOutcome::MatchEnded { .. }) => break,
            Ok(TurnOutcome::TurnChanged { .. }) => {}
            Err(e) if e.is_silent() => {}
            Err(e) => {
                eprintln!("{}", handle_error(&e));
                break;
            }
        }
    }

    let snapshot = engine.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    if let Some(winner) = snapshot.winner {
        println!("🏆 Player {} WINS!", winner);
    }

    Ok(())
}
