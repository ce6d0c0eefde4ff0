//! Duel Engine demo driver
//!
//! Runs a single headless match: player one chases and attacks under a
//! small scripted policy, player two stands idle. Snapshots and the round
//! outcome are consumed the same way a rendering/UI collaborator would.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use duel_engine::config::Config;
use duel_engine::game::combat::MELEE_REACH;
use duel_engine::game::fighter::FighterKind;
use duel_engine::game::snapshot::{SimMsg, WorldSnapshot};
use duel_engine::game::{GameMatch, InputFrame, MatchCommand, MatchRegistry, PlayerSide};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    info!("Starting duel engine demo");

    let seed = config.match_seed.unwrap_or_else(rand::random);
    let registry = Arc::new(MatchRegistry::new());

    let (game, handle) = GameMatch::new(
        Uuid::new_v4(),
        seed,
        config.tick_rate,
        [FighterKind::Blaze, FighterKind::Frost],
    );
    registry.insert(handle.clone());

    info!(
        match_id = %handle.id,
        seed,
        tick_rate = config.tick_rate,
        "Match registered"
    );

    let task = tokio::spawn(game.run());
    let mut updates = handle.subscribe();

    handle.cmd_tx.send(MatchCommand::Start).await?;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping match");
                break;
            }
            update = updates.recv() => match update {
                Ok(SimMsg::Snapshot(snapshot)) => {
                    if snapshot.tick % 60 == 0 {
                        debug!(
                            tick = snapshot.tick,
                            p1_health = snapshot.fighters[0].health,
                            p2_health = snapshot.fighters[1].health,
                            particles = snapshot.particles.len(),
                            "Snapshot"
                        );
                    }
                    let frame = chase_and_attack(&snapshot);
                    handle
                        .cmd_tx
                        .send(MatchCommand::Input {
                            side: PlayerSide::One,
                            frame,
                        })
                        .await?;
                }
                Ok(SimMsg::RoundOver { round, winner_name, scores, .. }) => {
                    info!(
                        round,
                        winner = %winner_name,
                        score_one = scores[0],
                        score_two = scores[1],
                        "Round over"
                    );
                    break;
                }
                Err(RecvError::Lagged(missed)) => {
                    debug!(missed, "Skipped stale snapshots");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    handle.cmd_tx.send(MatchCommand::Shutdown).await.ok();
    task.await?;
    registry.remove(&handle.id);

    info!("Demo complete");
    Ok(())
}

/// Walk toward the opponent, attack once inside melee reach
fn chase_and_attack(snapshot: &WorldSnapshot) -> InputFrame {
    let me = &snapshot.fighters[0];
    let foe = &snapshot.fighters[1];

    let mut frame = InputFrame::default();
    if foe.x > me.x + me.width + MELEE_REACH {
        frame.move_right = true;
    } else if foe.x + foe.width + MELEE_REACH < me.x {
        frame.move_left = true;
    } else {
        frame.attack = true;
    }
    frame
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
