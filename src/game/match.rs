//! Match state and authoritative tick loop

use dashmap::DashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::util::time::{tick_duration, Timer};

use super::combat::{
    CombatSystem, MeleeOutcome, BLOCK_BURST_COLOR, BLOCK_BURST_COUNT, HIT_BURST_COLOR,
    HIT_BURST_COUNT, MELEE_DAMAGE,
};
use super::fighter::{Fighter, FighterKind};
use super::particle::{Particle, ParticleSystem};
use super::projectile::{
    Projectile, ProjectileOutcome, ProjectileSystem, PROJECTILE_BURST_COUNT, PROJECTILE_DAMAGE,
};
use super::snapshot::{GameEvent, SimMsg, WorldSnapshot};
use super::{InputFrame, MatchCommand, PlayerSide};

/// Global game phase; the simulation only advances while `Playing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for the UI layer to start a round
    Menu,
    /// Round in progress
    Playing,
    /// Frozen; all entity state preserved for resume
    Paused,
    /// A winner was determined; waiting for the next round
    GameOver,
}

/// Match state (owned by the match task).
///
/// Every piece of formerly-ambient state - phase, round, scores - is an
/// explicit field here; subsystems only ever see what the tick passes them.
pub struct MatchState {
    pub id: Uuid,
    pub seed: u64,
    pub phase: GamePhase,
    pub tick: u64,
    pub round: u32,
    pub scores: [u32; 2],
    pub winner: Option<PlayerSide>,
    pub kinds: [FighterKind; 2],
    pub fighters: [Fighter; 2],
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    /// Held-key snapshots, refreshed by the input collaborator
    pub inputs: [InputFrame; 2],
    pub rng: ChaCha8Rng,
}

impl MatchState {
    pub fn new(id: Uuid, seed: u64, kinds: [FighterKind; 2]) -> Self {
        Self {
            id,
            seed,
            phase: GamePhase::Menu,
            tick: 0,
            round: 0,
            scores: [0, 0],
            winner: None,
            kinds,
            fighters: [
                Fighter::new(PlayerSide::One, kinds[0]),
                Fighter::new(PlayerSide::Two, kinds[1]),
            ],
            projectiles: Vec::new(),
            particles: Vec::new(),
            inputs: [InputFrame::default(), InputFrame::default()],
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Replace one player's held-key snapshot
    pub fn set_input(&mut self, side: PlayerSide, frame: InputFrame) {
        self.inputs[side.index()] = frame;
    }

    /// Discard all round entities and begin a fresh round
    pub fn start_round(&mut self) {
        self.fighters = [
            Fighter::new(PlayerSide::One, self.kinds[0]),
            Fighter::new(PlayerSide::Two, self.kinds[1]),
        ];
        self.projectiles.clear();
        self.particles.clear();
        self.winner = None;
        self.round += 1;
        self.phase = GamePhase::Playing;
    }

    /// Run a single simulation tick in the fixed order: fighters
    /// (timers, energy, input, physics), melee, projectiles, particles.
    pub fn run_tick(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }

        self.tick += 1;
        let mut events = Vec::new();

        // 1. Per-fighter update; specials spawn projectiles
        let inputs = self.inputs;
        for i in 0..2 {
            if let Some(kind) = self.fighters[i].update(&inputs[i]) {
                let projectile = Projectile::spawn(&self.fighters[i], kind);
                events.push(GameEvent::ProjectileSpawned {
                    owner: self.fighters[i].side,
                    kind,
                });
                self.projectiles.push(projectile);
            }
        }

        // 2. Melee exchange
        self.resolve_melee(&mut events);

        // 3. Projectiles; hits stop resolving once a winner is set
        let outcomes = ProjectileSystem::advance(
            &mut self.projectiles,
            &mut self.fighters,
            self.winner.is_none(),
        );
        for outcome in outcomes {
            match outcome {
                ProjectileOutcome::Struck {
                    target,
                    kind,
                    x,
                    y,
                    killed,
                } => {
                    ParticleSystem::spawn_burst(
                        &mut self.particles,
                        &mut self.rng,
                        x,
                        y,
                        kind.color(),
                        PROJECTILE_BURST_COUNT,
                    );
                    events.push(GameEvent::ProjectileHit {
                        target,
                        kind,
                        damage: PROJECTILE_DAMAGE,
                    });
                    if killed {
                        self.declare_winner(target.opponent(), &mut events);
                    }
                }
                ProjectileOutcome::Blocked { target, kind } => {
                    events.push(GameEvent::ProjectileBlocked { target, kind });
                }
            }
        }

        // 4. Particles
        ParticleSystem::advance(&mut self.particles);

        events
    }

    /// Resolve due melee strikes, player one first. Stops once a winner
    /// is set: a killing blow ends all combat resolution for the round.
    fn resolve_melee(&mut self, events: &mut Vec<GameEvent>) {
        for side in [PlayerSide::One, PlayerSide::Two] {
            if self.winner.is_some() {
                break;
            }

            let (outcome, defender_center, combo) = {
                let [one, two] = &mut self.fighters;
                let (attacker, defender) = match side {
                    PlayerSide::One => (one, two),
                    PlayerSide::Two => (two, one),
                };
                let outcome = CombatSystem::resolve_melee(attacker, defender);
                (outcome, defender.center(), attacker.combo)
            };

            let Some(outcome) = outcome else { continue };
            let (cx, cy) = defender_center;

            match outcome {
                MeleeOutcome::Whiff => {}
                MeleeOutcome::Blocked => {
                    ParticleSystem::spawn_burst(
                        &mut self.particles,
                        &mut self.rng,
                        cx,
                        cy,
                        BLOCK_BURST_COLOR,
                        BLOCK_BURST_COUNT,
                    );
                    events.push(GameEvent::MeleeBlocked {
                        attacker: side,
                        target: side.opponent(),
                    });
                }
                MeleeOutcome::Hit { killed } => {
                    ParticleSystem::spawn_burst(
                        &mut self.particles,
                        &mut self.rng,
                        cx,
                        cy,
                        HIT_BURST_COLOR,
                        HIT_BURST_COUNT,
                    );
                    events.push(GameEvent::MeleeHit {
                        attacker: side,
                        target: side.opponent(),
                        damage: MELEE_DAMAGE,
                        combo,
                    });
                    if killed {
                        self.declare_winner(side, events);
                    }
                }
            }
        }
    }

    fn declare_winner(&mut self, side: PlayerSide, events: &mut Vec<GameEvent>) {
        if self.winner.is_some() {
            return;
        }
        self.winner = Some(side);
        self.scores[side.index()] += 1;
        self.phase = GamePhase::GameOver;

        let name = self.fighters[side.index()].name;
        info!(
            match_id = %self.id,
            round = self.round,
            winner = %name,
            score_one = self.scores[0],
            score_two = self.scores[1],
            "Round over"
        );

        events.push(GameEvent::RoundEnd {
            winner: side,
            winner_name: name.to_string(),
            scores: self.scores,
        });
    }
}

/// Handle to a running match
#[derive(Clone)]
pub struct MatchHandle {
    pub id: Uuid,
    pub cmd_tx: mpsc::Sender<MatchCommand>,
    pub update_tx: broadcast::Sender<SimMsg>,
}

impl MatchHandle {
    /// Subscribe to snapshots and round outcomes
    pub fn subscribe(&self) -> broadcast::Receiver<SimMsg> {
        self.update_tx.subscribe()
    }
}

/// Registry of all active matches
pub struct MatchRegistry {
    matches: DashMap<Uuid, MatchHandle>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self {
            matches: DashMap::new(),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<MatchHandle> {
        self.matches.get(id).map(|m| m.value().clone())
    }

    pub fn insert(&self, handle: MatchHandle) {
        self.matches.insert(handle.id, handle);
    }

    pub fn remove(&self, id: &Uuid) -> Option<MatchHandle> {
        self.matches.remove(id).map(|(_, h)| h)
    }

    pub fn active_matches(&self) -> usize {
        self.matches.len()
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The authoritative match task: drains commands, ticks the simulation at
/// a fixed rate, and broadcasts snapshots to subscribers
pub struct GameMatch {
    state: MatchState,
    tick_rate: u32,
    cmd_rx: mpsc::Receiver<MatchCommand>,
    update_tx: broadcast::Sender<SimMsg>,
}

impl GameMatch {
    pub fn new(
        id: Uuid,
        seed: u64,
        tick_rate: u32,
        kinds: [FighterKind; 2],
    ) -> (Self, MatchHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(256);
        let (update_tx, _) = broadcast::channel(256);

        let handle = MatchHandle {
            id,
            cmd_tx,
            update_tx: update_tx.clone(),
        };

        let game_match = Self {
            state: MatchState::new(id, seed, kinds),
            tick_rate,
            cmd_rx,
            update_tx,
        };

        (game_match, handle)
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Run the fixed-rate tick loop until shutdown
    pub async fn run(mut self) {
        info!(match_id = %self.state.id, tick_rate = self.tick_rate, "Match task started");

        let budget_micros = tick_duration(self.tick_rate).as_micros() as u64;
        let mut ticker = interval(tick_duration(self.tick_rate));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if !self.process_commands() {
                break;
            }

            if self.state.phase != GamePhase::Playing {
                continue;
            }

            let timer = Timer::new();
            let events = self.state.run_tick();

            let round_over = events.iter().find_map(|e| match e {
                GameEvent::RoundEnd {
                    winner,
                    winner_name,
                    scores,
                } => Some((*winner, winner_name.clone(), *scores)),
                _ => None,
            });

            let snapshot = WorldSnapshot::capture(&self.state, events);
            let _ = self.update_tx.send(SimMsg::Snapshot(snapshot));

            if let Some((winner, winner_name, scores)) = round_over {
                let _ = self.update_tx.send(SimMsg::RoundOver {
                    round: self.state.round,
                    winner,
                    winner_name,
                    scores,
                });
            }

            if timer.elapsed_micros() > budget_micros {
                warn!(
                    match_id = %self.state.id,
                    tick = self.state.tick,
                    elapsed_micros = timer.elapsed_micros(),
                    "Tick overran its budget"
                );
            }
        }

        info!(match_id = %self.state.id, "Match task stopped");
    }

    /// Drain pending commands; returns false once the match should stop
    fn process_commands(&mut self) -> bool {
        loop {
            match self.cmd_rx.try_recv() {
                Ok(MatchCommand::Input { side, frame }) => {
                    self.state.set_input(side, frame);
                }
                Ok(MatchCommand::Start) => match self.state.phase {
                    GamePhase::Menu | GamePhase::GameOver => {
                        self.state.start_round();
                        info!(
                            match_id = %self.state.id,
                            round = self.state.round,
                            "Round started"
                        );
                    }
                    phase => {
                        warn!(match_id = %self.state.id, ?phase, "Start ignored");
                    }
                },
                Ok(MatchCommand::Pause) => {
                    if self.state.phase == GamePhase::Playing {
                        self.state.phase = GamePhase::Paused;
                        info!(match_id = %self.state.id, tick = self.state.tick, "Paused");
                    } else {
                        warn!(match_id = %self.state.id, "Pause ignored");
                    }
                }
                Ok(MatchCommand::Resume) => {
                    if self.state.phase == GamePhase::Paused {
                        self.state.phase = GamePhase::Playing;
                        info!(match_id = %self.state.id, tick = self.state.tick, "Resumed");
                    } else {
                        warn!(match_id = %self.state.id, "Resume ignored");
                    }
                }
                Ok(MatchCommand::Shutdown) => return false,
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }
}
