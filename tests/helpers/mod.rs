//! Test helpers: a scripted presenter and engine builders with fixed stats.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use turn_duel::event_bus::RecordingHandler;
use turn_duel::{
    AnimationOutcome, CombatantId, DuelEvent, EngineConfig, Presenter, RawStats, StaticStats,
    TurnEngine,
};

/// Lets a test hold an animation open until it says so.
#[derive(Default)]
pub struct Gate {
    /// Notified when an animation begins.
    pub started: Notify,
    /// Notify to let the animation finish.
    pub release: Notify,
}

/// Presenter returning scripted outcomes and remembering who attacked.
pub struct ScriptedPresenter {
    outcomes: Mutex<VecDeque<AnimationOutcome>>,
    default_outcome: AnimationOutcome,
    calls: Arc<Mutex<Vec<CombatantId>>>,
    gate: Option<Arc<Gate>>,
}

impl ScriptedPresenter {
    pub fn instant() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            default_outcome: AnimationOutcome::Played(Duration::ZERO),
            calls: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    pub fn always(outcome: AnimationOutcome) -> Self {
        Self {
            default_outcome: outcome,
            ..Self::instant()
        }
    }

    pub fn with_script(mut self, outcomes: Vec<AnimationOutcome>) -> Self {
        self.outcomes = Mutex::new(outcomes.into());
        self
    }

    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<CombatantId>>> {
        self.calls.clone()
    }
}

impl Presenter for ScriptedPresenter {
    async fn play_attack_animation(&self, attacker: CombatantId) -> AnimationOutcome {
        self.calls.lock().unwrap().push(attacker);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_outcome);

        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        outcome
    }
}

/// Engine with typed stats and a forced first attacker.
pub fn engine_with(
    presenter: ScriptedPresenter,
    one: (u32, u32),
    two: (u32, u32),
    first: CombatantId,
) -> TurnEngine<ScriptedPresenter> {
    TurnEngine::builder()
        .presenter(presenter)
        .stats_source(StaticStats::typed(one, two))
        .first(first)
        .build()
        .expect("engine should build")
}

/// Engine built from textual stats.
pub fn engine_from_raw(
    presenter: ScriptedPresenter,
    one: RawStats,
    two: RawStats,
    first: CombatantId,
    config: EngineConfig,
) -> TurnEngine<ScriptedPresenter> {
    TurnEngine::builder()
        .presenter(presenter)
        .stats_source(StaticStats::new(one, two))
        .config(config)
        .first(first)
        .build()
        .expect("engine should build")
}

/// Subscribe a recorder and return the shared event list.
pub fn record_events(engine: &TurnEngine<ScriptedPresenter>) -> Arc<Mutex<Vec<DuelEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    engine.subscribe(Box::new(RecordingHandler::new(events.clone())));
    events
}

pub fn hp(engine: &TurnEngine<ScriptedPresenter>, id: CombatantId) -> Option<u32> {
    engine.combatant(id).hit_points().value()
}
