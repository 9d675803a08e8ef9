//! Two-player turn state machine.
//!
//! A [`TurnEngine`] owns both combatants and alternates attacks between them:
//!
//! ```text
//! AwaitingInput --request_turn--> Resolving --(defender alive)--> AwaitingInput
//!                                           \--(defender at 0)--> GameOver
//! ```
//!
//! Resolving awaits the presenter's attack animation, then applies damage.
//! Requests that arrive while a turn is resolving are dropped, not queued.

use crate::collaborators::{AnimationOutcome, Presenter, StatsSource};
use crate::config::EngineConfig;
use crate::event_bus::{DuelEvent, EventBus, EventHandler};
use crate::rng::DuelRng;
use combat::{Combat, Combatant, CombatantId, StatKind, StatValue};
use error::DuelError;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the next turn request.
    AwaitingInput,
    /// An attack animation is playing; new requests are ignored.
    Resolving,
    /// Someone won. Terminal.
    GameOver,
}

/// Result of a turn that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    TurnChanged { active: CombatantId },
    MatchEnded { winner: CombatantId },
}

#[derive(Debug, Clone)]
struct MatchState {
    combatants: [Combatant; 2],
    active: CombatantId,
    phase: Phase,
    winner: Option<CombatantId>,
}

/// Read-only copy of the match handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub combatants: [Combatant; 2],
    pub active: CombatantId,
    pub phase: Phase,
    pub winner: Option<CombatantId>,
}

impl MatchSnapshot {
    pub fn combatant(&self, id: CombatantId) -> &Combatant {
        &self.combatants[id.index()]
    }
}

impl From<&MatchState> for MatchSnapshot {
    fn from(state: &MatchState) -> Self {
        Self {
            combatants: state.combatants.clone(),
            active: state.active,
            phase: state.phase,
            winner: state.winner,
        }
    }
}

/// Builder wiring collaborators into a [`TurnEngine`].
pub struct TurnEngineBuilder<P> {
    presenter: Option<P>,
    stats: Option<Box<dyn StatsSource>>,
    config: EngineConfig,
    first: Option<CombatantId>,
    handlers: Vec<Box<dyn EventHandler>>,
}

impl<P: Presenter> TurnEngineBuilder<P> {
    fn new() -> Self {
        Self {
            presenter: None,
            stats: None,
            config: EngineConfig::default(),
            first: None,
            handlers: Vec::new(),
        }
    }

    pub fn presenter(mut self, presenter: P) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn stats_source(mut self, source: impl StatsSource + 'static) -> Self {
        self.stats = Some(Box::new(source));
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Skip the coin flip and let `id` attack first.
    pub fn first(mut self, id: CombatantId) -> Self {
        self.first = Some(id);
        self
    }

    /// Subscribe before the match starts so `MatchStarted` is seen too.
    pub fn subscribe(mut self, handler: Box<dyn EventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Start the match.
    ///
    /// Fails with `MissingCollaborator` when the presenter or the stats
    /// source was never provided, and with whatever the stats source
    /// returns if it cannot produce stats.
    pub fn build(self) -> Result<TurnEngine<P>, DuelError> {
        let Some(presenter) = self.presenter else {
            log::error!("TurnEngine needs a presenter; engine disabled");
            return Err(DuelError::MissingCollaborator("presenter"));
        };
        let Some(stats) = self.stats else {
            log::error!("TurnEngine needs a stats source; engine disabled");
            return Err(DuelError::MissingCollaborator("stats source"));
        };

        let (raw_one, raw_two) = stats.initial_stats()?;
        let combatants = [
            Combatant::from_raw(CombatantId::One, &raw_one),
            Combatant::from_raw(CombatantId::Two, &raw_two),
        ];
        for combatant in &combatants {
            let invalid = combatant.invalid_fields();
            if !invalid.is_empty() {
                log::warn!(
                    "Player {} starts with unusable {}; their attacks will be skipped",
                    combatant.id(),
                    invalid.join(" and ")
                );
            }
        }

        let mut rng = DuelRng::from_optional_seed(self.config.seed);
        let first = self.first.unwrap_or_else(|| rng.pick_first());

        let mut bus = EventBus::with_history_size(self.config.history_size);
        for handler in self.handlers {
            bus.subscribe_all(handler);
        }

        log::info!(
            "Match starts! Player {} attacks first (seed {})",
            first,
            rng.seed()
        );
        bus.publish(DuelEvent::MatchStarted { first });

        Ok(TurnEngine {
            presenter,
            config: self.config,
            seed: rng.seed(),
            state: Mutex::new(MatchState {
                combatants,
                active: first,
                phase: Phase::AwaitingInput,
                winner: None,
            }),
            bus: Mutex::new(bus),
        })
    }
}

/// Owns the match and resolves turns on request.
///
/// `request_turn` takes `&self`: a second request polled while the first is
/// awaiting its animation sees `Resolving` and returns `Busy`.
pub struct TurnEngine<P> {
    presenter: P,
    config: EngineConfig,
    seed: u64,
    state: Mutex<MatchState>,
    /// Held while state changes are published so events stay in order.
    /// Always taken before `state`.
    bus: Mutex<EventBus>,
}

impl<P: Presenter> TurnEngine<P> {
    pub fn builder() -> TurnEngineBuilder<P> {
        TurnEngineBuilder::new()
    }

    /// Resolve one turn: animate, apply damage, then end the match or pass
    /// the turn.
    ///
    /// Returns `Busy` while another turn is resolving and `MatchOver` after
    /// the match; both leave the state untouched. `InvalidStats` means the
    /// animation played but the attack was skipped: no hit points changed,
    /// the same player is still active and the engine awaits input again.
    pub async fn request_turn(&self) -> Result<TurnOutcome, DuelError> {
        let attacker = {
            let mut state = self.lock_state();
            match state.phase {
                Phase::Resolving => {
                    log::debug!("Turn request ignored: player {} is still attacking", state.active);
                    return Err(DuelError::Busy);
                }
                Phase::GameOver => {
                    log::debug!("Turn request ignored: the match is over");
                    return Err(DuelError::MatchOver);
                }
                Phase::AwaitingInput => {}
            }
            state.phase = Phase::Resolving;
            state.active
        };

        // A dropped future must not leave the match stuck in Resolving.
        let abandoned = scopeguard::guard((), |_| {
            let mut state = self.lock_state();
            if state.phase == Phase::Resolving {
                log::warn!("Turn of player {} abandoned before the attack landed", attacker);
                state.phase = Phase::AwaitingInput;
            }
        });
        let elapsed = self.play_attack(attacker).await;
        scopeguard::ScopeGuard::into_inner(abandoned);
        log::debug!("Attack animation of player {} finished after {:?}", attacker, elapsed);

        let mut bus = self.lock_bus();
        let mut state = self.lock_state();

        let report = match Combat::resolve_in_pair(&mut state.combatants, attacker) {
            Ok(report) => report,
            Err(err) => {
                state.phase = Phase::AwaitingInput;
                drop(state);
                log::warn!("Attack of player {} skipped: {}", attacker, err);
                bus.publish(DuelEvent::AttackSkipped {
                    attacker,
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        let outcome = if report.defeated() {
            state.phase = Phase::GameOver;
            state.winner = Some(attacker);
            TurnOutcome::MatchEnded { winner: attacker }
        } else {
            state.active = report.defender;
            state.phase = Phase::AwaitingInput;
            TurnOutcome::TurnChanged {
                active: report.defender,
            }
        };
        drop(state);

        log::info!("💥 {}", report.message());
        bus.publish(DuelEvent::AttackResolved(report));
        match outcome {
            TurnOutcome::MatchEnded { winner } => {
                log::info!("🏆 Player {} wins!", winner);
                bus.publish(DuelEvent::MatchEnded { winner });
            }
            TurnOutcome::TurnChanged { active } => {
                log::info!("Now it's player {}'s turn", active);
                bus.publish(DuelEvent::TurnChanged { active });
            }
        }

        Ok(outcome)
    }

    /// Ask the presenter to animate and wait out the fallback if it cannot.
    async fn play_attack(&self, attacker: CombatantId) -> Duration {
        match self.presenter.play_attack_animation(attacker).await {
            AnimationOutcome::Played(elapsed) => elapsed,
            AnimationOutcome::ClipNotFound => {
                let wait = self.config.fallback_animation;
                log::warn!(
                    "Attack animation for player {} not found, waiting {:?} instead",
                    attacker,
                    wait
                );
                tokio::time::sleep(wait).await;
                wait
            }
            AnimationOutcome::NoAnimator => {
                let wait = self.config.unanimated_pause;
                log::info!("Player {} attacks (no animation)", attacker);
                tokio::time::sleep(wait).await;
                wait
            }
        }
    }

    /// Overwrite a stat from text, the way an editable display field would.
    ///
    /// Malformed text is stored and makes the next attack that needs it
    /// fail. Not allowed while a turn is resolving or after the match.
    pub fn set_stat(
        &self,
        id: CombatantId,
        kind: StatKind,
        text: &str,
    ) -> Result<StatValue, DuelError> {
        let mut state = self.lock_state();
        match state.phase {
            Phase::Resolving => return Err(DuelError::Busy),
            Phase::GameOver => return Err(DuelError::MatchOver),
            Phase::AwaitingInput => {}
        }

        let value = StatValue::parse(text);
        if !value.is_valid() {
            log::warn!("Player {}'s {} set to unusable value {:?}", id, kind, text);
        }
        state.combatants[id.index()].set_stat(kind, value.clone());
        Ok(value)
    }

    pub fn phase(&self) -> Phase {
        self.lock_state().phase
    }

    /// The player whose turn it is. After the match ends this is the winner,
    /// since the final turn does not switch.
    pub fn active(&self) -> CombatantId {
        self.lock_state().active
    }

    pub fn winner(&self) -> Option<CombatantId> {
        self.lock_state().winner
    }

    pub fn combatant(&self, id: CombatantId) -> Combatant {
        self.lock_state().combatants[id.index()].clone()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::from(&*self.lock_state())
    }

    /// Seed used for the opening coin flip.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Handlers must not call `subscribe` or `drain_events` themselves.
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.lock_bus().subscribe_all(handler);
    }

    pub fn event_history(&self) -> Vec<DuelEvent> {
        self.lock_bus().history().cloned().collect()
    }

    /// Take every event published since the last drain.
    pub fn drain_events(&self) -> Vec<DuelEvent> {
        self.lock_bus().drain().collect()
    }

    fn lock_state(&self) -> MutexGuard<'_, MatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_bus(&self) -> MutexGuard<'_, EventBus> {
        self.bus.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{NullPresenter, StaticStats};
    use combat::RawStats;

    fn engine(one: (u32, u32), two: (u32, u32), first: CombatantId) -> TurnEngine<NullPresenter> {
        TurnEngine::builder()
            .presenter(NullPresenter::instant())
            .stats_source(StaticStats::typed(one, two))
            .first(first)
            .build()
            .unwrap()
    }

    #[test]
    fn missing_presenter_is_fatal() {
        let result = TurnEngine::<NullPresenter>::builder()
            .stats_source(StaticStats::typed((1, 1), (1, 1)))
            .build();
        assert!(matches!(result, Err(DuelError::MissingCollaborator("presenter"))));
    }

    #[test]
    fn missing_stats_source_is_fatal() {
        let result = TurnEngine::builder()
            .presenter(NullPresenter::instant())
            .build();
        assert!(matches!(result, Err(DuelError::MissingCollaborator("stats source"))));
    }

    #[test]
    fn stats_source_errors_propagate() {
        let result = TurnEngine::builder()
            .presenter(NullPresenter::instant())
            .stats_source(|| -> Result<(RawStats, RawStats), DuelError> {
                Err(DuelError::Config("no stats".into()))
            })
            .build();
        assert!(matches!(result, Err(DuelError::Config(_))));
    }

    #[test]
    fn starts_awaiting_input_and_announces_first_player() {
        let engine = engine((30, 10), (20, 15), CombatantId::Two);
        assert_eq!(engine.phase(), Phase::AwaitingInput);
        assert_eq!(engine.active(), CombatantId::Two);
        assert_eq!(engine.winner(), None);
        assert_eq!(
            engine.drain_events(),
            vec![DuelEvent::MatchStarted {
                first: CombatantId::Two
            }]
        );
    }

    #[test]
    fn seeded_coin_flip_is_reproducible() {
        let build = || {
            TurnEngine::builder()
                .presenter(NullPresenter::instant())
                .stats_source(StaticStats::typed((1, 1), (1, 1)))
                .config(EngineConfig::default().with_seed(42))
                .build()
                .unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a.active(), b.active());
        assert_eq!(a.seed(), 42);
    }

    #[tokio::test]
    async fn turn_passes_to_defender() {
        let engine = engine((30, 10), (20, 15), CombatantId::One);
        let outcome = engine.request_turn().await.unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::TurnChanged {
                active: CombatantId::Two
            }
        );
        assert_eq!(engine.combatant(CombatantId::Two).hit_points().value(), Some(10));
    }

    #[tokio::test]
    async fn set_stat_is_refused_after_the_match() {
        let engine = engine((30, 10), (5, 5), CombatantId::One);
        engine.request_turn().await.unwrap();
        assert!(matches!(
            engine.set_stat(CombatantId::One, StatKind::HitPoints, "1"),
            Err(DuelError::MatchOver)
        ));
    }

    #[test]
    fn set_stat_parses_text() {
        let engine = engine((30, 10), (20, 15), CombatantId::One);
        let value = engine
            .set_stat(CombatantId::Two, StatKind::AttackDamage, " 12 ")
            .unwrap();
        assert_eq!(value, StatValue::Value(12));
        assert_eq!(
            engine.combatant(CombatantId::Two).attack_damage(),
            &StatValue::Value(12)
        );
    }
}
