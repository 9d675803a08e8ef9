//! Two-player turn-based duel engine.
//!
//! [`TurnEngine`] owns both combatants and alternates attacks between them,
//! awaiting an injected [`Presenter`] to animate each attack and publishing
//! [`DuelEvent`]s for the presentation layer to display.

pub mod collaborators;
pub mod config;
pub mod event_bus;
pub mod logging;
pub mod rng;
pub mod turn_engine;

pub use collaborators::{AnimationOutcome, NullPresenter, Presenter, StaticStats, StatsSource};
pub use combat::{AttackReport, Combatant, CombatantId, RawStats, StatKind, StatValue};
pub use config::{DuelConfig, EngineConfig};
pub use error::{handle_error, DuelError};
pub use event_bus::{DuelEvent, EventBus, EventHandler, Priority};
pub use turn_engine::{MatchSnapshot, Phase, TurnEngine, TurnEngineBuilder, TurnOutcome};
