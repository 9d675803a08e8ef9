//! Contracts the engine depends on.
//!
//! The engine never draws anything and never looks values up in a scene.
//! A presentation layer implements [`Presenter`] to play attack animations
//! and supplies starting stats through a [`StatsSource`].

use combat::{CombatantId, RawStats};
use error::DuelError;
use std::future::Future;
use std::time::Duration;

/// What happened when the presenter was asked to animate an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// The clip played to completion and took this long.
    Played(Duration),
    /// The attacker can animate but the attack clip was not found.
    ClipNotFound,
    /// The attacker has no animator at all.
    NoAnimator,
}

/// Plays attack animations on behalf of the engine.
///
/// The returned future must complete once the animation is over. It must
/// not call back into the engine to change state.
pub trait Presenter: Send + Sync {
    fn play_attack_animation(
        &self,
        attacker: CombatantId,
    ) -> impl Future<Output = AnimationOutcome> + Send;
}

/// Supplies both combatants' starting stats.
pub trait StatsSource {
    fn initial_stats(&self) -> Result<(RawStats, RawStats), DuelError>;
}

/// Fixed stats handed over at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticStats {
    player_one: RawStats,
    player_two: RawStats,
}

impl StaticStats {
    pub fn new(player_one: RawStats, player_two: RawStats) -> Self {
        Self {
            player_one,
            player_two,
        }
    }

    pub fn typed(one: (u32, u32), two: (u32, u32)) -> Self {
        Self::new(RawStats::typed(one.0, one.1), RawStats::typed(two.0, two.1))
    }
}

impl StatsSource for StaticStats {
    fn initial_stats(&self) -> Result<(RawStats, RawStats), DuelError> {
        Ok((self.player_one.clone(), self.player_two.clone()))
    }
}

impl<F> StatsSource for F
where
    F: Fn() -> Result<(RawStats, RawStats), DuelError>,
{
    fn initial_stats(&self) -> Result<(RawStats, RawStats), DuelError> {
        self()
    }
}

/// Presenter that plays nothing and reports a fixed outcome.
#[derive(Debug, Clone, Copy)]
pub struct NullPresenter {
    outcome: AnimationOutcome,
}

impl NullPresenter {
    pub fn new(outcome: AnimationOutcome) -> Self {
        Self { outcome }
    }

    /// Every attack "plays" instantly.
    pub fn instant() -> Self {
        Self::new(AnimationOutcome::Played(Duration::ZERO))
    }
}

impl Presenter for NullPresenter {
    async fn play_attack_animation(&self, _attacker: CombatantId) -> AnimationOutcome {
        self.outcome
    }
}
