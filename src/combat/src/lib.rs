// src/combat/src/lib.rs

pub mod combatant;

#[cfg(test)]
mod tests;

pub use crate::combatant::{
    remaining_hit_points, Combatant, CombatantId, RawStats, StatKind, StatValue,
};
use error::DuelError;
use serde::{Deserialize, Serialize};

/// Handles combat interactions between the two duelists
pub struct Combat;

impl Combat {
    /// Resolve a single attack.
    ///
    /// Both the attacker's damage and the defender's hit points must be
    /// valid numbers; otherwise nothing is changed and `InvalidStats` is
    /// returned.
    pub fn resolve_attack(
        attacker: &Combatant,
        defender: &mut Combatant,
    ) -> Result<AttackReport, DuelError> {
        let damage = attacker
            .attack_damage()
            .require(attacker.id(), StatKind::AttackDamage)?;
        let (hp_before, hp_after) = defender.take_damage(damage)?;

        Ok(AttackReport {
            attacker: attacker.id(),
            defender: defender.id(),
            damage,
            hp_before,
            hp_after,
        })
    }

    /// Resolve an attack between two slots of a pair.
    pub fn resolve_in_pair(
        combatants: &mut [Combatant; 2],
        attacker: CombatantId,
    ) -> Result<AttackReport, DuelError> {
        let [first, second] = combatants;
        match attacker {
            CombatantId::One => Self::resolve_attack(first, second),
            CombatantId::Two => Self::resolve_attack(second, first),
        }
    }
}

/// Outcome of one resolved attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub attacker: CombatantId,
    pub defender: CombatantId,
    pub damage: u32,
    pub hp_before: u32,
    pub hp_after: u32,
}

impl AttackReport {
    /// Whether this attack brought the defender to zero.
    pub fn defeated(&self) -> bool {
        self.hp_after == 0
    }

    /// Combat message for logs
    pub fn message(&self) -> String {
        format!(
            "Player {} attacks for {} damage! HP: {} -> {}",
            self.attacker, self.damage, self.hp_before, self.hp_after
        )
    }
}
