// src/combat/src/combatant.rs

use error::DuelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, IntoStaticStr};

/// 对局中的两个席位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CombatantId {
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "2")]
    Two,
}

impl CombatantId {
    /// The other seat.
    pub fn opponent(self) -> Self {
        match self {
            CombatantId::One => CombatantId::Two,
            CombatantId::Two => CombatantId::One,
        }
    }

    /// Player number as shown to players (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            CombatantId::One => 1,
            CombatantId::Two => 2,
        }
    }

    /// Slot index into a two-element array.
    pub fn index(self) -> usize {
        match self {
            CombatantId::One => 0,
            CombatantId::Two => 1,
        }
    }
}

/// Which stat of a combatant a value belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
pub enum StatKind {
    #[strum(serialize = "hit points")]
    HitPoints,
    #[strum(serialize = "attack damage")]
    AttackDamage,
}

/// A stat as it was entered: a number, nothing, or text that is not a number.
///
/// Malformed input is kept as-is so that the attack that needs it can be
/// skipped and reported. It is never read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatValue {
    Value(u32),
    Missing,
    Malformed(String),
}

impl StatValue {
    /// Parse free text the way a display field would hold it.
    ///
    /// Surrounding whitespace is ignored and a leading `+` is accepted.
    /// Negative numbers are malformed: stats never go below zero.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return StatValue::Missing;
        }
        match trimmed.parse::<i64>() {
            Ok(n) if n < 0 => StatValue::Malformed(text.to_string()),
            Ok(n) => u32::try_from(n)
                .map(StatValue::Value)
                .unwrap_or_else(|_| StatValue::Malformed(text.to_string())),
            Err(_) => StatValue::Malformed(text.to_string()),
        }
    }

    pub fn from_optional(text: Option<&str>) -> Self {
        text.map_or(StatValue::Missing, StatValue::parse)
    }

    pub fn value(&self) -> Option<u32> {
        match self {
            StatValue::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, StatValue::Value(_))
    }

    /// The numeric value, or an `InvalidStats` error naming who and what.
    pub fn require(&self, combatant: CombatantId, kind: StatKind) -> Result<u32, DuelError> {
        match self {
            StatValue::Value(v) => Ok(*v),
            StatValue::Missing => Err(DuelError::InvalidStats {
                combatant: combatant.number(),
                field: kind.into(),
                reason: "is missing".to_string(),
            }),
            StatValue::Malformed(text) => Err(DuelError::InvalidStats {
                combatant: combatant.number(),
                field: kind.into(),
                reason: format!("`{}` is not a non-negative integer", text),
            }),
        }
    }
}

impl From<u32> for StatValue {
    fn from(value: u32) -> Self {
        StatValue::Value(value)
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Value(v) => write!(f, "{}", v),
            StatValue::Missing => write!(f, "-"),
            StatValue::Malformed(text) => write!(f, "{}", text),
        }
    }
}

/// Initial stats as text, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub hit_points: Option<String>,
    #[serde(default)]
    pub attack_damage: Option<String>,
}

impl RawStats {
    pub fn new(hit_points: &str, attack_damage: &str) -> Self {
        Self {
            hit_points: Some(hit_points.to_string()),
            attack_damage: Some(attack_damage.to_string()),
        }
    }

    pub fn typed(hit_points: u32, attack_damage: u32) -> Self {
        Self::new(&hit_points.to_string(), &attack_damage.to_string())
    }
}

/// 参加对局的一方
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    id: CombatantId,
    hit_points: StatValue,
    attack_damage: StatValue,
}

impl Combatant {
    pub fn new(id: CombatantId, hit_points: u32, attack_damage: u32) -> Self {
        Self {
            id,
            hit_points: StatValue::Value(hit_points),
            attack_damage: StatValue::Value(attack_damage),
        }
    }

    /// Build a combatant from textual stats. Bad fields are kept and only
    /// fail when an attack reads them.
    pub fn from_raw(id: CombatantId, raw: &RawStats) -> Self {
        Self {
            id,
            hit_points: StatValue::from_optional(raw.hit_points.as_deref()),
            attack_damage: StatValue::from_optional(raw.attack_damage.as_deref()),
        }
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn hit_points(&self) -> &StatValue {
        &self.hit_points
    }

    pub fn attack_damage(&self) -> &StatValue {
        &self.attack_damage
    }

    pub fn set_stat(&mut self, kind: StatKind, value: StatValue) {
        match kind {
            StatKind::HitPoints => self.hit_points = value,
            StatKind::AttackDamage => self.attack_damage = value,
        }
    }

    /// Defeated once hit points are exactly zero. Unknown hit points are
    /// not a defeat.
    pub fn is_defeated(&self) -> bool {
        self.hit_points.value() == Some(0)
    }

    /// Names of the fields that cannot be used in an attack.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !self.hit_points.is_valid() {
            fields.push(StatKind::HitPoints.into());
        }
        if !self.attack_damage.is_valid() {
            fields.push(StatKind::AttackDamage.into());
        }
        fields
    }

    /// 造成伤害, returning hit points before and after.
    pub fn take_damage(&mut self, amount: u32) -> Result<(u32, u32), DuelError> {
        let before = self.hit_points.require(self.id, StatKind::HitPoints)?;
        let after = remaining_hit_points(before, amount);
        self.hit_points = StatValue::Value(after);
        Ok((before, after))
    }
}

/// `max(hit_points - damage, 0)` in integer arithmetic.
pub fn remaining_hit_points(hit_points: u32, damage: u32) -> u32 {
    hit_points.saturating_sub(damage)
}
