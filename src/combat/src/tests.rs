#[cfg(test)]
mod combat_tests {
    use crate::{AttackReport, Combat, Combatant, CombatantId, RawStats, StatValue};
    use error::DuelError;
    use proptest::prelude::*;

    fn pair(hp1: u32, dmg1: u32, hp2: u32, dmg2: u32) -> [Combatant; 2] {
        [
            Combatant::new(CombatantId::One, hp1, dmg1),
            Combatant::new(CombatantId::Two, hp2, dmg2),
        ]
    }

    #[test]
    fn test_basic_attack() {
        let mut combatants = pair(30, 10, 20, 15);
        let report = Combat::resolve_in_pair(&mut combatants, CombatantId::One).unwrap();

        assert_eq!(
            report,
            AttackReport {
                attacker: CombatantId::One,
                defender: CombatantId::Two,
                damage: 10,
                hp_before: 20,
                hp_after: 10,
            }
        );
        assert_eq!(combatants[1].hit_points().value(), Some(10));
        // attacker is untouched
        assert_eq!(combatants[0].hit_points().value(), Some(30));
        assert!(!report.defeated());
    }

    #[test]
    fn test_counter_direction() {
        let mut combatants = pair(30, 10, 20, 15);
        let report = Combat::resolve_in_pair(&mut combatants, CombatantId::Two).unwrap();
        assert_eq!(report.defender, CombatantId::One);
        assert_eq!(combatants[0].hit_points().value(), Some(15));
    }

    #[test]
    fn test_lethal_attack() {
        let mut combatants = pair(30, 10, 5, 5);
        let report = Combat::resolve_in_pair(&mut combatants, CombatantId::One).unwrap();
        assert!(report.defeated());
        assert!(combatants[1].is_defeated());
        assert_eq!(report.message(), "Player 1 attacks for 10 damage! HP: 5 -> 0");
    }

    #[test]
    fn test_zero_damage_changes_nothing() {
        let mut combatants = pair(30, 0, 20, 15);
        let report = Combat::resolve_in_pair(&mut combatants, CombatantId::One).unwrap();
        assert_eq!(report.hp_before, report.hp_after);
    }

    #[test]
    fn test_malformed_damage_skips_attack() {
        let mut combatants = [
            Combatant::from_raw(CombatantId::One, &RawStats::new("30", "ten")),
            Combatant::new(CombatantId::Two, 20, 15),
        ];
        let err = Combat::resolve_in_pair(&mut combatants, CombatantId::One).unwrap_err();

        match err {
            DuelError::InvalidStats { combatant, field, .. } => {
                assert_eq!(combatant, 1);
                assert_eq!(field, "attack damage");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(combatants[1].hit_points(), &StatValue::Value(20));
    }

    #[test]
    fn test_missing_defender_hp_skips_attack() {
        let mut combatants = [
            Combatant::new(CombatantId::One, 30, 10),
            Combatant::from_raw(
                CombatantId::Two,
                &RawStats {
                    hit_points: None,
                    attack_damage: Some("4".into()),
                },
            ),
        ];
        let err = Combat::resolve_in_pair(&mut combatants, CombatantId::One).unwrap_err();
        assert!(matches!(err, DuelError::InvalidStats { combatant: 2, .. }));
        assert_eq!(combatants[1].hit_points(), &StatValue::Missing);
    }

    #[test]
    fn test_raw_stats_from_json_allow_absent_fields() {
        let raw: RawStats = serde_json::from_str(r#"{ "hit_points": "12" }"#).unwrap();
        let c = Combatant::from_raw(CombatantId::Two, &raw);
        assert_eq!(c.hit_points().value(), Some(12));
        assert_eq!(c.attack_damage(), &StatValue::Missing);
    }

    proptest! {
        #[test]
        fn hit_points_never_go_negative(hp in 0u32..=10_000, dmg in 0u32..=20_000) {
            let mut combatants = pair(1, dmg, hp, 1);
            let report = Combat::resolve_in_pair(&mut combatants, CombatantId::One).unwrap();
            let expected = if dmg >= hp { 0 } else { hp - dmg };
            prop_assert_eq!(report.hp_after, expected);
            prop_assert_eq!(combatants[1].hit_points().value(), Some(expected));
        }

        #[test]
        fn extreme_values_saturate(hp in any::<u32>(), dmg in any::<u32>()) {
            let mut defender = Combatant::new(CombatantId::Two, hp, 0);
            let (before, after) = defender.take_damage(dmg).unwrap();
            prop_assert_eq!(before, hp);
            prop_assert!(after <= before);
            prop_assert_eq!(after == 0, dmg >= hp);
        }
    }
}
