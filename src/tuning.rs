//! Data-driven game balance
//!
//! Loaded from JSON; any field left out keeps its default.

use serde::{Deserialize, Serialize};

/// Gameplay knobs for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Pools ===
    pub projectile_pool_capacity: usize,
    pub hazard_pool_capacity: usize,

    // === Cooldowns (seconds) ===
    /// Minimum time between shots
    pub shoot_cooldown: f32,
    /// Minimum time between hazard spawn attempts
    pub hazard_spawn_cooldown: f32,

    // === Bounds ===
    /// Actors further than this outside the window are recycled
    pub bounds_margin: f32,
    /// Distance outside the window where hazards appear
    pub spawn_margin: f32,
    /// Half-extent of the random aim box around screen centre
    pub spawn_aim_jitter: f32,

    // === Scoring ===
    pub points_per_hazard_level: u64,
    pub points_per_zone: u64,

    // === Objective zone ===
    /// Seconds the ship must stay inside a zone
    pub zone_completion_time: f32,
    /// Completed zones needed to win
    pub zones_to_win: u32,

    // === Hazard behaviour ===
    /// Split fragments deviate by up to this many degrees
    pub split_angle: f32,
    /// Speeds are `default_speed` plus a uniform offset in ±this
    pub speed_jitter: f32,
    /// Spawned hazards get a level in `1..=max_spawn_level`
    pub max_spawn_level: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            projectile_pool_capacity: 20,
            hazard_pool_capacity: 50,

            shoot_cooldown: 0.25,
            hazard_spawn_cooldown: 1.5,

            bounds_margin: 100.0,
            spawn_margin: 50.0,
            spawn_aim_jitter: 250.0,

            points_per_hazard_level: 5,
            points_per_zone: 50,

            zone_completion_time: 20.0,
            zones_to_win: 3,

            split_angle: 25.0,
            speed_jitter: 100.0,
            max_spawn_level: 3,
        }
    }
}

impl Tuning {
    /// Parse `json`; out-of-range values are clamped (see [`Tuning::sanitized`])
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Clamp durations, distances and jitters to `>= 0`.
    ///
    /// Non-finite values fall back to their defaults and spawn levels start at 1.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let original = self.clone();
        let non_negative = |value: f32, default: f32| {
            if value.is_finite() { value.max(0.0) } else { default }
        };

        let sanitized = Self {
            shoot_cooldown: non_negative(self.shoot_cooldown, defaults.shoot_cooldown),
            hazard_spawn_cooldown: non_negative(
                self.hazard_spawn_cooldown,
                defaults.hazard_spawn_cooldown,
            ),
            bounds_margin: non_negative(self.bounds_margin, defaults.bounds_margin),
            spawn_margin: non_negative(self.spawn_margin, defaults.spawn_margin),
            spawn_aim_jitter: non_negative(self.spawn_aim_jitter, defaults.spawn_aim_jitter),
            zone_completion_time: non_negative(
                self.zone_completion_time,
                defaults.zone_completion_time,
            ),
            split_angle: non_negative(self.split_angle, defaults.split_angle),
            speed_jitter: non_negative(self.speed_jitter, defaults.speed_jitter),
            max_spawn_level: self.max_spawn_level.max(1),
            ..self
        };
        if sanitized != original {
            log::warn!("Tuning values out of range were clamped");
        }
        sanitized
    }

    /// Parse `json`, falling back to defaults (with a warning) if it is malformed
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // Plain struct of numbers; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "hazard_pool_capacity": 8, "zones_to_win": 1 }"#).unwrap();
        assert_eq!(tuning.hazard_pool_capacity, 8);
        assert_eq!(tuning.zones_to_win, 1);
        assert_eq!(tuning.projectile_pool_capacity, 20);
        assert_eq!(tuning.points_per_hazard_level, 5);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert!(Tuning::from_json("{ not json").is_err());
        assert_eq!(Tuning::from_json_or_default("{ not json"), Tuning::default());
    }

    #[test]
    fn test_negative_values_clamped() {
        let tuning = Tuning::from_json(
            r#"{ "speed_jitter": -10.0, "split_angle": -5.0, "spawn_aim_jitter": -1.0, "shoot_cooldown": -2.0, "max_spawn_level": -3 }"#,
        )
        .unwrap();
        assert_eq!(tuning.speed_jitter, 0.0);
        assert_eq!(tuning.split_angle, 0.0);
        assert_eq!(tuning.spawn_aim_jitter, 0.0);
        assert_eq!(tuning.shoot_cooldown, 0.0);
        assert_eq!(tuning.max_spawn_level, 1);
    }

    #[test]
    fn test_non_finite_values_use_defaults() {
        let tuning = Tuning {
            speed_jitter: f32::NAN,
            zone_completion_time: f32::INFINITY,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut tuning = Tuning::default();
        tuning.split_angle = 10.0;
        let parsed = Tuning::from_json(&tuning.to_json()).unwrap();
        assert_eq!(parsed, tuning);
    }
}
