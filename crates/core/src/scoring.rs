//! Scoring module - line clear points, leveling and the speed curve

use crate::config::EngineConfig;
use crate::types::LINE_SCORES;

/// Points for clearing `lines` rows in one lock-in at `level`.
///
/// Clears larger than four rows score as four.
pub fn line_clear_points(lines: usize, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    LINE_SCORES[lines.min(LINE_SCORES.len()) - 1].saturating_mul(level)
}

/// Level for a cumulative line count. Levels start at 1.
pub fn level_for_lines(total_lines: u32, lines_per_level: u32) -> u32 {
    total_lines / lines_per_level + 1
}

/// Gravity interval at `level`, in milliseconds.
///
/// `base * decay^(level - 1)`, never below the configured floor.
pub fn fall_interval_ms(level: u32, config: &EngineConfig) -> u32 {
    let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    let scaled = config.base_fall_ms as f64 * config.speed_decay.powi(exponent);
    // `as` saturates, and a tiny or NaN product falls through to the floor.
    (scaled.round() as u32).max(config.min_fall_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(line_clear_points(0, 1), 0);
        assert_eq!(line_clear_points(1, 1), 100);
        assert_eq!(line_clear_points(2, 1), 300);
        assert_eq!(line_clear_points(3, 1), 500);
        assert_eq!(line_clear_points(4, 1), 800);

        assert_eq!(line_clear_points(2, 3), 900);
        assert_eq!(line_clear_points(4, 5), 4000);
    }

    #[test]
    fn test_oversized_clear_scores_as_four() {
        assert_eq!(line_clear_points(6, 2), 1600);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(level_for_lines(0, 10), 1);
        assert_eq!(level_for_lines(9, 10), 1);
        assert_eq!(level_for_lines(10, 10), 2);
        assert_eq!(level_for_lines(19, 10), 2);
        assert_eq!(level_for_lines(20, 10), 3);

        assert_eq!(level_for_lines(4, 5), 1);
        assert_eq!(level_for_lines(5, 5), 2);
    }

    #[test]
    fn test_fall_interval_curve() {
        let desktop = EngineConfig::desktop();
        assert_eq!(fall_interval_ms(1, &desktop), 500);
        assert_eq!(fall_interval_ms(2, &desktop), 425);
        // 500 * 0.85^2 = 361.25
        assert_eq!(fall_interval_ms(3, &desktop), 361);

        let compact = EngineConfig::compact();
        assert_eq!(fall_interval_ms(2, &compact), 350);
    }

    #[test]
    fn test_fall_interval_floor() {
        let config = EngineConfig::desktop();
        for level in [20, 100, 1_000, u32::MAX] {
            assert_eq!(fall_interval_ms(level, &config), config.min_fall_ms);
        }
    }

    #[test]
    fn test_fall_interval_is_non_increasing() {
        let config = EngineConfig::compact();
        let mut prev = u32::MAX;
        for level in 1..40 {
            let interval = fall_interval_ms(level, &config);
            assert!(interval <= prev);
            prev = interval;
        }
    }
}
