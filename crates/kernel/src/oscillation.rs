use serde::{Deserialize, Serialize};
use tilehop_common::OscillationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseDirection {
    Rising,
    Falling,
}

/// Shared height of every movable floor tile: a triangle wave between
/// `min` and `max`, advanced by a fixed delta per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    height: f32,
    direction: PhaseDirection,
    min: f32,
    max: f32,
    delta: f32,
}

impl Oscillation {
    pub fn new(config: &OscillationConfig) -> Self {
        let direction = if config.start_rising {
            PhaseDirection::Rising
        } else {
            PhaseDirection::Falling
        };
        Self {
            height: config.start.clamp(config.min, config.max),
            direction,
            min: config.min,
            max: config.max,
            delta: config.delta,
        }
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn direction(&self) -> PhaseDirection {
        self.direction
    }

    /// Frames in one full up-and-down cycle.
    pub fn period_frames(&self) -> f32 {
        2.0 * (self.max - self.min) / self.delta
    }

    /// Advance one frame. The height is clamped to the range and the direction
    /// flips on the frame a bound is reached. Returns `true` on a flip.
    pub fn advance(&mut self) -> bool {
        match self.direction {
            PhaseDirection::Rising => {
                self.height = (self.height + self.delta).min(self.max);
                if self.height >= self.max {
                    self.direction = PhaseDirection::Falling;
                    return true;
                }
            }
            PhaseDirection::Falling => {
                self.height = (self.height - self.delta).max(self.min);
                if self.height <= self.min {
                    self.direction = PhaseDirection::Rising;
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_configured_phase() {
        let osc = Oscillation::new(&OscillationConfig::default());
        assert_eq!(osc.height(), -4.0);
        assert_eq!(osc.direction(), PhaseDirection::Rising);
        assert_eq!(osc.period_frames(), 2400.0);
    }

    #[test]
    fn stays_bounded_and_flips_only_at_bounds() {
        let mut osc = Oscillation::new(&OscillationConfig::default());
        for _ in 0..10_000 {
            let flipped = osc.advance();
            assert!((-4.0..=2.0).contains(&osc.height()));
            if flipped {
                assert!(osc.height() == 2.0 || osc.height() == -4.0);
            }
        }
    }

    #[test]
    fn full_cycle_matches_period() {
        let mut osc = Oscillation::new(&OscillationConfig::default());
        let mut flips = Vec::new();
        for frame in 1..=6000u32 {
            if osc.advance() {
                flips.push((frame, osc.direction()));
            }
        }
        assert!(flips.len() >= 4);
        assert_eq!(flips[0].1, PhaseDirection::Falling);
        assert_eq!(flips[1].1, PhaseDirection::Rising);
        // Half period is 6.0 / 0.005 = 1200 frames, give or take float rounding.
        let half = flips[1].0 - flips[0].0;
        assert!((1199..=1201).contains(&half), "half period {half}");
        let full = flips[2].0 - flips[0].0;
        assert!((2398..=2402).contains(&full), "period {full}");
    }

    #[test]
    fn falling_start_descends() {
        let cfg = OscillationConfig {
            start: 0.0,
            start_rising: false,
            ..OscillationConfig::default()
        };
        let mut osc = Oscillation::new(&cfg);
        osc.advance();
        assert!(osc.height() < 0.0);
    }
}
