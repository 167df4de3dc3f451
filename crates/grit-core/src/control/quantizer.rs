//! Pitch quantizer
//!
//! Snaps a continuous playback-speed multiplier to the nearest degree of
//! a musical scale, across octaves. Runs at UI rate only, so the log/exp
//! math stays off the audio cores.

use serde::{Deserialize, Serialize};

/// Musical scales available to the quantizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Every semitone
    Chromatic,
    /// Major (ionian)
    Major,
    /// Natural minor
    #[default]
    Minor,
}

impl Scale {
    /// Scale degrees as semitone offsets within one octave
    fn degrees(self) -> &'static [i32] {
        match self {
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
        }
    }
}

/// Snaps speed multipliers to a scale
pub struct Quantizer {
    enabled: bool,
    scale: Scale,
}

impl Quantizer {
    /// Create an enabled quantizer on the given scale
    pub fn new(scale: Scale) -> Self {
        Self { enabled: true, scale }
    }

    /// Enable or disable snapping (disabled passes multipliers through)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Change the active scale
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    /// Snap a playback-speed multiplier to the nearest scale degree
    ///
    /// A multiplier of 1.0 is the root; each semitone is a factor of
    /// 2^(1/12). Non-positive multipliers pass through untouched.
    pub fn process_multiplier(&self, multiplier: f32) -> f32 {
        if !self.enabled || multiplier <= 0.0 {
            return multiplier;
        }

        let semitones = 12.0 * multiplier.log2();
        let octave = (semitones / 12.0).floor();
        let degree = semitones - octave * 12.0;

        // nearest degree, considering the next octave's root as well
        let mut best = 0.0f32;
        let mut best_dist = f32::MAX;
        for &d in self.scale.degrees().iter().chain(std::iter::once(&12)) {
            let dist = (degree - d as f32).abs();
            if dist < best_dist {
                best_dist = dist;
                best = d as f32;
            }
        }

        2f32.powf((octave * 12.0 + best) / 12.0)
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(Scale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEMITONE: f32 = 1.059_463_1;

    #[test]
    fn test_root_and_octaves_pass_through() {
        let qnt = Quantizer::new(Scale::Minor);
        for m in [0.25, 0.5, 1.0, 2.0, 4.0] {
            let out = qnt.process_multiplier(m);
            assert!((out - m).abs() < 1e-4, "{} snapped to {}", m, out);
        }
    }

    #[test]
    fn test_snaps_out_of_scale_degree() {
        let qnt = Quantizer::new(Scale::Minor);
        // a major third (4 semitones) is not in natural minor; nearest
        // degrees are 3 and 5 semitones
        let major_third = SEMITONE.powi(4);
        let out = qnt.process_multiplier(major_third);
        let semis = 12.0 * out.log2();
        assert!((semis - 3.0).abs() < 0.01 || (semis - 5.0).abs() < 0.01, "snapped to {} semis", semis);
    }

    #[test]
    fn test_chromatic_snaps_to_nearest_semitone() {
        let qnt = Quantizer::new(Scale::Chromatic);
        let out = qnt.process_multiplier(SEMITONE.powi(7) * 1.01);
        let semis = 12.0 * out.log2();
        assert!((semis - 7.0).abs() < 0.01);
    }

    #[test]
    fn test_set_scale_switches_degrees() {
        let mut qnt = Quantizer::new(Scale::Minor);
        // a major third is out of natural minor but lands exactly on a
        // major degree once the scale is switched
        let major_third = SEMITONE.powi(4);
        let minor_semis = 12.0 * qnt.process_multiplier(major_third).log2();
        assert!((minor_semis - 4.0).abs() > 0.5, "minor kept {} semis", minor_semis);

        qnt.set_scale(Scale::Major);
        let major_semis = 12.0 * qnt.process_multiplier(major_third).log2();
        assert!((major_semis - 4.0).abs() < 0.01, "major snapped to {}", major_semis);
    }

    #[test]
    fn test_disabled_passes_through() {
        let mut qnt = Quantizer::new(Scale::Minor);
        qnt.set_enabled(false);
        let raw = 1.2345;
        assert_eq!(qnt.process_multiplier(raw), raw);
    }

    #[test]
    fn test_non_positive_passes_through() {
        let qnt = Quantizer::default();
        assert_eq!(qnt.process_multiplier(0.0), 0.0);
        assert_eq!(qnt.process_multiplier(-1.0), -1.0);
    }
}
