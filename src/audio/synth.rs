//! Procedural PCM synthesis
//!
//! Every sound effect is `gain * envelope(t) * waveform(t)`, evaluated
//! per sample and clamped to the signed 16-bit range. Nothing here touches
//! an audio device; output is plain sample buffers.

use std::f64::consts::TAU;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Largest sample magnitude written
pub const PEAK: f32 = 32767.0;

/// Rejected synthesis parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthError {
    InvalidDuration(f32),
    InvalidSampleRate(u32),
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::InvalidDuration(d) => write!(f, "invalid sound duration: {d}s"),
            SynthError::InvalidSampleRate(r) => write!(f, "invalid sample rate: {r} Hz"),
        }
    }
}

impl std::error::Error for SynthError {}

/// Amplitude envelope over a sound of length `duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// `e^{-rate * t}`
    ExpDecay { rate: f32 },
    /// `1 - t/d`
    Linear,
    /// `1 - (t/d)^exponent`
    Power { exponent: f32 },
    /// Piano-style attack, decay to 0.7, sustain, release to silence
    Adsr {
        attack: f32,
        decay_end: f32,
        sustain: f32,
        release_start: f32,
        release: f32,
    },
    /// Linear fade in, hold, linear fade out
    AttackRelease { attack: f32, release: f32 },
}

impl Envelope {
    /// The piano note shape (0.05s attack, decay to 0.7 by 0.15s, release from 0.4s)
    pub const PIANO: Envelope = Envelope::Adsr {
        attack: 0.05,
        decay_end: 0.15,
        sustain: 0.7,
        release_start: 0.4,
        release: 0.1,
    };

    /// Amplitude in `[0, 1]` at time `t`
    pub fn amplitude(&self, t: f32, duration: f32) -> f32 {
        let a = match *self {
            Envelope::ExpDecay { rate } => (-rate * t).exp(),
            Envelope::Linear => 1.0 - t / duration,
            Envelope::Power { exponent } => 1.0 - (t / duration).powf(exponent),
            Envelope::Adsr {
                attack,
                decay_end,
                sustain,
                release_start,
                release,
            } => {
                if t < attack {
                    t / attack
                } else if t < decay_end {
                    1.0 - (1.0 - sustain) * (t - attack) / (decay_end - attack)
                } else if t < release_start {
                    sustain
                } else {
                    sustain * (1.0 - (t - release_start) / release)
                }
            }
            Envelope::AttackRelease { attack, release } => {
                if attack > 0.0 && t < attack {
                    t / attack
                } else if t > duration - release {
                    (duration - t) / release
                } else {
                    1.0
                }
            }
        };
        a.clamp(0.0, 1.0)
    }
}

/// Instantaneous base frequency
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pitch {
    Fixed(f32),
    /// `start + sweep * t/d`
    Chirp { start: f32, sweep: f32 },
    /// `base * (1 + depth * sin(2π rate t))`
    Vibrato { base: f32, rate: f32, depth: f32 },
    /// Alternate between two tones, `rate` full cycles per second
    Alternate { low: f32, high: f32, rate: f32 },
    /// `base` plus a fresh uniform offset in `±spread` per sample
    Jitter { base: f32, spread: f32, seed: u64 },
}

/// One sine component: frequency multiple and weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    pub ratio: f32,
    pub weight: f32,
}

impl Partial {
    pub const fn new(ratio: f32, weight: f32) -> Self {
        Self { ratio, weight }
    }
}

/// A complete sound description
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub pitch: Pitch,
    pub partials: Vec<Partial>,
    /// Amplitude modulation `(rate, depth)`: `1 + depth * sin(2π rate t)`
    pub tremolo: Option<(f32, f32)>,
    pub envelope: Envelope,
    /// Peak amplitude before normalization
    pub gain: f32,
    /// Divisor applied to the summed partials
    pub normalize: f32,
}

impl Voice {
    /// A pure sine at `pitch`
    pub fn sine(pitch: Pitch, envelope: Envelope, gain: f32) -> Self {
        Self {
            pitch,
            partials: vec![Partial::new(1.0, 1.0)],
            tremolo: None,
            envelope,
            gain,
            normalize: 1.0,
        }
    }

    /// Equal-weight chord of absolute frequencies
    pub fn chord(freqs: &[f32], envelope: Envelope, gain: f32) -> Self {
        let base = freqs.first().copied().unwrap_or(440.0);
        let weight = 1.0 / freqs.len().max(1) as f32;
        Self {
            pitch: Pitch::Fixed(base),
            partials: freqs
                .iter()
                .map(|f| Partial::new(f / base, weight))
                .collect(),
            tremolo: None,
            envelope,
            gain,
            normalize: 1.0,
        }
    }

    pub fn with_partials(mut self, partials: &[Partial], normalize: f32) -> Self {
        self.partials = partials.to_vec();
        self.normalize = normalize;
        self
    }

    pub fn with_tremolo(mut self, rate: f32, depth: f32) -> Self {
        self.tremolo = Some((rate, depth));
        self
    }

    /// Render `duration` seconds of mono PCM at `sample_rate`
    pub fn render(&self, duration: f32, sample_rate: u32) -> Result<Vec<i16>, SynthError> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(SynthError::InvalidDuration(duration));
        }
        if sample_rate == 0 {
            return Err(SynthError::InvalidSampleRate(sample_rate));
        }

        let count = (sample_rate as f32 * duration) as usize;
        let mut jitter = match self.pitch {
            Pitch::Jitter { seed, .. } => Some(Pcg32::seed_from_u64(seed)),
            _ => None,
        };

        let samples = (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let freq = match self.pitch {
                    Pitch::Fixed(f) => f,
                    Pitch::Chirp { start, sweep } => start + sweep * t / duration,
                    Pitch::Vibrato { base, rate, depth } => {
                        base * (1.0 + depth * (TAU as f32 * rate * t).sin())
                    }
                    Pitch::Alternate { low, high, rate } => {
                        if (t * rate).fract() < 0.5 { low } else { high }
                    }
                    Pitch::Jitter { base, spread, .. } => match jitter.as_mut() {
                        Some(rng) => base + rng.random_range(-spread..=spread),
                        None => base,
                    },
                };

                let tf = f64::from(t);
                let mut value: f32 = self
                    .partials
                    .iter()
                    .map(|p| p.weight * (TAU * f64::from(freq * p.ratio) * tf).sin() as f32)
                    .sum();
                if let Some((rate, depth)) = self.tremolo {
                    value *= 1.0 + depth * (TAU as f32 * rate * t).sin();
                }

                let amp = self.gain * self.envelope.amplitude(t, duration) * value / self.normalize;
                amp.clamp(-PEAK, PEAK) as i16
            })
            .collect();

        Ok(samples)
    }
}

/// A voice with its length and playback volume
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub voice: Voice,
    pub duration: f32,
    /// Playback volume in `[0, 1]`
    pub volume: f32,
}

// === Sound catalog ===

/// Balloon burst: 400 Hz with a sharp exponential decay
pub fn balloon_pop() -> Patch {
    Patch {
        voice: Voice::sine(Pitch::Fixed(400.0), Envelope::ExpDecay { rate: 30.0 }, PEAK),
        duration: 0.1,
        volume: 0.3,
    }
}

/// Mole appearing: rising chirp 400 -> 1200 Hz
pub fn mole_pop() -> Patch {
    Patch {
        voice: Voice::sine(
            Pitch::Chirp {
                start: 400.0,
                sweep: 800.0,
            },
            Envelope::Power { exponent: 2.0 },
            12000.0,
        ),
        duration: 0.1,
        volume: 0.3,
    }
}

/// Successful tap: bright C-E-G chord
pub fn tap_chord() -> Patch {
    Patch {
        voice: Voice::chord(&[523.0, 659.0, 784.0], Envelope::Linear, 15000.0),
        duration: 0.15,
        volume: 0.35,
    }
}

/// Piano note with two overtones
pub fn piano_note(freq: f32) -> Patch {
    const PARTIALS: [Partial; 3] = [
        Partial::new(1.0, 1.0),
        Partial::new(2.0, 0.3),
        Partial::new(3.0, 0.1),
    ];
    Patch {
        voice: Voice::sine(Pitch::Fixed(freq), Envelope::PIANO, 20000.0)
            .with_partials(&PARTIALS, 1.4),
        duration: 0.5,
        volume: 0.6,
    }
}

/// Vehicle engine: fifth and octave overtones with an 8 Hz rumble
pub fn engine(freq: f32) -> Patch {
    const PARTIALS: [Partial; 3] = [
        Partial::new(1.0, 1.0),
        Partial::new(1.5, 0.5),
        Partial::new(2.0, 0.3),
    ];
    Patch {
        voice: Voice::sine(
            Pitch::Fixed(freq),
            Envelope::AttackRelease {
                attack: 0.1,
                release: 0.3,
            },
            15000.0,
        )
        .with_partials(&PARTIALS, 1.8)
        .with_tremolo(8.0, 0.2),
        duration: 1.5,
        volume: 0.4,
    }
}

/// Two-tone siren switching every quarter second
pub fn siren(low: f32, high: f32) -> Patch {
    Patch {
        voice: Voice::sine(
            Pitch::Alternate {
                low,
                high,
                rate: 2.0,
            },
            Envelope::AttackRelease {
                attack: 0.0,
                release: 0.2,
            },
            18000.0,
        ),
        duration: 2.0,
        volume: 0.35,
    }
}

/// Ship horn
pub fn horn(freq: f32) -> Patch {
    const PARTIALS: [Partial; 2] = [Partial::new(1.0, 1.0), Partial::new(2.0, 0.3)];
    Patch {
        voice: Voice::sine(
            Pitch::Fixed(freq),
            Envelope::AttackRelease {
                attack: 0.2,
                release: 0.5,
            },
            20000.0,
        )
        .with_partials(&PARTIALS, 1.3),
        duration: 1.5,
        volume: 0.4,
    }
}

/// Animal call stand-in: wobbling tone fading out
pub fn animal_call(freq: f32) -> Patch {
    Patch {
        voice: Voice::sine(
            Pitch::Vibrato {
                base: freq,
                rate: 5.0,
                depth: 0.1,
            },
            Envelope::ExpDecay { rate: 3.0 },
            20000.0,
        ),
        duration: 0.3,
        volume: 0.4,
    }
}

/// Short click for toolbar selection and pen dots
pub fn brush_click(seed: u64) -> Patch {
    Patch {
        voice: Voice::sine(
            Pitch::Jitter {
                base: 800.0,
                spread: 50.0,
                seed,
            },
            Envelope::Linear,
            8000.0,
        ),
        duration: 0.05,
        volume: 0.3,
    }
}

/// High glittering chord for stamps and clearing
pub fn sparkle() -> Patch {
    Patch {
        voice: Voice::chord(
            &[1200.0, 1500.0, 1800.0, 2100.0],
            Envelope::Power { exponent: 0.5 },
            10000.0,
        ),
        duration: 0.15,
        volume: 0.25,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SAMPLE_RATE;
    use proptest::prelude::*;

    #[test]
    fn test_balloon_pop_matches_closed_form() {
        let patch = balloon_pop();
        let samples = patch.voice.render(patch.duration, SAMPLE_RATE).unwrap();
        assert_eq!(samples.len(), 2205);
        assert_eq!(samples[0], 0);
        for (i, &s) in samples.iter().enumerate().step_by(97) {
            let t = i as f32 / SAMPLE_RATE as f32;
            let expected = 32767.0 * (-30.0 * t).exp() * (TAU as f32 * 400.0 * t).sin();
            assert!((f32::from(s) - expected).abs() <= 2.0, "sample {i}: {s} vs {expected}");
        }
    }

    #[test]
    fn test_balloon_pop_peak_bounded_by_envelope() {
        let patch = balloon_pop();
        let samples = patch.voice.render(patch.duration, SAMPLE_RATE).unwrap();
        for (i, &s) in samples.iter().enumerate() {
            let t = i as f32 / SAMPLE_RATE as f32;
            let bound = 32767.0 * (-30.0 * t).exp() + 1.0;
            assert!(f32::from(s).abs() <= bound);
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let voice = balloon_pop().voice;
        assert_eq!(
            voice.render(0.0, SAMPLE_RATE),
            Err(SynthError::InvalidDuration(0.0))
        );
        assert!(voice.render(-1.0, SAMPLE_RATE).is_err());
        assert!(voice.render(f32::NAN, SAMPLE_RATE).is_err());
        assert_eq!(
            voice.render(0.1, 0),
            Err(SynthError::InvalidSampleRate(0))
        );
    }

    #[test]
    fn test_piano_envelope_shape() {
        let env = Envelope::PIANO;
        assert_eq!(env.amplitude(0.0, 0.5), 0.0);
        assert!((env.amplitude(0.05, 0.5) - 1.0).abs() < 1e-5);
        assert!((env.amplitude(0.2, 0.5) - 0.7).abs() < 1e-5);
        assert!((env.amplitude(0.45, 0.5) - 0.35).abs() < 1e-4);
        assert!(env.amplitude(0.5, 0.5) < 1e-4);
    }

    #[test]
    fn test_attack_release_envelope() {
        let env = Envelope::AttackRelease {
            attack: 0.1,
            release: 0.3,
        };
        assert!((env.amplitude(0.05, 1.5) - 0.5).abs() < 1e-5);
        assert_eq!(env.amplitude(0.7, 1.5), 1.0);
        assert!((env.amplitude(1.35, 1.5) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_siren_alternates() {
        let patch = siren(400.0, 500.0);
        let Pitch::Alternate { rate, .. } = patch.voice.pitch else {
            panic!("siren should alternate");
        };
        assert!(((0.1f32 * rate).fract()) < 0.5);
        assert!(((0.3f32 * rate).fract()) >= 0.5);
        let samples = patch.voice.render(patch.duration, SAMPLE_RATE).unwrap();
        assert_eq!(samples.len(), 44100);
    }

    #[test]
    fn test_jitter_is_deterministic_per_seed() {
        let a = brush_click(7).voice.render(0.05, SAMPLE_RATE).unwrap();
        let b = brush_click(7).voice.render(0.05, SAMPLE_RATE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_chord_keeps_frequencies() {
        let voice = Voice::chord(&[523.0, 659.0, 784.0], Envelope::Linear, 1.0);
        let freqs: Vec<f32> = voice.partials.iter().map(|p| p.ratio * 523.0).collect();
        assert!((freqs[1] - 659.0).abs() < 1e-3);
        assert!((freqs[2] - 784.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_samples_never_exceed_peak(freq in 50.0f32..2000.0, gain in 0.0f32..100_000.0) {
            let voice = Voice::sine(Pitch::Fixed(freq), Envelope::Linear, gain)
                .with_tremolo(8.0, 0.9);
            let samples = voice.render(0.05, SAMPLE_RATE).unwrap();
            prop_assert!(samples.iter().all(|s| (*s as i32).abs() <= 32767));
        }

        #[test]
        fn prop_envelopes_stay_in_unit_range(t in 0.0f32..2.0) {
            let envs = [
                Envelope::ExpDecay { rate: 3.0 },
                Envelope::Linear,
                Envelope::Power { exponent: 0.5 },
                Envelope::PIANO,
                Envelope::AttackRelease { attack: 0.2, release: 0.5 },
            ];
            for env in envs {
                let a = env.amplitude(t, 2.0);
                prop_assert!((0.0..=1.0).contains(&a));
            }
        }
    }
}
