//! Audio system
//!
//! Sounds are PCM clips, either synthesized at startup or decoded from
//! custom files. Playback is fire-and-forget through rodio.

pub mod synth;

use std::collections::HashMap;
use std::sync::Arc;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::consts::SAMPLE_RATE;
pub use synth::{Envelope, Partial, Patch, Pitch, SynthError, Voice};

/// A playable buffer of 16-bit samples
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// Sound key, e.g. `"pop"` or `"dog"`
    pub name: &'static str,
    pub samples: Arc<[i16]>,
    pub channels: u16,
    pub sample_rate: u32,
    /// Per-clip volume in `[0, 1]`
    pub volume: f32,
}

impl Clip {
    /// Synthesize a catalog patch
    pub fn synthesize(name: &'static str, patch: &Patch) -> Result<Self, SynthError> {
        let samples = patch.voice.render(patch.duration, SAMPLE_RATE)?;
        Ok(Self {
            name,
            samples: samples.into(),
            channels: 1,
            sample_rate: SAMPLE_RATE,
            volume: patch.volume,
        })
    }

    /// Length in seconds
    pub fn duration(&self) -> f32 {
        let frames = self.samples.len() / usize::from(self.channels.max(1));
        frames as f32 / self.sample_rate.max(1) as f32
    }
}

/// Anything that can play a clip
pub trait SoundPlayer {
    fn play(&mut self, clip: &Clip);
}

/// Generated clips keyed by frequency
#[derive(Debug, Default)]
pub struct ClipCache {
    clips: HashMap<u32, Clip>,
}

impl ClipCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached clip for `freq`, rendering it on first use
    pub fn get_or_render(
        &mut self,
        name: &'static str,
        freq: f32,
        patch: impl FnOnce(f32) -> Patch,
    ) -> Result<&Clip, SynthError> {
        let key = freq.to_bits();
        if !self.clips.contains_key(&key) {
            let clip = Clip::synthesize(name, &patch(freq))?;
            self.clips.insert(key, clip);
        }
        Ok(&self.clips[&key])
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Audio manager for the app
pub struct AudioManager {
    output: Option<(OutputStream, OutputStreamHandle)>,
    /// Gain applied to every clip, already folded with mute
    volume: f32,
}

impl AudioManager {
    /// Open the default output device, playing at `settings.effective_volume()`
    pub fn from_settings(settings: &crate::Settings) -> Self {
        // No output device is not an error; the games just stay silent
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(e) => {
                log::warn!("Failed to open audio output ({e}) - audio disabled");
                None
            }
        };
        Self::with_output(output, settings)
    }

    fn with_output(
        output: Option<(OutputStream, OutputStreamHandle)>,
        settings: &crate::Settings,
    ) -> Self {
        Self {
            output,
            volume: settings.effective_volume(),
        }
    }
}

impl SoundPlayer for AudioManager {
    fn play(&mut self, clip: &Clip) {
        let vol = self.volume * clip.volume;
        if vol <= 0.0 || clip.samples.is_empty() {
            return;
        }

        let Some((_, handle)) = &self.output else {
            return;
        };

        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.set_volume(vol);
                sink.append(SamplesBuffer::new(
                    clip.channels,
                    clip.sample_rate,
                    clip.samples.to_vec(),
                ));
                sink.detach();
            }
            Err(e) => log::warn!("Could not play '{}': {e}", clip.name),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_clip_metadata() {
        let clip = Clip::synthesize("pop", &synth::balloon_pop()).unwrap();
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.sample_rate, SAMPLE_RATE);
        assert!((clip.duration() - 0.1).abs() < 1e-3);
        assert_eq!(clip.volume, 0.3);
    }

    #[test]
    fn test_clip_cache_renders_once() {
        let mut cache = ClipCache::new();
        let mut renders = 0;
        for _ in 0..3 {
            cache
                .get_or_render("note", 440.0, |f| {
                    renders += 1;
                    synth::piano_note(f)
                })
                .unwrap();
        }
        assert_eq!(renders, 1);
        cache.get_or_render("note", 261.63, synth::piano_note).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cached_clip_matches_fresh_render() {
        let mut cache = ClipCache::new();
        let cached = cache
            .get_or_render("note", 392.0, synth::piano_note)
            .unwrap()
            .clone();
        let fresh = Clip::synthesize("note", &synth::piano_note(392.0)).unwrap();
        assert_eq!(cached, fresh);
    }

    #[test]
    fn test_manager_volume_follows_settings() {
        let settings = crate::Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        let audio = AudioManager::with_output(None, &settings);
        assert!((audio.volume - 0.25).abs() < 1e-6);

        let muted = crate::Settings {
            muted: true,
            ..settings
        };
        let mut audio = AudioManager::with_output(None, &muted);
        assert_eq!(audio.volume, 0.0);
        // Silent without a device
        audio.play(&Clip::synthesize("pop", &synth::balloon_pop()).unwrap());
    }
}
