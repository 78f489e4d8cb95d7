//! Baby Piano: eight rainbow keys, plus a song mode that lights the next key
//!
//! Free play just plays notes. Song mode walks an expected-note cursor
//! through a melody; rests are skipped, a wrong key only counts as an
//! attempt, and the song completes once nothing but rests remains.

use std::f32::consts::TAU;

use glam::Vec2;

use super::ui::{BackButton, Button, ButtonResponse, draw_progress};
use super::{Game, GameContext, GameKind, InputEvent, Key};
use crate::assets::AssetManifest;
use crate::audio::{Clip, ClipCache, SoundPlayer, SynthError, synth};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::renderer::{Frame, colors, darken, rgb, shapes, with_alpha};
use crate::sim::Rect;

pub const MANIFEST: AssetManifest = AssetManifest {
    game: "baby_piano",
    images: &["icon"],
    sounds: &["c4", "d4", "e4", "f4", "g4", "a4", "b4", "c5"],
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Sound asset key
    pub key: &'static str,
    pub freq: f32,
}

/// C4 up to C5
pub const NOTES: [Note; 8] = [
    Note { key: "c4", freq: 261.63 },
    Note { key: "d4", freq: 293.66 },
    Note { key: "e4", freq: 329.63 },
    Note { key: "f4", freq: 349.23 },
    Note { key: "g4", freq: 392.00 },
    Note { key: "a4", freq: 440.00 },
    Note { key: "b4", freq: 493.88 },
    Note { key: "c5", freq: 523.25 },
];

pub const KEY_COLORS: [[f32; 4]; 8] = [
    colors::RED,
    colors::ORANGE,
    colors::YELLOW,
    colors::GREEN,
    colors::SKY,
    colors::BLUE,
    colors::PURPLE,
    colors::PINK,
];

/// Marks a silent beat in a melody
pub const REST: i8 = -1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Song {
    pub title: &'static str,
    /// Key indices into [`NOTES`], or [`REST`]
    pub notes: &'static [i8],
    /// Seconds per beat
    pub tempo: f32,
}

pub const SONGS: [Song; 4] = [
    Song {
        title: "Twinkle Twinkle",
        notes: &[
            0, 0, 4, 4, 5, 5, 4, -1, //
            3, 3, 2, 2, 1, 1, 0, -1, //
            4, 4, 3, 3, 2, 2, 1, -1, //
            4, 4, 3, 3, 2, 2, 1, -1, //
            0, 0, 4, 4, 5, 5, 4, -1, //
            3, 3, 2, 2, 1, 1, 0,
        ],
        tempo: 0.5,
    },
    Song {
        title: "Frog Song",
        notes: &[
            0, 1, 2, 3, 2, 1, 0, -1, //
            2, 3, 4, 5, 4, 3, 2, -1, //
            0, -1, 0, -1, 0, -1, 0, -1, //
            0, 1, 2, 3, 2, 1, 0,
        ],
        tempo: 0.4,
    },
    Song {
        title: "Butterfly",
        notes: &[
            4, 2, 2, -1, 3, 1, 1, -1, //
            0, 1, 2, 3, 4, 4, 4, -1, //
            4, 2, 2, 2, 3, 1, 1, 1, //
            0, 2, 4, 4, 2, 2, 2,
        ],
        tempo: 0.5,
    },
    Song {
        title: "Mary Had a Little Lamb",
        notes: &[
            2, 1, 0, 1, 2, 2, 2, -1, //
            1, 1, 1, -1, 2, 4, 4, -1, //
            2, 1, 0, 1, 2, 2, 2, 2, //
            1, 1, 2, 1, 0,
        ],
        tempo: 0.45,
    },
];

/// Expected-note cursor over one melody
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongProgress {
    notes: &'static [i8],
    position: usize,
    correct: u32,
    attempts: u32,
    completed: bool,
}

impl SongProgress {
    pub fn new(notes: &'static [i8]) -> Self {
        let mut progress = Self {
            notes,
            position: 0,
            correct: 0,
            attempts: 0,
            completed: false,
        };
        progress.skip_rests();
        progress.completed = progress.position >= notes.len();
        progress
    }

    fn skip_rests(&mut self) {
        while self.notes.get(self.position) == Some(&REST) {
            self.position += 1;
        }
    }

    /// Register a key press; true if it was the expected note
    pub fn press(&mut self, key: usize) -> bool {
        if self.completed {
            return false;
        }
        self.skip_rests();
        let Some(&expected) = self.notes.get(self.position) else {
            self.completed = true;
            return false;
        };

        self.attempts += 1;
        if usize::try_from(expected).ok() != Some(key) {
            return false;
        }
        self.correct += 1;
        self.position += 1;
        self.skip_rests();
        if self.position >= self.notes.len() {
            self.completed = true;
        }
        true
    }

    /// Key to light up next
    pub fn expected(&self) -> Option<usize> {
        if self.completed {
            return None;
        }
        self.notes
            .get(self.position)
            .and_then(|&n| usize::try_from(n).ok())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Fraction of playable notes already hit, 0..=1
    pub fn fraction(&self) -> f32 {
        let total = self.notes.iter().filter(|&&n| n != REST).count();
        if total == 0 {
            return 0.0;
        }
        let done = self.notes[..self.position.min(self.notes.len())]
            .iter()
            .filter(|&&n| n != REST)
            .count();
        done as f32 / total as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PianoMode {
    FreePlay,
    SongSelect,
    Song { index: usize, progress: SongProgress },
}

const PRESS_DURATION: f32 = 0.2;
const NOTE_DISPLAY_DURATION: f32 = 1.0;
/// Highlight pulse speed in rad/s
const PULSE_SPEED: f32 = 4.0;

const KEY_PADDING: f32 = 20.0;
const KEY_TOP: f32 = 170.0;
const KEY_GAP: f32 = 4.0;
const KEY_RADIUS: f32 = 15.0;

const SHADOW: [f32; 4] = rgb(100, 100, 100);
const KEY_BORDER: [f32; 4] = rgb(50, 50, 50);
const HIGHLIGHT: [f32; 4] = rgb(255, 255, 100);
const GLOW: [f32; 4] = rgb(255, 255, 200);
const STAR: [f32; 4] = rgb(255, 220, 50);
const MODE_BUTTON_HOVER: [f32; 4] = rgb(150, 100, 180);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PianoKey {
    pub rect: Rect,
    pub color: [f32; 4],
    pub pressed_color: [f32; 4],
    /// Seconds since pressed, while the press animation runs
    pub pressed: Option<f32>,
}

impl PianoKey {
    /// Rainbow row spanning the screen width
    pub fn row() -> [PianoKey; 8] {
        let key_w = ((SCREEN_WIDTH - KEY_PADDING * 2.0) / NOTES.len() as f32).floor();
        let key_h = SCREEN_HEIGHT - 280.0;
        std::array::from_fn(|i| PianoKey {
            rect: Rect::new(KEY_PADDING + i as f32 * key_w, KEY_TOP, key_w - KEY_GAP, key_h),
            color: KEY_COLORS[i],
            pressed_color: darken(KEY_COLORS[i], 50),
            pressed: None,
        })
    }
}

fn song_button_rect(index: usize) -> Rect {
    let (w, h, spacing) = (280.0, 80.0, 20.0);
    Rect::new((SCREEN_WIDTH - w) / 2.0, 200.0 + index as f32 * (h + spacing), w, h)
}

pub struct BabyPiano {
    mode: PianoMode,
    keys: [PianoKey; 8],
    /// Custom recordings, by key index
    custom: [Option<Clip>; 8],
    generated: ClipCache,
    /// Last played key and seconds since
    last_note: Option<(usize, f32)>,
    pulse: f32,
    mode_button: Button,
    song_buttons: [Button; SONGS.len()],
    back: BackButton,
    quit: bool,
}

impl BabyPiano {
    pub fn new(ctx: &GameContext) -> Result<Self, SynthError> {
        let custom = std::array::from_fn(|i| {
            ctx.assets
                .custom_sound(MANIFEST.game, NOTES[i].key)
                .cloned()
        });
        Ok(Self {
            mode: PianoMode::FreePlay,
            keys: PianoKey::row(),
            custom,
            generated: ClipCache::new(),
            last_note: None,
            pulse: 0.0,
            mode_button: Button::new(Rect::new(SCREEN_WIDTH - 180.0, 20.0, 160.0, 50.0)),
            song_buttons: std::array::from_fn(|i| Button::new(song_button_rect(i))),
            back: BackButton::new(),
            quit: false,
        })
    }

    pub fn mode(&self) -> &PianoMode {
        &self.mode
    }

    /// Progress of the song being played, if any
    pub fn song_progress(&self) -> Option<&SongProgress> {
        match &self.mode {
            PianoMode::Song { progress, .. } => Some(progress),
            _ => None,
        }
    }

    /// Key to light up, in song mode
    pub fn highlighted(&self) -> Option<usize> {
        self.song_progress().and_then(SongProgress::expected)
    }

    fn back_out(&mut self) {
        self.mode = match self.mode {
            PianoMode::Song { .. } => PianoMode::SongSelect,
            PianoMode::SongSelect => PianoMode::FreePlay,
            PianoMode::FreePlay => {
                self.quit = true;
                PianoMode::FreePlay
            }
        };
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            PianoMode::FreePlay => PianoMode::SongSelect,
            _ => PianoMode::FreePlay,
        };
    }

    pub fn select_song(&mut self, index: usize) {
        let song = &SONGS[index];
        log::info!("Song selected: {}", song.title);
        self.mode = PianoMode::Song {
            index,
            progress: SongProgress::new(song.notes),
        };
    }

    fn restart_song(&mut self) {
        if let PianoMode::Song { index, .. } = self.mode {
            self.select_song(index);
        }
    }

    fn song_completed(&self) -> bool {
        self.song_progress().is_some_and(SongProgress::is_completed)
    }

    pub fn play_key(&mut self, index: usize, audio: &mut dyn SoundPlayer) {
        self.keys[index].pressed = Some(0.0);
        self.last_note = Some((index, 0.0));

        let note = &NOTES[index];
        match &self.custom[index] {
            Some(clip) => audio.play(clip),
            None => match self.generated.get_or_render(note.key, note.freq, synth::piano_note) {
                Ok(clip) => audio.play(clip),
                Err(err) => log::warn!("Could not render {}: {err}", note.key),
            },
        }

        if let PianoMode::Song { progress, .. } = &mut self.mode {
            let was_completed = progress.is_completed();
            progress.press(index);
            if !was_completed && progress.is_completed() {
                log::info!(
                    "Song complete: {}/{} correct",
                    progress.correct(),
                    progress.attempts()
                );
            }
        }
    }

    fn key_at(&self, p: Vec2) -> Option<usize> {
        self.keys.iter().position(|k| k.rect.contains(p))
    }

    fn draw_key(&self, frame: &mut Frame, index: usize, highlighted: bool) {
        let key = &self.keys[index];
        let (rect, color) = match key.pressed {
            Some(t) => {
                let offset = 10.0 * (1.0 - t / PRESS_DURATION);
                let r = key.rect;
                (Rect::new(r.x, r.y + offset, r.w, r.h - offset), key.pressed_color)
            }
            None => (key.rect, key.color),
        };

        frame.rounded_rect(rect.translate(Vec2::new(0.0, 5.0)), KEY_RADIUS, SHADOW);
        if highlighted {
            frame.rounded_rect(rect.inflate(7.0), KEY_RADIUS + 3.0, HIGHLIGHT);
        }
        frame.rounded_rect(rect, KEY_RADIUS, KEY_BORDER);
        frame.rounded_rect(rect.inflate(-3.0), KEY_RADIUS - 3.0, color);

        if highlighted {
            let pulse = (self.pulse.sin() + 1.0) / 2.0;
            let alpha = (100.0 + 80.0 * pulse) / 255.0;
            frame.rounded_rect(rect.inflate(-3.0), KEY_RADIUS - 3.0, with_alpha(GLOW, alpha));
            let star = Vec2::new(rect.center().x, rect.y + 30.0);
            frame.push(shapes::star(star, 22.0, 9.0, 5, STAR));
        }

        // Note dot where a label would sit
        frame.circle(
            Vec2::new(rect.center().x, rect.bottom() - 35.0),
            12.0,
            colors::WHITE,
        );

        if let Some(t) = key.pressed {
            let alpha = 100.0 / 255.0 * (1.0 - t / PRESS_DURATION);
            frame.rounded_rect(rect, KEY_RADIUS, with_alpha(colors::WHITE, alpha));
        }
    }

    fn draw_mode_button(&self, frame: &mut Frame) {
        let button = &self.mode_button;
        frame.rounded_rect(button.rect, 10.0, button.color(colors::PURPLE, MODE_BUTTON_HOVER));
        let c = button.rect.center();
        if matches!(self.mode, PianoMode::FreePlay) {
            // Eighth note: go to songs
            frame.ellipse(c + Vec2::new(-6.0, 10.0), Vec2::new(9.0, 7.0), colors::WHITE);
            frame.line(c + Vec2::new(2.0, 10.0), c + Vec2::new(2.0, -16.0), 3.0, colors::WHITE);
            frame.line(c + Vec2::new(2.0, -16.0), c + Vec2::new(12.0, -8.0), 3.0, colors::WHITE);
        } else {
            // Three little keys: back to free play
            for i in 0..3 {
                let x = c.x - 24.0 + i as f32 * 17.0;
                frame.rect(Rect::new(x, c.y - 14.0, 14.0, 28.0), colors::WHITE);
            }
        }
    }

    fn draw_song_select(&self, frame: &mut Frame) {
        for (i, (button, song)) in self.song_buttons.iter().zip(&SONGS).enumerate() {
            let base = KEY_COLORS[i % KEY_COLORS.len()];
            frame.rounded_rect(button.rect, 10.0, button.color(base, darken(base, 30)));

            // Opening bars as colored dots
            let preview: Vec<usize> = song
                .notes
                .iter()
                .filter_map(|&n| usize::try_from(n).ok())
                .take(8)
                .collect();
            let spacing = button.rect.w / (preview.len() + 1) as f32;
            for (j, &note) in preview.iter().enumerate() {
                let at = Vec2::new(
                    button.rect.x + spacing * (j + 1) as f32,
                    button.rect.center().y,
                );
                frame.circle(at, 11.0, colors::WHITE);
                frame.circle(at, 8.0, KEY_COLORS[note]);
            }
        }
    }

    fn draw_song_status(&self, frame: &mut Frame, progress: &SongProgress) {
        if progress.is_completed() {
            let c = Vec2::new(SCREEN_WIDTH / 2.0, 95.0);
            frame.push(shapes::star(c, 50.0, 22.0, 5, colors::PINK));
            for dx in [-110.0, 110.0] {
                frame.push(shapes::star(c + Vec2::new(dx, 10.0), 28.0, 12.0, 5, STAR));
            }
        } else {
            let bar = Rect::new((SCREEN_WIDTH - 300.0) / 2.0, 85.0, 300.0, 20.0);
            draw_progress(frame, bar, progress.fraction(), colors::GREEN);
        }
    }
}

impl Game for BabyPiano {
    fn kind(&self) -> GameKind {
        GameKind::BabyPiano
    }

    fn on_enter(&mut self) {
        self.mode = PianoMode::FreePlay;
        self.last_note = None;
        log::info!("Entered {}", self.kind().name());
    }

    fn handle_event(&mut self, event: &InputEvent, audio: &mut dyn SoundPlayer) {
        match self.back.handle(event) {
            ButtonResponse::Clicked => {
                self.back_out();
                return;
            }
            ButtonResponse::Consumed => return,
            ButtonResponse::Ignored => {}
        }
        if *event == InputEvent::Key(Key::Escape) {
            self.back_out();
            return;
        }

        if self.mode == PianoMode::SongSelect {
            for i in 0..self.song_buttons.len() {
                match self.song_buttons[i].handle(event) {
                    ButtonResponse::Clicked => {
                        self.select_song(i);
                        return;
                    }
                    ButtonResponse::Consumed => return,
                    ButtonResponse::Ignored => {}
                }
            }
            return;
        }

        match self.mode_button.handle(event) {
            ButtonResponse::Clicked => {
                self.toggle_mode();
                return;
            }
            ButtonResponse::Consumed => return,
            ButtonResponse::Ignored => {}
        }

        match *event {
            InputEvent::Key(Key::Digit(d)) if (1..=8).contains(&d) => {
                self.play_key(usize::from(d - 1), audio);
            }
            InputEvent::Key(Key::Space) if self.song_completed() => self.restart_song(),
            InputEvent::PointerDown(_) if self.song_completed() => self.restart_song(),
            InputEvent::PointerDown(p) => {
                if let Some(index) = self.key_at(p) {
                    self.play_key(index, audio);
                }
            }
            _ => {}
        }
    }

    fn update(&mut self, dt: f32, _audio: &mut dyn SoundPlayer) {
        for key in &mut self.keys {
            if let Some(t) = key.pressed.as_mut() {
                *t += dt;
                if *t >= PRESS_DURATION {
                    key.pressed = None;
                }
            }
        }

        if let Some((_, t)) = self.last_note.as_mut() {
            *t += dt;
            if *t >= NOTE_DISPLAY_DURATION {
                self.last_note = None;
            }
        }

        self.pulse = (self.pulse + dt * PULSE_SPEED) % TAU;
    }

    fn draw<'a>(&'a self, frame: &mut Frame<'a>) {
        frame.set_clear(colors::BACKGROUND_CREAM);

        if self.mode == PianoMode::SongSelect {
            self.draw_song_select(frame);
            self.back.draw(frame);
            return;
        }

        match &self.mode {
            PianoMode::Song { progress, .. } => self.draw_song_status(frame, progress),
            _ => {
                if let Some((index, t)) = self.last_note {
                    let fade = (1.0 - t / NOTE_DISPLAY_DURATION).clamp(0.0, 1.0);
                    let c = Vec2::new(SCREEN_WIDTH / 2.0, 100.0);
                    frame.circle(c, 30.0 + 10.0 * fade, with_alpha(KEY_COLORS[index], fade));
                }
            }
        }

        let highlighted = self.highlighted();
        for index in 0..self.keys.len() {
            self.draw_key(frame, index, highlighted == Some(index));
        }
        self.draw_mode_button(frame);
        self.back.draw(frame);
    }

    fn return_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingPlayer;
    use crate::games::testing::{context, down, tap};
    use proptest::prelude::*;

    fn game() -> BabyPiano {
        let mut game = BabyPiano::new(&context()).unwrap();
        game.on_enter();
        game
    }

    fn key_center(index: usize) -> Vec2 {
        PianoKey::row()[index].rect.center()
    }

    #[test]
    fn test_trailing_rest_completes_song() {
        let mut song = SongProgress::new(&[0, 0, 4, 4, -1]);
        for key in [0, 0, 4, 4] {
            assert!(song.press(key));
        }
        assert_eq!(song.correct(), 4);
        assert!(song.is_completed());
        assert_eq!(song.expected(), None);
    }

    #[test]
    fn test_wrong_note_counts_attempt_only() {
        let mut song = SongProgress::new(&[2, 1, 0]);
        assert!(!song.press(5));
        assert_eq!(song.attempts(), 1);
        assert_eq!(song.correct(), 0);
        assert_eq!(song.position(), 0);
        assert_eq!(song.expected(), Some(2));
    }

    #[test]
    fn test_rests_are_skipped() {
        let mut song = SongProgress::new(&[-1, -1, 3, -1, 5]);
        assert_eq!(song.expected(), Some(3));
        song.press(3);
        assert_eq!(song.expected(), Some(5));
        assert_eq!(song.position(), 4);
    }

    #[test]
    fn test_progress_fraction() {
        let mut song = SongProgress::new(&[0, -1, 1, 2, 3]);
        assert_eq!(song.fraction(), 0.0);
        song.press(0);
        song.press(1);
        assert!((song.fraction() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_key_layout() {
        let keys = PianoKey::row();
        assert_eq!(keys[0].rect, Rect::new(20.0, 170.0, 119.0, 488.0));
        assert_eq!(keys[7].rect.x, 20.0 + 7.0 * 123.0);
    }

    #[test]
    fn test_tap_key_plays_note_and_animates() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let c = key_center(2);
        game.handle_event(&down(c.x, c.y), &mut audio);

        assert_eq!(audio.played, vec!["e4"]);
        assert!(game.keys[2].pressed.is_some());
        game.update(0.25, &mut audio);
        assert!(!game.keys[2].pressed.is_some());
    }

    #[test]
    fn test_generated_notes_are_cached() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        for _ in 0..3 {
            game.handle_event(&InputEvent::Key(Key::Digit(1)), &mut audio);
        }
        assert_eq!(audio.count("c4"), 3);
        assert_eq!(game.generated.len(), 1);
    }

    #[test]
    fn test_digits_outside_keyboard_ignored() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.handle_event(&InputEvent::Key(Key::Digit(0)), &mut audio);
        game.handle_event(&InputEvent::Key(Key::Digit(9)), &mut audio);
        assert!(audio.played.is_empty());
    }

    #[test]
    fn test_mode_navigation_and_back() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let mode_button = game.mode_button.rect.center();

        tap(&mut game, &mut audio, mode_button.x, mode_button.y);
        assert_eq!(*game.mode(), PianoMode::SongSelect);

        let song = song_button_rect(1).center();
        tap(&mut game, &mut audio, song.x, song.y);
        assert!(matches!(game.mode(), PianoMode::Song { index: 1, .. }));
        assert_eq!(game.highlighted(), Some(0));

        game.handle_event(&InputEvent::Key(Key::Escape), &mut audio);
        assert_eq!(*game.mode(), PianoMode::SongSelect);
        game.handle_event(&InputEvent::Key(Key::Escape), &mut audio);
        assert_eq!(*game.mode(), PianoMode::FreePlay);
        assert!(!game.return_requested());
        game.handle_event(&InputEvent::Key(Key::Escape), &mut audio);
        assert!(game.return_requested());
    }

    #[test]
    fn test_song_button_selects_on_release() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.mode = PianoMode::SongSelect;
        let song = song_button_rect(0).center();
        game.handle_event(&down(song.x, song.y), &mut audio);
        assert_eq!(*game.mode(), PianoMode::SongSelect);
        game.handle_event(&InputEvent::PointerUp(song), &mut audio);
        assert!(matches!(game.mode(), PianoMode::Song { index: 0, .. }));
    }

    #[test]
    fn test_mode_button_leaves_song() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.select_song(0);
        let c = game.mode_button.rect.center();
        tap(&mut game, &mut audio, c.x, c.y);
        assert_eq!(*game.mode(), PianoMode::FreePlay);
        assert!(audio.played.is_empty());
    }

    #[test]
    fn test_playing_a_whole_song_then_restart() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.select_song(3);

        let melody: Vec<usize> = SONGS[3]
            .notes
            .iter()
            .filter_map(|&n| usize::try_from(n).ok())
            .collect();
        for &key in &melody {
            assert_eq!(game.highlighted(), Some(key));
            let c = key_center(key);
            game.handle_event(&down(c.x, c.y), &mut audio);
        }
        let progress = game.song_progress().unwrap();
        assert!(progress.is_completed());
        let playable = SONGS[3].notes.iter().filter(|&&n| n != REST).count();
        assert_eq!(progress.correct() as usize, playable);
        assert_eq!(game.highlighted(), None);

        // Any tap restarts without playing a note
        let played = audio.played.len();
        let c = key_center(0);
        game.handle_event(&down(c.x, c.y), &mut audio);
        assert_eq!(audio.played.len(), played);
        let progress = game.song_progress().unwrap();
        assert!(!progress.is_completed());
        assert_eq!(progress.correct(), 0);
    }

    #[test]
    fn test_space_restarts_only_when_complete() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.select_song(0);
        game.handle_event(&InputEvent::Key(Key::Digit(1)), &mut audio);
        game.handle_event(&InputEvent::Key(Key::Space), &mut audio);
        assert_eq!(game.song_progress().unwrap().correct(), 1);
    }

    #[test]
    fn test_song_select_draws_buttons() {
        let mut game = game();
        game.mode = PianoMode::SongSelect;
        let mut frame = Frame::default();
        game.draw(&mut frame);
        assert!(!frame.is_empty());
    }

    proptest! {
        #[test]
        fn prop_cursor_never_moves_back(
            song in 0..SONGS.len(),
            presses in proptest::collection::vec(0usize..8, 0..80),
        ) {
            let mut progress = SongProgress::new(SONGS[song].notes);
            let mut last = progress.position();
            for key in presses {
                progress.press(key);
                prop_assert!(progress.position() >= last);
                prop_assert!(progress.correct() <= progress.attempts());
                last = progress.position();
            }
        }
    }
}
