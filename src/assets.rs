//! Optional custom pictures and sounds
//!
//! Layout: `{root}/{game}/images/{key}.{ext}` and
//! `{root}/{game}/sounds/{key}.{ext}`. The first existing extension wins.
//! Everything is loaded once at startup; a file that fails to decode is
//! treated as missing and the game falls back to its procedural version.

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rodio::Source;

use crate::audio::{Clip, SynthError};

/// Image extensions in lookup order
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];
/// Sound extensions in lookup order
pub const SOUND_EXTENSIONS: [&str; 3] = ["ogg", "wav", "mp3"];

/// Volume for custom sound files
pub const CUSTOM_SOUND_VOLUME: f32 = 0.5;

/// Handle to a decoded custom picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

/// Asset keys a game looks for
#[derive(Debug, Clone, Copy)]
pub struct AssetManifest {
    /// Directory under the asset root
    pub game: &'static str,
    pub images: &'static [&'static str],
    pub sounds: &'static [&'static str],
}

/// A picture: a custom file, or drawn from shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Custom(ImageId),
    Procedural,
}

/// A sound: a custom file, or synthesized
#[derive(Debug, Clone, PartialEq)]
pub enum Sound {
    Custom(Clip),
    Synthesized(Clip),
}

impl Sound {
    pub fn clip(&self) -> &Clip {
        match self {
            Sound::Custom(clip) | Sound::Synthesized(clip) => clip,
        }
    }
}

#[derive(Debug)]
pub enum AssetError {
    Io(PathBuf, std::io::Error),
    Image(PathBuf, image::ImageError),
    Audio(PathBuf, rodio::decoder::DecoderError),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(path, e) => write!(f, "{}: {e}", path.display()),
            AssetError::Image(path, e) => write!(f, "{}: {e}", path.display()),
            AssetError::Audio(path, e) => write!(f, "{}: {e}", path.display()),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(_, e) => Some(e),
            AssetError::Image(_, e) => Some(e),
            AssetError::Audio(_, e) => Some(e),
        }
    }
}

/// First `{dir}/{key}.{ext}` that exists, trying `exts` in order
pub fn find_asset(dir: &Path, key: &str, exts: &[&str]) -> Option<PathBuf> {
    exts.iter()
        .map(|ext| dir.join(format!("{key}.{ext}")))
        .find(|path| path.is_file())
}

/// Decode a picture to RGBA
pub fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    let image = image::open(path).map_err(|e| AssetError::Image(path.to_path_buf(), e))?;
    Ok(image.to_rgba8())
}

/// Decode a sound file into a clip
pub fn load_sound(path: &Path, name: &'static str) -> Result<Clip, AssetError> {
    let bytes = std::fs::read(path).map_err(|e| AssetError::Io(path.to_path_buf(), e))?;
    let decoder = rodio::Decoder::new(Cursor::new(bytes))
        .map_err(|e| AssetError::Audio(path.to_path_buf(), e))?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<i16> = decoder.collect();
    Ok(Clip {
        name,
        samples: samples.into(),
        channels,
        sample_rate,
        volume: CUSTOM_SOUND_VOLUME,
    })
}

/// Every custom asset found at startup
#[derive(Debug, Default)]
pub struct AssetCache {
    images: Vec<RgbaImage>,
    image_index: HashMap<(String, String), ImageId>,
    sounds: HashMap<(String, String), Clip>,
}

impl AssetCache {
    /// No custom assets; every game uses its procedural fallbacks
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan `root` for every key in `manifests`
    pub fn load(root: &Path, manifests: &[AssetManifest]) -> Self {
        let mut cache = Self::empty();
        for manifest in manifests {
            let game_dir = root.join(manifest.game);

            let image_dir = game_dir.join("images");
            for key in manifest.images {
                let Some(path) = find_asset(&image_dir, key, &IMAGE_EXTENSIONS) else {
                    continue;
                };
                match load_image(&path) {
                    Ok(image) => {
                        cache.insert_image(manifest.game, key, image);
                    }
                    Err(e) => log::warn!("Ignoring unreadable picture {e}"),
                }
            }

            let sound_dir = game_dir.join("sounds");
            for key in manifest.sounds {
                let Some(path) = find_asset(&sound_dir, key, &SOUND_EXTENSIONS) else {
                    continue;
                };
                match load_sound(&path, key) {
                    Ok(clip) => cache.insert_sound(manifest.game, clip),
                    Err(e) => log::warn!("Ignoring unreadable sound {e}"),
                }
            }
        }

        log::info!(
            "Loaded {} custom pictures and {} custom sounds from {}",
            cache.images.len(),
            cache.sounds.len(),
            root.display()
        );
        cache
    }

    pub fn insert_image(&mut self, game: &str, key: &str, image: RgbaImage) -> ImageId {
        let id = ImageId(self.images.len());
        self.images.push(image);
        self.image_index
            .insert((game.to_string(), key.to_string()), id);
        id
    }

    /// Register a custom clip under its own name
    pub fn insert_sound(&mut self, game: &str, clip: Clip) {
        self.sounds
            .insert((game.to_string(), clip.name.to_string()), clip);
    }

    pub fn image(&self, id: ImageId) -> Option<&RgbaImage> {
        self.images.get(id.0)
    }

    /// Picture for `key`, custom if one was found
    pub fn sprite(&self, game: &str, key: &str) -> Sprite {
        self.image_index
            .get(&(game.to_string(), key.to_string()))
            .map_or(Sprite::Procedural, |id| Sprite::Custom(*id))
    }

    /// Sound for `key`: the custom clip if present, otherwise `synthesize()`
    pub fn sound(
        &self,
        game: &str,
        key: &'static str,
        synthesize: impl FnOnce() -> Result<Clip, SynthError>,
    ) -> Result<Sound, SynthError> {
        match self.sounds.get(&(game.to_string(), key.to_string())) {
            Some(clip) => Ok(Sound::Custom(clip.clone())),
            None => synthesize().map(Sound::Synthesized),
        }
    }

    /// Custom clip for `key`, if one was found
    pub fn custom_sound(&self, game: &str, key: &str) -> Option<&Clip> {
        self.sounds.get(&(game.to_string(), key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "baby_fun_box_assets_{}_{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const MANIFEST: AssetManifest = AssetManifest {
        game: "mole_tap",
        images: &["rabbit", "bear"],
        sounds: &["pop"],
    };

    #[test]
    fn test_find_asset_prefers_first_extension() {
        let dir = temp_root("find");
        std::fs::write(dir.join("dog.jpg"), b"x").unwrap();
        std::fs::write(dir.join("dog.png"), b"x").unwrap();
        assert_eq!(find_asset(&dir, "dog", &IMAGE_EXTENSIONS), Some(dir.join("dog.png")));
        assert_eq!(find_asset(&dir, "cat", &IMAGE_EXTENSIONS), None);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_load_decodes_valid_and_skips_malformed() {
        let root = temp_root("load");
        let images = root.join("mole_tap").join("images");
        std::fs::create_dir_all(&images).unwrap();
        RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]))
            .save(images.join("rabbit.png"))
            .unwrap();
        std::fs::write(images.join("bear.png"), b"definitely not a png").unwrap();
        let sounds = root.join("mole_tap").join("sounds");
        std::fs::create_dir_all(&sounds).unwrap();
        std::fs::write(sounds.join("pop.wav"), b"garbage").unwrap();

        let cache = AssetCache::load(&root, &[MANIFEST]);
        let Sprite::Custom(id) = cache.sprite("mole_tap", "rabbit") else {
            panic!("rabbit.png should load");
        };
        assert_eq!(cache.image(id).map(|i| i.dimensions()), Some((4, 4)));
        assert_eq!(cache.sprite("mole_tap", "bear"), Sprite::Procedural);
        assert!(cache.custom_sound("mole_tap", "pop").is_none());
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_missing_root_gives_empty_cache() {
        let cache = AssetCache::load(Path::new("/nonexistent/baby_fun_box"), &[MANIFEST]);
        assert_eq!(cache.sprite("mole_tap", "rabbit"), Sprite::Procedural);
    }

    #[test]
    fn test_sound_prefers_custom_clip() {
        let mut cache = AssetCache::empty();
        let synthesized = cache
            .sound("balloon_pop", "pop", || Clip::synthesize("pop", &synth::balloon_pop()))
            .unwrap();
        assert!(matches!(synthesized, Sound::Synthesized(_)));

        let custom = Clip {
            name: "pop",
            samples: vec![1i16, 2, 3].into(),
            channels: 1,
            sample_rate: 8000,
            volume: CUSTOM_SOUND_VOLUME,
        };
        cache.insert_sound("balloon_pop", custom.clone());
        let sound = cache
            .sound("balloon_pop", "pop", || panic!("fallback must not run"))
            .unwrap();
        assert_eq!(sound, Sound::Custom(custom));
    }
}
