use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scale::Scale;

/// Generation "taste" knob, independent of the musical style knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MusicGenerationMode {
    #[default]
    #[serde(rename = "QUALITY")]
    Quality,
    #[serde(rename = "DIVERSITY")]
    Diversity,
    #[serde(rename = "VOCALIZATION")]
    Vocalization,
}

/// A bundle of independently validated scalars steering the generator.
///
/// Construct via [`MusicConfig::default`], then call [`MusicConfig::validate`]
/// before accepting any externally supplied values (a partial patch merged
/// over the current config, for instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MusicConfig {
    pub guidance: f64,
    pub bpm: i64,
    pub density: f64,
    pub brightness: f64,
    pub scale: Scale,
    pub mute_bass: bool,
    pub mute_drums: bool,
    pub only_bass_and_drums: bool,
    pub music_generation_mode: MusicGenerationMode,
    pub temperature: f64,
    pub top_k: i64,
    pub seed: Option<i64>,
}

impl Default for MusicConfig {
    fn default() -> Self {
        MusicConfig {
            guidance: 4.0,
            bpm: 130,
            density: 0.5,
            brightness: 0.5,
            scale: Scale::default(),
            mute_bass: false,
            mute_drums: false,
            only_bass_and_drums: false,
            music_generation_mode: MusicGenerationMode::default(),
            temperature: 1.1,
            top_k: 40,
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MusicConfigError {
    #[error("guidance must be in [0.0, 6.0]")]
    GuidanceOutOfRange,
    #[error("bpm must be in [60, 200]")]
    BpmOutOfRange,
    #[error("density must be in [0.0, 1.0]")]
    DensityOutOfRange,
    #[error("brightness must be in [0.0, 1.0]")]
    BrightnessOutOfRange,
    #[error("temperature must be in [0.0, 3.0]")]
    TemperatureOutOfRange,
    #[error("top_k must be in [1, 1000]")]
    TopKOutOfRange,
    #[error("seed must be in [0, 2^31-1]")]
    SeedOutOfRange,
}

impl MusicConfig {
    pub fn validate(&self) -> Result<(), MusicConfigError> {
        if !(0.0..=6.0).contains(&self.guidance) {
            return Err(MusicConfigError::GuidanceOutOfRange);
        }
        if !(60..=200).contains(&self.bpm) {
            return Err(MusicConfigError::BpmOutOfRange);
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(MusicConfigError::DensityOutOfRange);
        }
        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(MusicConfigError::BrightnessOutOfRange);
        }
        if !(0.0..=3.0).contains(&self.temperature) {
            return Err(MusicConfigError::TemperatureOutOfRange);
        }
        if !(1..=1000).contains(&self.top_k) {
            return Err(MusicConfigError::TopKOutOfRange);
        }
        if let Some(seed) = self.seed {
            if !(0..=2_i64.pow(31) - 1).contains(&seed) {
                return Err(MusicConfigError::SeedOutOfRange);
            }
        }
        Ok(())
    }
}
