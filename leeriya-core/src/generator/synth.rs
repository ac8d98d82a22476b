//! Deterministic additive-synthesis mock generator math.
//!
//! Kept as pure functions over an explicit phase accumulator so the
//! audio-framing property (every sample in range, exact byte count) can be
//! tested without spinning up a task or a clock.

use leeriya_types::music_config::MusicGenerationMode;
use leeriya_types::MusicConfig;

pub const SAMPLE_RATE_HZ: u32 = 48_000;
pub const CHANNELS: u32 = 2;
pub const FRAME_MS: u32 = 20;
pub const FRAME_SAMPLES: usize = (SAMPLE_RATE_HZ as u64 * FRAME_MS as u64 / 1000) as usize;
pub const FRAME_BYTES: usize = FRAME_SAMPLES * CHANNELS as usize * 2;

const PHASE_WRAP: f64 = 10_000.0;

/// Mean of the room's prompt weights, or 0 if there are none.
pub fn prompt_bias(weights: &[f64]) -> f64 {
    if weights.is_empty() {
        0.0
    } else {
        weights.iter().sum::<f64>() / weights.len() as f64
    }
}

/// Renders one frame (`FRAME_SAMPLES` per channel) of interleaved 16-bit
/// little-endian stereo PCM, advancing `phase` in place.
pub fn render_pcm16_stereo(config: &MusicConfig, prompt_bias: f64, phase: &mut f64) -> Vec<u8> {
    let mut base_freq = 90.0 + 0.55 * config.bpm as f64 + 180.0 * config.brightness + 8.0 * prompt_bias;
    match config.music_generation_mode {
        MusicGenerationMode::Diversity => base_freq *= 1.07,
        MusicGenerationMode::Vocalization => base_freq *= 1.18,
        MusicGenerationMode::Quality => {}
    }
    let lfo_freq = 0.35 + 0.8 * config.density;
    let guidance_mix = (config.guidance / 6.0).clamp(0.05, 1.0);
    let mut amplitude = 0.12 + 0.26 * config.density;
    if config.mute_bass {
        amplitude *= 0.7;
    }
    if config.only_bass_and_drums {
        amplitude *= 0.85;
    }

    let step = 2.0 * std::f64::consts::PI * base_freq / SAMPLE_RATE_HZ as f64;
    let lfo_step = 2.0 * std::f64::consts::PI * lfo_freq / SAMPLE_RATE_HZ as f64;
    let frame_phase = *phase;

    let mut buf = Vec::with_capacity(FRAME_BYTES);
    for idx in 0..FRAME_SAMPLES {
        let idx = idx as f64;
        let carrier_phase = frame_phase + idx * step;

        let carrier = carrier_phase.sin();
        let overtone = (frame_phase * 1.9 + idx * step * 1.92).sin();
        let lfo = (frame_phase * 0.08 + idx * lfo_step).sin();

        let mut sample = carrier * (0.75 + 0.25 * guidance_mix) + overtone * 0.35 * (0.5 + guidance_mix);
        sample *= 1.0 + 0.25 * lfo;
        sample *= amplitude;
        if config.mute_drums {
            sample *= 0.8;
        }
        let left = sample.clamp(-1.0, 1.0);
        let right = (0.92 * sample + 0.08 * (frame_phase * 0.5).sin()).clamp(-1.0, 1.0);

        buf.extend_from_slice(&to_i16(left).to_le_bytes());
        buf.extend_from_slice(&to_i16(right).to_le_bytes());
    }

    *phase += FRAME_SAMPLES as f64 * step;
    if *phase > PHASE_WRAP {
        *phase %= PHASE_WRAP;
    }

    buf
}

fn to_i16(x: f64) -> i16 {
    (x * 32767.0).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_has_exact_byte_count() {
        let config = MusicConfig::default();
        let mut phase = 0.0;
        let buf = render_pcm16_stereo(&config, 0.0, &mut phase);
        assert_eq!(buf.len(), FRAME_BYTES);
        assert_eq!(FRAME_BYTES, 3_840);
        assert_eq!(FRAME_SAMPLES, 960);
    }

    #[test]
    fn samples_are_valid_i16() {
        let config = MusicConfig::default();
        let mut phase = 0.0;
        let buf = render_pcm16_stereo(&config, 2.5, &mut phase);
        for chunk in buf.chunks_exact(2) {
            let _ = i16::from_le_bytes([chunk[0], chunk[1]]);
        }
    }

    #[test]
    fn prompt_bias_mean_or_zero() {
        assert_eq!(prompt_bias(&[]), 0.0);
        assert_eq!(prompt_bias(&[1.0, 3.0]), 2.0);
    }

    #[test]
    fn phase_wraps_modulo_10000() {
        let config = MusicConfig::default();
        let mut phase = 9_999.999;
        let _ = render_pcm16_stereo(&config, 0.0, &mut phase);
        assert!(phase < PHASE_WRAP);
    }
}
