//! WAV decode, mono down-mix, resampling and 16-bit PCM encode.

use std::path::Path;

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Mono waveform at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoAudio {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode a WAV file, average its channels and resample to `target_rate`.
pub fn load_mono(path: &Path, target_rate: u32) -> anyhow::Result<MonoAudio> {
    let mut reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV: {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read samples: {}", path.display()))?,
        SampleFormat::Int => {
            let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Failed to read samples: {}", path.display()))?
        }
    };

    let mono = downmix(&interleaved, channels);
    let samples = resample(mono, spec.sample_rate, target_rate)?;
    Ok(MonoAudio {
        samples,
        sample_rate: target_rate,
    })
}

fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Band-limited sinc resampling of a mono signal.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> anyhow::Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples);
    }
    if from_rate == 0 {
        anyhow::bail!("Invalid source sample rate 0");
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let input_len = samples.len();
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, input_len, 1)
        .map_err(|e| anyhow::anyhow!("Failed to create resampler: {e}"))?;
    let input = vec![samples];
    let mut channel = resampler
        .process(&input, None)
        .map_err(|e| anyhow::anyhow!("Resampling failed: {e}"))?
        .swap_remove(0);
    // The sinc window holds back the last half-window of input until flushed.
    let tail = resampler
        .process_partial(None::<&[Vec<f32>]>, None)
        .map_err(|e| anyhow::anyhow!("Resampling flush failed: {e}"))?;
    channel.extend_from_slice(&tail[0]);

    // Keep the length proportional to the input so durations stay exact.
    let expected = (input_len as f64 * ratio).round() as usize;
    channel.resize(expected, 0.0);
    Ok(channel)
}

/// Write mono samples as 16-bit PCM, replacing any existing file.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV: {}", path.display()))?;

    const I16_MAX_F32: f32 = i16::MAX as f32;
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * I16_MAX_F32).round() as i16;
        writer
            .write_sample(v)
            .map_err(|e| anyhow::anyhow!("wav sample err: {e}"))?;
    }
    writer
        .finalize()
        .map_err(|e| anyhow::anyhow!("wav finalize err: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_averages_frames() {
        let mono = downmix(&[1.0, 0.0, 0.5, 0.5], 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.5).abs() < 1e-6);
        assert!((mono[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_resample_same_rate_is_identity() {
        let samples = vec![0.1_f32; 1024];
        let out = resample(samples.clone(), 24000, 24000).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn test_resample_halves_length() {
        let out = resample(vec![0.0_f32; 48000], 48000, 24000).unwrap();
        assert_eq!(out.len(), 24000);
    }

    #[test]
    fn test_resample_keeps_clip_tail() {
        let out = resample(vec![0.5_f32; 48000], 48000, 24000).unwrap();
        assert_eq!(out.len(), 24000);
        let silent_tail = out.iter().rev().take_while(|s| s.abs() < 1e-3).count();
        assert_eq!(silent_tail, 0);
        assert!(out[23000..].iter().all(|s| *s > 0.1), "tail lost signal");
    }

    #[test]
    fn test_resample_keeps_timing() {
        let mut samples = vec![0.0_f32; 48000];
        samples[24000] = 1.0;
        let out = resample(samples, 48000, 24000).unwrap();
        let peak = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(peak.abs_diff(12000) <= 1, "peak at {peak}");
    }

    #[test]
    fn test_stereo_48k_roundtrip_to_mono_24k() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..48000 {
            writer.write_sample(1000_i16).unwrap();
            writer.write_sample(-1000_i16).unwrap();
        }
        writer.finalize().unwrap();

        let audio = load_mono(&path, 24000).unwrap();
        assert_eq!(audio.sample_rate, 24000);
        assert_eq!(audio.samples.len(), 24000);
        assert!((audio.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_write_then_load_keeps_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        write_wav(&path, &vec![0.25_f32; 12000], 24000).unwrap();
        let audio = load_mono(&path, 24000).unwrap();
        assert_eq!(audio.samples.len(), 12000);
        assert!((audio.samples[0] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_garbage_file_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        std::fs::write(&path, b"definitely not RIFF").unwrap();
        assert!(load_mono(&path, 24000).is_err());
    }
}
