//! Audio decoding for transcription input.
//!
//! Decodes the uploaded file (wav/mp3/m4a) via Symphonia, downmixes to mono
//! and resamples to the 16 kHz rate Whisper expects.

use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Sample rate expected by the Whisper model.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Read an audio file into mono f32 samples at 16 kHz.
pub fn read_samples(path: &Path) -> Result<Vec<f32>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open audio file {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("unrecognized audio container")?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| anyhow!("no decodable audio track"))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| anyhow!("source sample rate unknown"))?;
    let channels = track.codec_params.channels.map_or(1, |ch| ch.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("unsupported audio codec")?;

    let mut interleaved = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err).context("failed to read audio packet"),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Recoverable corruption: skip the packet and keep going
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(err) => return Err(err).context("failed to decode audio packet"),
        };
        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buf.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(buf.samples());
    }

    if interleaved.is_empty() {
        return Err(anyhow!("audio file contains no samples"));
    }

    let mono = downmix_to_mono(&interleaved, channels);
    Ok(resample(&mono, sample_rate, WHISPER_SAMPLE_RATE))
}

/// Average interleaved channels into a single mono channel.
fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linear-interpolation resampler. Sufficient fidelity for speech input.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate {
        return samples.to_vec();
    }
    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = (samples.len() as f64 / ratio).floor() as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;
        let a = samples[idx];
        let b = if idx + 1 < samples.len() {
            samples[idx + 1]
        } else {
            a
        };
        out.push(a + (b - a) * frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_averages_stereo_frames() {
        let interleaved = [0.0, 1.0, 0.5, 0.5, -1.0, 1.0];
        let mono = downmix_to_mono(&interleaved, 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_passes_mono_through() {
        let samples = [0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples.to_vec());
    }

    #[test]
    fn test_resample_identity_when_rates_match() {
        let samples = [0.1, 0.2, 0.3];
        assert_eq!(resample(&samples, 16_000, 16_000), samples.to_vec());
    }

    #[test]
    fn test_resample_halves_length_from_32k() {
        let samples: Vec<f32> = (0..1000).map(|i| i as f32 / 1000.0).collect();
        let out = resample(&samples, 32_000, 16_000);
        assert_eq!(out.len(), 500);
        // Linear interpolation of a linear ramp stays on the ramp
        assert!((out[250] - samples[500]).abs() < 1e-4);
    }

    #[test]
    fn test_read_samples_rejects_missing_file() {
        let err = read_samples(Path::new("/nonexistent/audio.wav")).unwrap_err();
        assert!(err.to_string().contains("failed to open audio file"));
    }
}
