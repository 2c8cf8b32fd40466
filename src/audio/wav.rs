// WAV decoding via hound
//
// Decodes 8/16/24/32-bit integer PCM and 32-bit float WAV streams into a
// mono Waveform at the stream's native sample rate (no resampling).
// Multi-channel input is downmixed by averaging interleaved frames,
// matching the mono conversion applied at training time.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader};
use tracing::debug;

use crate::audio::Waveform;
use crate::error::DecodeError;

/// Decode a WAV file from disk into a mono `Waveform`.
pub fn read_wav_path<P: AsRef<Path>>(path: P) -> Result<Waveform, DecodeError> {
    let file = File::open(path.as_ref())?;
    read_wav(BufReader::new(file))
}

/// Decode a WAV byte stream into a mono `Waveform`.
///
/// This is the in-memory path for callers that receive audio over the
/// wire: no temporary file is ever written.
pub fn read_wav<R: Read>(reader: R) -> Result<Waveform, DecodeError> {
    let reader = WavReader::new(reader)?;
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(DecodeError::UnsupportedFormat(
            "wav header declares zero channels".to_string(),
        ));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(DecodeError::UnsupportedFormat(format!(
                    "{}-bit integer pcm",
                    spec.bits_per_sample
                )));
            }
            // Normalize signed integer PCM to [-1.0, 1.0]
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels as usize;
    let samples: Vec<f32> = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    debug!(
        samples = samples.len(),
        sample_rate = spec.sample_rate,
        channels,
        "decoded wav stream"
    );

    Ok(Waveform::new(samples, spec.sample_rate))
}
