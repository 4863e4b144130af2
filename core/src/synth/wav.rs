use crate::voice::AudioBuffer;
use crate::{Result, TourVoiceError};
use bytes::Bytes;
use std::io::Cursor;

/// Encode mono float PCM as a 16-bit WAV file held entirely in memory.
///
/// Samples are clamped to `[-1.0, 1.0]` before scaling; NaN becomes silence.
pub fn encode_wav(audio: &AudioBuffer) -> Result<Bytes> {
    if audio.sample_rate == 0 {
        return Err(TourVoiceError::SynthesisError(
            "engine reported a sample rate of 0".into(),
        ));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    // 44-byte RIFF header plus two bytes per sample
    let mut cursor = Cursor::new(Vec::with_capacity(44 + audio.samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(wav_err)?;
        for sample in &audio.samples {
            let sample = if sample.is_nan() { 0.0 } else { *sample };
            let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(scaled).map_err(wav_err)?;
        }
        writer.finalize().map_err(wav_err)?;
    }
    Ok(Bytes::from(cursor.into_inner()))
}

fn wav_err(e: hound::Error) -> TourVoiceError {
    TourVoiceError::SynthesisError(format!("WAV encoding failed: {e}"))
}
