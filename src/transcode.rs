//! Conversion of non-WAV uploads into canonical WAV bytes.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::analysis::audio::{DecodedAudio, decode_media};
use crate::format::AudioFormat;

/// Errors raised while converting a container to WAV.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("{0}")]
    Decode(String),
    #[error("WAV encode failed: {0}")]
    Encode(#[from] hound::Error),
}

/// Converts an uploaded container into WAV bytes.
///
/// [`SymphoniaTranscoder`] covers MP3, AAC/M4A, FLAC, Vorbis and PCM, but
/// symphonia ships no Opus decoder. WebM and Ogg uploads recorded by browser
/// `MediaRecorder` are usually Opus and fail as `Conversion failed`; deployments
/// accepting them should install an Opus-capable implementation through
/// [`VoiceClassifier::with_transcoder`](crate::VoiceClassifier::with_transcoder).
pub trait Transcoder: Send + Sync {
    fn transcode_to_wav(&self, bytes: &[u8], format: AudioFormat)
    -> Result<Vec<u8>, TranscodeError>;
}

/// Default transcoder: decodes with `symphonia`, re-encodes 32-bit float WAV with `hound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaTranscoder;

impl Transcoder for SymphoniaTranscoder {
    fn transcode_to_wav(
        &self,
        bytes: &[u8],
        format: AudioFormat,
    ) -> Result<Vec<u8>, TranscodeError> {
        let decoded = decode_media(
            Box::new(Cursor::new(bytes.to_vec())),
            Some(format.extension()),
        )
        .map_err(TranscodeError::Decode)?;
        encode_float_wav(&decoded)
    }
}

fn encode_float_wav(decoded: &DecodedAudio) -> Result<Vec<u8>, TranscodeError> {
    let spec = WavSpec {
        channels: decoded.channels,
        sample_rate: decoded.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in &decoded.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
