use std::fs::File;
use std::path::Path;

use symphonia::core::{
    audio::SampleBuffer,
    codecs::DecoderOptions,
    errors::Error,
    formats::FormatOptions,
    io::{MediaSource, MediaSourceStream},
    meta::MetadataOptions,
    probe::Hint,
};

/// Raw decoded audio in interleaved `f32` samples.
#[derive(Debug, Clone)]
pub(crate) struct DecodedAudio {
    pub(crate) samples: Vec<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
}

pub(super) fn decode_file(path: &Path) -> Result<DecodedAudio, String> {
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    if is_wav {
        match decode_with_hound(path) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => {
                tracing::debug!("hound rejected {}, retrying with symphonia: {err}", path.display());
            }
        }
    }
    let file = File::open(path).map_err(|err| format!("Open failed: {err}"))?;
    let extension = path.extension().and_then(|ext| ext.to_str());
    decode_media(Box::new(file), extension)
}

fn decode_with_hound(path: &Path) -> Result<DecodedAudio, String> {
    let reader = hound::WavReader::open(path)
        .map_err(|err| format!("WAV open failed: {err}"))?;
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| format!("WAV read failed: {err}"))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 * scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| format!("WAV read failed: {err}"))?
        }
    };
    // A parsed header with no frames is a valid, zero-length recording.
    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate.max(1),
        channels: spec.channels.max(1),
    })
}

/// Decode any container/codec symphonia supports from an in-memory or file source.
///
/// A stream whose header parses but carries no packets yields empty samples;
/// callers apply their own length rules. Error text never names the source.
pub(crate) fn decode_media(
    source: Box<dyn MediaSource>,
    extension: Option<&str>,
) -> Result<DecodedAudio, String> {
    let mss = MediaSourceStream::new(source, Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| format!("Symphonia probe failed: {err}"))?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| "No default track".to_string())?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|err| format!("Symphonia decoder failed: {err}"))?;

    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|ch| ch.count() as u16);
    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(_)) => break,
            Err(err) => return Err(format!("Symphonia packet read failed: {err}")),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            Err(Error::DecodeError(_)) => continue,
            Err(err) => return Err(format!("Symphonia decode failed: {err}")),
        };
        let spec = *audio_buf.spec();
        sample_rate = sample_rate.or(Some(spec.rate));
        channels = channels.or(Some(spec.channels.count() as u16));
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }

    let sample_rate = sample_rate.ok_or_else(|| "Missing sample rate".to_string())?;
    let channels = channels.ok_or_else(|| "Missing channel count".to_string())?;
    Ok(DecodedAudio {
        samples,
        sample_rate: sample_rate.max(1),
        channels: channels.max(1),
    })
}
