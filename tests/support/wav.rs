use std::f32::consts::PI;
use std::io::Cursor;
use std::path::Path;

fn int_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

pub fn write_test_wav(path: &Path, sample_rate: u32, samples: &[f32]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    std::fs::write(path, wav_bytes(sample_rate, samples)).expect("write wav file");
}

/// 16-bit PCM WAV bytes for `samples` in [-1, 1].
pub fn wav_bytes(sample_rate: u32, samples: &[f32]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, int_spec(sample_rate)).expect("create wav writer");
        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(value).expect("write wav sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

pub fn sine(freq_hz: f32, seconds: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let len = (seconds * sample_rate as f32) as usize;
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Harmonic-rich sustained vowel with slow amplitude tremor.
pub fn sustained_vowel(seconds: f32, sample_rate: u32) -> Vec<f32> {
    let len = (seconds * sample_rate as f32) as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let tremor = 1.0 + 0.15 * (2.0 * PI * 4.0 * t).sin();
            tremor
                * (0.35 * (2.0 * PI * 160.0 * t).sin()
                    + 0.12 * (2.0 * PI * 320.0 * t).sin()
                    + 0.05 * (2.0 * PI * 480.0 * t).sin())
        })
        .collect()
}

/// Header-only 16-bit mono WAV with a `JUNK` chunk of `padding` bytes ahead of `fmt `.
pub fn padded_empty_wav(sample_rate: u32, padding: u32) -> Vec<u8> {
    let padding = padding + padding % 2;
    let riff_len = 4 + (8 + padding) + (8 + 16) + 8;
    let mut bytes = Vec::with_capacity(riff_len as usize + 8);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&riff_len.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"JUNK");
    bytes.extend_from_slice(&padding.to_le_bytes());
    bytes.resize(bytes.len() + padding as usize, 0);
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16_u32.to_le_bytes());
    bytes.extend_from_slice(&1_u16.to_le_bytes());
    bytes.extend_from_slice(&1_u16.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2_u16.to_le_bytes());
    bytes.extend_from_slice(&16_u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&0_u32.to_le_bytes());
    bytes
}
