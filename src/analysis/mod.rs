//! Acoustic analysis: decoding to a canonical waveform and descriptor extraction.

pub mod audio;
pub mod features;
pub(crate) mod fft;
pub(crate) mod frequency_domain;
pub(crate) mod pitch;
pub(crate) mod stats;
pub(crate) mod time_domain;
