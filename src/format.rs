//! Recognised upload containers, keyed by filename extension.

/// Audio container declared by an upload's filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    M4a,
    Aac,
    Webm,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 7] = [
        Self::Wav,
        Self::Mp3,
        Self::Ogg,
        Self::Flac,
        Self::M4a,
        Self::Aac,
        Self::Webm,
    ];

    /// Detect the format from a filename, ignoring extension case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }

    /// Lowercase extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::M4a => "m4a",
            Self::Aac => "aac",
            Self::Webm => "webm",
        }
    }

    /// Whether the payload is already the canonical container.
    pub fn is_wav(self) -> bool {
        self == Self::Wav
    }
}
