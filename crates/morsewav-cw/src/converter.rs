use std::time::Duration;

use crate::encode::Phrase;
use crate::modulator::CwModulator;
use crate::sine_oscillator::Frame;
use crate::wav::{self, AudioFormat, EncodingError};

pub const DEFAULT_FREQUENCY_HZ: f64 = 800.0;
pub const DEFAULT_DOT_LEN: Duration = Duration::from_millis(80);

/// Converts Morse phrases to WAV files.
///
/// The converter only holds configuration; each [`convert`](Self::convert)
/// call gets its own oscillator and frame buffer, so one converter can be
/// shared between threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavConverter {
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Length of a dot. Every other duration is a multiple of it.
    pub dot_len: Duration,
}

impl Default for WavConverter {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY_HZ,
            dot_len: DEFAULT_DOT_LEN,
        }
    }
}

impl WavConverter {
    pub fn new(frequency: f64, dot_len: Duration) -> Self {
        Self { frequency, dot_len }
    }

    /// Output format: 44.1 kHz, 16-bit stereo PCM.
    pub fn format(&self) -> AudioFormat {
        AudioFormat::default()
    }

    /// Render `phrase` and encode it as a standalone WAV file.
    ///
    /// A dot length too long for the frame buffer to be allocated is
    /// reported as an [`EncodingError`] before any audio is rendered.
    pub fn convert(&self, phrase: &Phrase) -> Result<Vec<u8>, EncodingError> {
        let format = self.format();
        let mut modulator = CwModulator::new(format.sample_rate_hz, self.frequency, self.dot_len);

        let total = modulator
            .frame_total(phrase)
            .ok_or_else(|| EncodingError::allocation("frame count overflows usize"))?;
        let mut frames: Vec<Frame> = Vec::new();
        frames
            .try_reserve_exact(total)
            .map_err(EncodingError::allocation)?;
        modulator.modulate_into(phrase, &mut frames);
        let bytes = wav::encode(&frames, &format)?;

        tracing::debug!(
            symbols = phrase.symbol_count(),
            frames = frames.len(),
            bytes = bytes.len(),
            "converted phrase"
        );
        Ok(bytes)
    }
}
