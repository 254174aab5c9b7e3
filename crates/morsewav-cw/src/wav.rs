//! Uncompressed PCM WAV container.

use std::fmt;
use std::io::{self, Cursor, Seek, Write};

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

use crate::sine_oscillator::Frame;

/// Sample rate of every conversion.
pub const SAMPLE_RATE_HZ: u32 = 44_100;

/// Sample rate, channel count and integer bit depth of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate_hz: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            channels: 2,
            bits_per_sample: 16,
        }
    }
}

impl AudioFormat {
    fn spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate_hz,
            bits_per_sample: self.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }

    /// Size in bytes of one frame.
    pub fn block_align(&self) -> usize {
        usize::from(self.channels) * usize::from(self.bits_per_sample / 8)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {}-bit",
            self.sample_rate_hz, self.channels, self.bits_per_sample
        )
    }
}

/// The container could not be written. `source` is the writer's own error.
#[derive(Debug, Error)]
#[error("morse to wav encoding: {source}")]
pub struct EncodingError {
    #[from]
    source: hound::Error,
}

impl EncodingError {
    /// The frame buffer could not be allocated.
    pub fn allocation(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: hound::Error::IoError(io::Error::new(io::ErrorKind::OutOfMemory, cause)),
        }
    }

    pub fn wav_error(&self) -> &hound::Error {
        &self.source
    }
}

/// Encode frames as a complete WAV file in memory.
pub fn encode(frames: &[Frame], format: &AudioFormat) -> Result<Vec<u8>, EncodingError> {
    let mut cursor = Cursor::new(Vec::with_capacity(
        44 + frames.len() * format.block_align(),
    ));
    write(&mut cursor, frames, format)?;
    Ok(cursor.into_inner())
}

/// Encode frames as WAV into any seekable writer.
pub fn write<W: Write + Seek>(
    writer: W,
    frames: &[Frame],
    format: &AudioFormat,
) -> Result<(), EncodingError> {
    if !matches!(format.channels, 1 | 2)
        || !matches!(format.bits_per_sample, 8 | 16 | 24)
        || format.sample_rate_hz == 0
    {
        return Err(hound::Error::Unsupported.into());
    }

    let mut wav = WavWriter::new(writer, format.spec())?;
    let channels = usize::from(format.channels);
    match format.bits_per_sample {
        8 => write_samples(&mut wav, frames, channels, |v| (v * f32::from(i8::MAX)) as i8)?,
        16 => write_samples(&mut wav, frames, channels, |v| (v * f32::from(i16::MAX)) as i16)?,
        24 => write_samples(&mut wav, frames, channels, |v| {
            (f64::from(v) * f64::from(I24_MAX)) as i32
        })?,
        _ => return Err(hound::Error::Unsupported.into()),
    }
    wav.finalize()?;

    tracing::debug!(frames = frames.len(), %format, "wav encoded");
    Ok(())
}

const I24_MAX: i32 = (1 << 23) - 1;

fn write_samples<W, S>(
    wav: &mut WavWriter<W>,
    frames: &[Frame],
    channels: usize,
    scale: impl Fn(f32) -> S,
) -> Result<(), hound::Error>
where
    W: Write + Seek,
    S: hound::Sample,
{
    for frame in frames {
        for &value in &frame[..channels] {
            wav.write_sample(scale(value.clamp(-1.0, 1.0)))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn read(bytes: &[u8]) -> (hound::WavSpec, Vec<i32>) {
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        let samples = reader.samples::<i32>().map(Result::unwrap).collect();
        (spec, samples)
    }

    #[test]
    fn empty_buffer_is_a_valid_file() {
        let bytes = encode(&[], &AudioFormat::default()).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        let reader = hound::WavReader::new(Cursor::new(&bytes)).unwrap();
        assert_eq!(reader.duration(), 0);
        assert_eq!(reader.spec().sample_rate, 44_100);
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().bits_per_sample, 16);
    }

    #[test]
    fn sixteen_bit_scaling_truncates_and_clamps() {
        let frames = [[0.0, 1.0], [-1.0, 0.5], [2.0, -3.0]];
        let bytes = encode(&frames, &AudioFormat::default()).unwrap();
        let (_, samples) = read(&bytes);
        assert_eq!(samples, vec![0, 32767, -32767, 16383, 32767, -32767]);
    }

    #[test]
    fn length_fields_match_data() {
        let frames = vec![[0.25, 0.25]; 1000];
        let bytes = encode(&frames, &AudioFormat::default()).unwrap();

        let riff_len = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
        assert_eq!(riff_len + 8, bytes.len());

        let data = bytes
            .windows(4)
            .position(|w| w == b"data")
            .expect("data chunk");
        let data_len = u32::from_le_bytes(bytes[data + 4..data + 8].try_into().unwrap()) as usize;
        assert_eq!(data_len, 1000 * 4);
        assert_eq!(data + 8 + data_len, bytes.len());
    }

    #[test]
    fn mono_takes_left_channel() {
        let format = AudioFormat {
            channels: 1,
            ..AudioFormat::default()
        };
        let bytes = encode(&[[0.5, -0.5], [-1.0, 1.0]], &format).unwrap();
        let (spec, samples) = read(&bytes);
        assert_eq!(spec.channels, 1);
        assert_eq!(samples, vec![16383, -32767]);
    }

    #[test]
    fn eight_and_twenty_four_bit() {
        for (bits, full) in [(8u16, 127), (24, I24_MAX)] {
            let format = AudioFormat {
                bits_per_sample: bits,
                ..AudioFormat::default()
            };
            let bytes = encode(&[[1.0, -1.0]], &format).unwrap();
            let (spec, samples) = read(&bytes);
            assert_eq!(spec.bits_per_sample, bits);
            assert_eq!(samples, vec![full, -full]);
        }
    }

    /// Accepts `budget` bytes, then fails every write.
    struct FailingWriter {
        budget: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk gone"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for FailingWriter {
        fn seek(&mut self, _: io::SeekFrom) -> io::Result<u64> {
            Ok(0)
        }
    }

    #[test]
    fn writer_failure_keeps_the_io_cause() {
        let frames = vec![[0.5, 0.5]; 1000];
        // Fails on the header, then part way through the samples.
        for budget in [0, 64] {
            let err = write(FailingWriter { budget }, &frames, &AudioFormat::default())
                .unwrap_err();
            match err.wav_error() {
                hound::Error::IoError(io) => {
                    assert_eq!(io.kind(), io::ErrorKind::Other);
                    assert_eq!(io.to_string(), "disk gone");
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert!(err.to_string().starts_with("morse to wav encoding"));
            assert!(err.to_string().contains("disk gone"));

            let source = err.source().expect("source");
            assert!(matches!(
                source.downcast_ref::<hound::Error>(),
                Some(hound::Error::IoError(_))
            ));
        }
    }

    #[test]
    fn unsupported_format_is_an_encoding_error() {
        let format = AudioFormat {
            bits_per_sample: 12,
            ..AudioFormat::default()
        };
        let err = encode(&[[0.0, 0.0]], &format).unwrap_err();
        assert!(matches!(err.wav_error(), hound::Error::Unsupported));
        assert!(err.to_string().starts_with("morse to wav encoding"));
        assert!(err.source().is_some());

        let format = AudioFormat {
            channels: 6,
            ..AudioFormat::default()
        };
        assert!(encode(&[], &format).is_err());
    }
}
