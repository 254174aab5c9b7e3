use std::iter::{Repeat, Take};
use std::time::Duration;

use crate::sine_oscillator::{frame_count, Frame, SineOscillator, Tone};

/// A zero-valued stereo frame.
pub const SILENT_FRAME: Frame = [0.0, 0.0];

/// One contiguous stretch of audio: either keyed tone or silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Tone(Duration),
    Silence(Duration),
}

impl Segment {
    pub fn duration(&self) -> Duration {
        match *self {
            Segment::Tone(d) | Segment::Silence(d) => d,
        }
    }

    pub fn is_tone(&self) -> bool {
        matches!(self, Segment::Tone(_))
    }

    /// Lazily produce the frames of this segment. Only tones advance the
    /// oscillator phase.
    pub fn frames<'a>(&self, osc: &'a mut SineOscillator) -> Frames<'a> {
        match *self {
            Segment::Tone(d) => Frames::Tone(osc.generate(d)),
            Segment::Silence(d) => Frames::Silence(silence(d, osc.sample_rate_hz())),
        }
    }
}

/// `duration` worth of zero frames.
pub fn silence(duration: Duration, sample_rate_hz: u32) -> Take<Repeat<Frame>> {
    std::iter::repeat(SILENT_FRAME).take(frame_count(duration, sample_rate_hz))
}

#[derive(Debug)]
pub enum Frames<'a> {
    Tone(Tone<'a>),
    Silence(Take<Repeat<Frame>>),
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        match self {
            Frames::Tone(tone) => tone.next(),
            Frames::Silence(silence) => silence.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Frames::Tone(tone) => tone.size_hint(),
            Frames::Silence(silence) => silence.size_hint(),
        }
    }
}

impl ExactSizeIterator for Frames<'_> {}
