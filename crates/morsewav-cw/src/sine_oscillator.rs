use std::time::Duration;

/// One stereo sample frame.
pub type Frame = [f32; 2];

/// Number of frames covering `duration` at `sample_rate_hz`, rounded half-up.
pub fn frame_count(duration: Duration, sample_rate_hz: u32) -> usize {
    (duration.as_secs_f64() * f64::from(sample_rate_hz)).round() as usize
}

/// Continuous-phase sine tone. Phase is kept in `[0, 1)` and carries over
/// from one [`generate`](SineOscillator::generate) call to the next.
#[derive(Debug, Clone)]
pub struct SineOscillator {
    sample_rate_hz: u32,
    phase: f64,
    phase_inc: f64,
}

impl SineOscillator {
    pub fn new(sample_rate_hz: u32, tone_freq_hz: f64) -> Self {
        Self {
            sample_rate_hz,
            phase: 0.0,
            phase_inc: tone_freq_hz / f64::from(sample_rate_hz),
        }
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Lazily produce `duration` worth of tone frames.
    pub fn generate(&mut self, duration: Duration) -> Tone<'_> {
        let remaining = frame_count(duration, self.sample_rate_hz);
        Tone {
            osc: self,
            remaining,
        }
    }

    fn next_frame(&mut self) -> Frame {
        let value = (self.phase * std::f64::consts::TAU).sin() as f32;
        self.phase = (self.phase + self.phase_inc).rem_euclid(1.0);
        [value, value]
    }
}

/// Iterator returned by [`SineOscillator::generate`].
#[derive(Debug)]
pub struct Tone<'a> {
    osc: &'a mut SineOscillator,
    remaining: usize,
}

impl Iterator for Tone<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.osc.next_frame())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Tone<'_> {}
