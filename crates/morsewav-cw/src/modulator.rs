use std::time::Duration;

use crate::encode::Phrase;
use crate::segment::Segment;
use crate::sine_oscillator::{frame_count, Frame, SineOscillator};
use crate::timing::{inter_symbol_gap, Symbol};

/// Timeline of a phrase: each symbol's segment (if it has one) followed by
/// the inter-symbol gap.
pub fn segments(phrase: &str, unit: Duration) -> impl Iterator<Item = Segment> + '_ {
    phrase.chars().flat_map(move |ch| {
        Symbol::from_char(ch)
            .map(|symbol| symbol.segment(unit))
            .into_iter()
            .chain(std::iter::once(inter_symbol_gap(unit)))
    })
}

/// Number of frames [`render`] produces, or `None` if it overflows `usize`.
pub fn frame_total(phrase: &str, unit: Duration, sample_rate_hz: u32) -> Option<usize> {
    segments(phrase, unit).try_fold(0usize, |total, seg| {
        total.checked_add(frame_count(seg.duration(), sample_rate_hz))
    })
}

/// Render a phrase into stereo frames, in order, on one oscillator.
///
/// The whole buffer is materialized; check [`frame_total`] first when the
/// dot length is not trusted.
pub fn render(phrase: &str, osc: &mut SineOscillator, unit: Duration) -> Vec<Frame> {
    let total = frame_total(phrase, unit, osc.sample_rate_hz()).unwrap_or(0);
    let mut out = Vec::with_capacity(total);
    render_into(phrase, osc, unit, &mut out);
    out
}

/// Like [`render`], appending to an existing buffer.
pub fn render_into(phrase: &str, osc: &mut SineOscillator, unit: Duration, out: &mut Vec<Frame>) {
    for seg in segments(phrase, unit) {
        tracing::trace!(?seg, offset = out.len(), "segment");
        out.extend(seg.frames(osc));
    }
}

/// Modulates Morse phrases into audio frames.
pub struct CwModulator {
    unit: Duration,
    osc: SineOscillator,
}

impl CwModulator {
    /// Create a CW modulator for the given sample rate, tone frequency and dot length.
    pub fn new(sample_rate_hz: u32, tone_freq_hz: f64, unit: Duration) -> Self {
        Self {
            unit,
            osc: SineOscillator::new(sample_rate_hz, tone_freq_hz),
        }
    }

    /// Render the whole phrase. Phase carries over between calls.
    pub fn modulate(&mut self, phrase: &Phrase) -> Vec<Frame> {
        render(phrase.as_str(), &mut self.osc, self.unit)
    }

    /// Append the rendered phrase to `out`.
    pub fn modulate_into(&mut self, phrase: &Phrase, out: &mut Vec<Frame>) {
        render_into(phrase.as_str(), &mut self.osc, self.unit, out)
    }

    /// Frames [`modulate`](Self::modulate) would produce for `phrase`.
    pub fn frame_total(&self, phrase: &Phrase) -> Option<usize> {
        frame_total(phrase.as_str(), self.unit, self.osc.sample_rate_hz())
    }

    /// Return the number of frames per Morse unit.
    pub fn unit_frames(&self) -> usize {
        frame_count(self.unit, self.osc.sample_rate_hz())
    }
}
