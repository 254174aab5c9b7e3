//! Morse timing: every duration is a whole number of dot lengths.

use std::time::Duration;

use crate::segment::Segment;

/// Silence appended after every symbol, in units.
pub const INTER_SYMBOL_GAP_UNITS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
    LetterGap,
    WordGap,
}

impl Symbol {
    /// Symbols outside `.`, `-`, `' '` and `/` have no timing and are skipped.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            ' ' => Some(Symbol::LetterGap),
            '/' => Some(Symbol::WordGap),
            _ => None,
        }
    }

    pub fn is_tone(&self) -> bool {
        matches!(self, Symbol::Dot | Symbol::Dash)
    }

    pub fn units(&self) -> u32 {
        match self {
            Symbol::Dot => 1,
            Symbol::Dash => 3,
            Symbol::LetterGap => 3,
            // Same as the inter-symbol gap, not the usual seven units.
            Symbol::WordGap => 1,
        }
    }

    /// Segment for this symbol; the duration saturates at [`Duration::MAX`].
    pub fn segment(&self, unit: Duration) -> Segment {
        let duration = unit.saturating_mul(self.units());
        if self.is_tone() {
            Segment::Tone(duration)
        } else {
            Segment::Silence(duration)
        }
    }
}

/// The silence that follows every symbol.
pub fn inter_symbol_gap(unit: Duration) -> Segment {
    Segment::Silence(unit.saturating_mul(INTER_SYMBOL_GAP_UNITS))
}
