pub mod converter;
pub mod encode;
pub mod modulator;
pub mod segment;
mod sine_oscillator;
pub mod timing;
pub mod wav;

pub use converter::WavConverter;
pub use encode::{parse, JsonTranslator, MorseTable, Phrase, Translator, TranslatorError};
pub use modulator::CwModulator;
pub use segment::Segment;
pub use sine_oscillator::{frame_count, Frame, SineOscillator, Tone};
pub use wav::{AudioFormat, EncodingError};
