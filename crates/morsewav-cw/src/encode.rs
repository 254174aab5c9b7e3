use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use bitvec::vec::BitVec;
use phf::phf_map;
use thiserror::Error;

use crate::timing::{Symbol, INTER_SYMBOL_GAP_UNITS};

/// Morse code for the word separator.
pub const WORD_SEPARATOR: &str = "/";

static MORSE_TABLE: phf::Map<char, &'static str> = phf_map! {
    'A' => ".-",
    'B' => "-...",
    'C' => "-.-.",
    'D' => "-..",
    'E' => ".",
    'F' => "..-.",
    'G' => "--.",
    'H' => "....",
    'I' => "..",
    'J' => ".---",
    'K' => "-.-",
    'L' => ".-..",
    'M' => "--",
    'N' => "-.",
    'O' => "---",
    'P' => ".--.",
    'Q' => "--.-",
    'R' => ".-.",
    'S' => "...",
    'T' => "-",
    'U' => "..-",
    'V' => "...-",
    'W' => ".--",
    'X' => "-..-",
    'Y' => "-.--",
    'Z' => "--..",
    '0' => "-----",
    '1' => ".----",
    '2' => "..---",
    '3' => "...--",
    '4' => "....-",
    '5' => ".....",
    '6' => "-....",
    '7' => "--...",
    '8' => "---..",
    '9' => "----.",
    '.' => ".-.-.-",
    ',' => "--..--",
    '?' => "..--..",
    '\'' => ".----.",
    '!' => "-.-.--",
    '/' => "-..-.",
    '(' => "-.--.",
    ')' => "-.--.-",
    '&' => ".-...",
    ':' => "---...",
    ';' => "-.-.-.",
    '=' => "-...-",
    '+' => ".-.-.",
    '-' => "-....-",
    '_' => "..--.-",
    '"' => ".-..-.",
    '$' => "...-..-",
    '@' => ".--.-.",
};

/// Maps a text character to its dot/dash code.
///
/// Whitespace translates to [`WORD_SEPARATOR`]. A character with no code
/// translates to the empty string.
pub trait Translator {
    fn translate(&self, ch: char) -> &str;
}

/// The built-in ITU table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MorseTable;

impl Translator for MorseTable {
    fn translate(&self, ch: char) -> &str {
        if ch.is_whitespace() {
            return WORD_SEPARATOR;
        }
        MORSE_TABLE.get(&upper(ch)).copied().unwrap_or("")
    }
}

#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("translator initialization: {0}")]
    Io(#[from] std::io::Error),
    #[error("translator initialization: {0}")]
    Json(#[from] serde_json::Error),
    #[error("translator initialization: key {0:?} is neither a character nor a code point")]
    InvalidKey(String),
}

/// Translator backed by a JSON object of `"character": "code"` pairs.
///
/// Keys may also be decimal code points (`{"65": ".-", "32": "/"}`). A
/// single-character key is always read as that character, so `"7"` is the
/// digit seven rather than U+0007.
#[derive(Debug, Clone, Default)]
pub struct JsonTranslator {
    table: HashMap<char, String>,
}

impl JsonTranslator {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TranslatorError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TranslatorError> {
        let raw: HashMap<String, String> = serde_json::from_reader(reader)?;
        let mut table = HashMap::with_capacity(raw.len());
        for (key, code) in raw {
            match table_key(&key) {
                Some(ch) => {
                    table.insert(ch, code);
                }
                None => return Err(TranslatorError::InvalidKey(key)),
            }
        }
        Ok(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Translator for JsonTranslator {
    fn translate(&self, ch: char) -> &str {
        match self.table.get(&upper(ch)) {
            Some(code) => code.as_str(),
            None if ch.is_whitespace() => WORD_SEPARATOR,
            None => "",
        }
    }
}

fn table_key(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => key.parse::<u32>().ok().and_then(char::from_u32),
    }
}

fn upper(ch: char) -> char {
    ch.to_uppercase().next().unwrap_or(ch)
}

/// A message in Morse code: dots, dashes, `' '` between letters and `/`
/// between words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Phrase(String);

impl Phrase {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of symbol characters, including ones with no timing.
    pub fn symbol_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Key-down (1) / key-up (0) pattern of the phrase, one bit per unit.
    pub fn keying(&self) -> BitVec {
        let mut bits = BitVec::new();
        for ch in self.0.chars() {
            if let Some(symbol) = Symbol::from_char(ch) {
                push_units(&mut bits, symbol.is_tone(), symbol.units());
            }
            push_units(&mut bits, false, INTER_SYMBOL_GAP_UNITS);
        }
        bits
    }
}

impl From<&str> for Phrase {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Phrase {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode text into a phrase, one letter separator after every character.
pub fn parse<T: Translator + ?Sized>(text: &str, translator: &T) -> Phrase {
    let mut out = String::with_capacity(text.len() * 5);
    for ch in text.chars() {
        out.push_str(translator.translate(ch));
        out.push(' ');
    }
    Phrase(out.trim_matches(' ').to_string())
}

fn push_units(bits: &mut BitVec, value: bool, count: u32) {
    for _ in 0..count {
        bits.push(value);
    }
}
