use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use morsewav_cw::converter::{DEFAULT_DOT_LEN, DEFAULT_FREQUENCY_HZ};
use morsewav_cw::{parse, JsonTranslator, MorseTable, Phrase, Translator, WavConverter};
use time::format_description::FormatItem;
use time::OffsetDateTime;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "morsewav", about = "Render text as a Morse code WAV file")]
struct Args {
    /// Text to send.
    text: String,

    /// Treat TEXT as an already encoded phrase of `.`, `-`, ` ` and `/`.
    #[arg(long)]
    morse: bool,

    /// Tone frequency in Hz.
    #[arg(long, default_value_t = DEFAULT_FREQUENCY_HZ, value_parser = parse_frequency)]
    frequency: f64,

    /// Dot length in milliseconds.
    #[arg(long, default_value_t = DEFAULT_DOT_LEN.as_millis() as u64,
          value_parser = clap::value_parser!(u64).range(1..))]
    unit_ms: u64,

    /// JSON translation table used instead of the built-in one.
    #[arg(long)]
    table: Option<PathBuf>,

    /// Output file. Defaults to a timestamped name in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the key-down pattern instead of writing a file.
    #[arg(long)]
    keying: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let phrase = encode_phrase(&args)?;
    info!(%phrase, "encoded");

    if args.keying {
        println!("{}", keying_string(&phrase));
        return Ok(());
    }

    let converter = WavConverter::new(args.frequency, Duration::from_millis(args.unit_ms));
    let wav = converter
        .convert(&phrase)
        .context("failed to render phrase")?;

    let path = args.output.unwrap_or_else(default_output_path);
    std::fs::write(&path, &wav).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = wav.len(), "wrote wav");
    Ok(())
}

fn encode_phrase(args: &Args) -> Result<Phrase> {
    if args.morse {
        return Ok(Phrase::from(args.text.as_str()));
    }
    let translator: Box<dyn Translator> = match &args.table {
        Some(path) => Box::new(
            JsonTranslator::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
        ),
        None => Box::new(MorseTable),
    };
    let phrase = parse(&args.text, translator.as_ref());
    if phrase.is_empty() && !args.text.trim().is_empty() {
        bail!("nothing in {:?} could be translated", args.text);
    }
    Ok(phrase)
}

fn keying_string(phrase: &Phrase) -> String {
    phrase
        .keying()
        .iter()
        .by_vals()
        .map(|on| if on { '=' } else { '.' })
        .collect()
}

fn default_output_path() -> PathBuf {
    let now = OffsetDateTime::now_utc();
    PathBuf::from(format!("morse-{}.wav", format_timestamp_filename(now)))
}

fn format_timestamp_filename(dt: OffsetDateTime) -> String {
    let format = "[year]-[month]-[day]-[hour][minute][second]Z";
    let parsed: Result<Vec<FormatItem<'_>>, _> = time::format_description::parse(format);
    parsed
        .ok()
        .and_then(|items| dt.format(&items).ok())
        .unwrap_or_else(|| dt.unix_timestamp().to_string())
}

fn parse_frequency(s: &str) -> Result<f64, String> {
    let hz: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if hz.is_finite() && hz > 0.0 {
        Ok(hz)
    } else {
        Err(format!("frequency must be positive, got {hz}"))
    }
}
