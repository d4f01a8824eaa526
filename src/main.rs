//! epub-narrator - Convert EPUB files to audiobooks using Kokoro TTS

use anyhow::{Context, Result};
use clap::Parser;
use epub_narrator::audio::assembler::DEFAULT_SILENCE_MS;
use epub_narrator::audio::codec::{self as codec, OutputFormat};
use epub_narrator::config::NarratorConfig;
use epub_narrator::error::{ConfigurationError, SynthesisError};
use epub_narrator::pipeline::{self, PipelineOptions};
use epub_narrator::tts::{self, kokoro::KokoroEngine};
use epub_narrator::{epub, text};
use log::{error, info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "epub-narrator")]
#[command(about = "Convert EPUB files to audiobooks using Kokoro TTS", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the EPUB file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Kokoro voice name (default: af_heart, or the configured default)
    #[arg(short, long)]
    voice: Option<String>,

    /// Combine all chapters into a single file
    #[arg(short, long)]
    combine: bool,

    /// Output format (default: mp3, or the configured default)
    #[arg(short, long, value_parser = ["wav", "mp3"])]
    format: Option<String>,

    /// List available voices and exit
    #[arg(long)]
    list_voices: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    std::process::exit(run(&args));
}

fn run(args: &Args) -> i32 {
    if args.list_voices {
        list_voices();
        return 0;
    }

    match convert(args) {
        Ok(()) => 0,
        Err(e) => {
            if was_interrupted(&e) {
                info!("conversion cancelled by user");
                130
            } else {
                error!("{e:#}");
                1
            }
        }
    }
}

/// Whether the error chain bottoms out in a user interrupt.
fn was_interrupted(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<SynthesisError>(),
        Some(SynthesisError::Interrupted)
    )
}

fn list_voices() {
    println!("\nAvailable voices:");
    println!("{}", "-".repeat(40));
    for voice in tts::AVAILABLE_VOICES {
        println!("  {voice}");
    }
    println!("{}", "-".repeat(40));
    println!("\nTotal: {} voices available\n", tts::AVAILABLE_VOICES.len());
}

fn convert(args: &Args) -> Result<()> {
    let input = args
        .input
        .clone()
        .ok_or_else(|| anyhow::anyhow!("the following arguments are required: -i/--input"))?;

    if !input.exists() {
        return Err(ConfigurationError::InputNotFound(input).into());
    }
    if input
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
        != Some("epub")
    {
        return Err(ConfigurationError::NotAnEpub(input).into());
    }

    let config = NarratorConfig::load().context("Failed to load configuration")?;

    let voice = args.voice.clone().unwrap_or(config.voice);
    let format_name = args.format.clone().unwrap_or(config.format);
    let format = OutputFormat::parse(&format_name)
        .filter(|f| matches!(f, OutputFormat::Wav | OutputFormat::Mp3))
        .ok_or(ConfigurationError::InvalidFormat(format_name))?;

    if format != OutputFormat::Wav && !codec::is_ffmpeg_available() {
        anyhow::bail!("ffmpeg is required for {format} output but was not found on PATH");
    }

    info!("input file: {}", input.display());
    info!("output directory: {}", args.output.display());
    info!("voice: {voice}");

    // Fails fast on an unknown voice, before any extraction work
    let engine = KokoroEngine::new(&voice)?;

    let book = epub::parse_epub(&input).context("Failed to parse EPUB")?;
    info!(
        "book: \"{}\" by {} [{}]",
        book.title, book.author, book.language
    );

    let options = PipelineOptions {
        output_dir: args.output.clone(),
        format,
        max_chars: config.max_chars,
        words_per_minute: config.words_per_minute,
    };

    let result = pipeline::generate_audiobook(&book, &engine, &options)?;

    if result.chapter_files.is_empty() {
        anyhow::bail!("no audio files were generated");
    }

    if args.combine {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "audiobook".to_string());
        let combined_path = args
            .output
            .join(format!("{}_complete.{}", stem, format.extension()));

        match pipeline::combine_chapters(&result.chapter_files, &combined_path, DEFAULT_SILENCE_MS)
        {
            Ok(path) => info!("combined audiobook: {}", path.display()),
            Err(e) => warn!("{e}; individual chapter files are still available"),
        }
    }

    println!();
    println!("{}", "=".repeat(60));
    println!("CONVERSION COMPLETE");
    println!(
        "Generated {} of {} chapter files",
        result.chapter_files.len(),
        result.chapters_attempted
    );
    println!(
        "Estimated duration: {}",
        text::duration::format_duration(result.estimated_seconds)
    );
    println!("Output location: {}", args.output.display());
    println!("{}", "=".repeat(60));

    Ok(())
}
