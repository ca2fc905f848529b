//! # talkpack CLI
//!
//! Command-line interface for the talkpack library.

use std::path::Path;
use std::process;
use std::time::Instant;

use chrono::Local;
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use talkpack::cli::Args;
use talkpack::core::{ExtractionStats, OutputConfig, day_ranges, move_event, rename_speaker};
use talkpack::dispatch::{self, ExtractRequest};
use talkpack::format::{OutputFormat, to_format_string, write_to_format};
use talkpack::input::Input;
use talkpack::transcript::{day_slice, export_file_name};
use talkpack::{ConversationEvent, ExtractConfig, Extractor, Labels, TalkpackError};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), TalkpackError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    init_tracing(args.verbose);

    let config = build_config(&args);

    if args.response {
        let kind = args.input_kind;
        let input = args.input.clone();
        let response = dispatch::handle(&ExtractRequest::new(true), config, move || {
            Input::load(&input, kind)
        });
        println!("{}", response.to_json()?);
        if !response.success {
            process::exit(1);
        }
        return Ok(());
    }

    let labels = config.labels.clone();
    let lib_format: OutputFormat = args.format.into();
    let to_stdout = args.output.as_deref() == Some("-");
    // Status lines would corrupt data written to stdout
    let chatty = !to_stdout && !args.list_days;

    if chatty {
        println!("📦 talkpack v{}", env!("CARGO_PKG_VERSION"));
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("📂 Input:   {}", args.input);
        println!("📄 Format:  {}", lib_format);
        println!("🌐 Locale:  {}", args.locale);
        if let Some(ref title) = args.title {
            println!("👤 Title:   {}", title);
        }
        println!();
    }

    // Step 1: Load and extract
    let extractor = Extractor::new(config)?;
    let extract_start = Instant::now();
    let input = Input::load(&args.input, args.input_kind)?;
    if chatty {
        println!("⏳ Extracting from {} capture...", input.kind());
    }
    let mut events = input.extract(&extractor);
    let extract_time = extract_start.elapsed();
    if chatty {
        println!(
            "   Found {} events ({:.2}s)",
            events.len(),
            extract_time.as_secs_f64()
        );
    }

    // Step 2: Edits, renames first so moves see final speakers
    for rename in &args.rename {
        let renamed = rename_speaker(&mut events, &rename.from, &rename.to);
        if chatty {
            println!("✏️  Renamed {} → {} ({} messages)", rename.from, rename.to, renamed);
        }
    }
    for mv in &args.moves {
        move_event(&mut events, mv.from, mv.to)?;
        if chatty {
            println!("↕️  Moved event {} → {}", mv.from, mv.to);
        }
    }

    if args.list_days {
        print_days(&events);
        return Ok(());
    }

    // Step 3: Optional single-day slice
    let selected: &[ConversationEvent] = match args.day {
        Some(ref label) => {
            let day = day_ranges(&events)
                .into_iter()
                .find(|range| range.label == *label)
                .ok_or_else(|| {
                    TalkpackError::invalid_format(
                        "day",
                        format!("No day labelled '{}'. Use --list-days to see them", label),
                    )
                })?;
            if chatty {
                println!("📅 Day:     {} ({} events)", day.label, day.len);
            }
            day_slice(&events, day.index)?
        }
        None => &events,
    };

    // Step 4: Output configuration
    let generated_at = Local::now().naive_local();
    let mut output_config = OutputConfig::new()
        .with_labels(labels.clone())
        .with_generated_at(generated_at);
    if args.no_dates {
        output_config = output_config.without_dates();
    }
    if args.no_notices {
        output_config = output_config.without_notices();
    }

    // Step 5: Write
    if to_stdout {
        print!("{}", to_format_string(selected, lib_format, &output_config)?);
        return Ok(());
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&labels, lib_format, generated_at));
    println!("💾 Writing {}...", lib_format);
    let write_start = Instant::now();
    write_to_format(selected, &output_path, lib_format, &output_config)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    let stats = ExtractionStats::from_events(selected);
    println!();
    println!("📊 Summary:");
    println!("   Days:      {}", stats.date_markers);
    println!("   Notices:   {}", stats.system_notices);
    println!(
        "   Messages:  {} ({:.1}% yours)",
        stats.messages,
        stats.self_ratio()
    );
    if !stats.speakers.is_empty() {
        let speakers: Vec<&str> = stats.speakers.iter().map(String::as_str).collect();
        println!("   Speakers:  {}", speakers.join(", "));
    }

    println!();
    println!("⚡ Performance:");
    println!(
        "   Total time:  {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "talkpack=debug" } else { "talkpack=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_config(args: &Args) -> ExtractConfig {
    let mut config = ExtractConfig::new().with_locale(args.locale);
    if let Some(width) = args.viewport_width {
        config = config.with_viewport_width(width);
    }
    if let Some(minutes) = args.utc_offset {
        config = config.with_utc_offset_minutes(minutes);
    }
    if let Some(ref title) = args.title {
        config = config.with_conversation_title(title.clone());
    }
    config
}

fn print_days(events: &[ConversationEvent]) {
    let days = day_ranges(events);
    if days.is_empty() {
        println!("No date markers found");
        return;
    }
    for day in days {
        println!("{:>5}  {}  ({} events)", day.index, day.label, day.len);
    }
}

/// Timestamped name in the working directory, extension matching `format`.
fn default_output_path(
    labels: &Labels,
    format: OutputFormat,
    at: chrono::NaiveDateTime,
) -> String {
    Path::new(&export_file_name(labels, at))
        .with_extension(format.extension())
        .to_string_lossy()
        .into_owned()
}
