use clap::{arg, crate_version, value_parser, ArgAction, Command};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use avlrank::{script, Config, ScriptError};

fn main() {
    // Generate a CLI, and get the input and output filenames
    let params = Command::new("avlrank")
        .version(crate_version!())
        .about("Maintain a ranked hierarchy in an AVL tree and answer ancestor, division, and rank queries")
        .arg(arg!(-i --input <FILE> "A script whose first line is the root member (`<label> <rank>`), followed by one command per line").index(1).required(true).value_parser(value_parser!(PathBuf)))
        .arg(arg!(-o --output <FILE> "Where to write one line per event or query result").index(2).required(true).value_parser(value_parser!(PathBuf)))
        .arg(arg!(-p --precision <DIGITS> "Digits printed after the decimal point of a rank").default_value("3").value_parser(value_parser!(usize)))
        .arg(arg!(--vacancy <LABEL> "Printed when a departing member is replaced by nobody").default_value("nobody"))
        .arg(arg!(--strict "Abort on the first unknown command or failing query instead of skipping it"))
        .arg(arg!(-d --debug "Increase log verbosity on stderr (-d info, -dd debug, -ddd trace)").action(ArgAction::Count))
        .get_matches();

    setup_logging(params.get_count("debug"));

    let input_file = params.get_one::<PathBuf>("input").unwrap();
    let output_file = params.get_one::<PathBuf>("output").unwrap();
    let precision = params.get_one::<usize>("precision").unwrap();
    let vacancy = params.get_one::<String>("vacancy").unwrap();

    let config = match Config::builder()
        .precision(*precision)
        .vacancy_label(vacancy.as_str())
        .strict(params.get_flag("strict"))
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if let Err(e) = run(input_file, output_file, &config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(input: &Path, output: &Path, config: &Config) -> Result<(), ScriptError> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    let summary = script::run(reader, writer, config)?;
    tracing::info!(?summary, "done");
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    // RUST_LOG wins over -d when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(filter.into()));

    // Formatted output directed to stderr, so it never mixes with the report
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}
