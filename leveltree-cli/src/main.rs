//! Command-line interface for leveltree
//! Reads records written in leveltree notation, rebuilds the tree they describe
//! and prints it in one of the registered formats.
//!
//! Usage:
//!   leveltree `<path>` [--config `<file>`] [--format `<format>`] [--simple]   - Build and print a tree
//!   leveltree --list-formats                                             - List all available formats

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use leveltree::formats::{FormatRegistry, Output, TextFormatter};
use leveltree::notation::parse_records;
use leveltree::{build_outline, build_simple};
use leveltree_config::{ConfigError, LeveltreeConfig, Loader};
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("leveltree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rebuild trees from flat, leveled records")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the notation file")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (see --list-formats)"),
        )
        .arg(
            Arg::new("simple")
                .long("simple")
                .help("Print the compact projection instead of the full outline")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("starting-depth")
                .long("starting-depth")
                .help("Depth assumed before the first record")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("mandatory")
                .long("mandatory")
                .short('m')
                .help("Comma-separated depths that must be present on every path")
                .value_delimiter(',')
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("all-mandatory")
                .long("all-mandatory")
                .help("Treat every depth as mandatory")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    init_tracing(&config.log_level);

    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing formats");
    handle_build_command(path, &config);
}

/// Layer the user file and CLI flags over the built-in defaults.
fn load_config(matches: &ArgMatches) -> Result<LeveltreeConfig, ConfigError> {
    let mut loader = Loader::new();
    if let Some(file) = matches.get_one::<String>("config") {
        loader = loader.with_file(file);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if matches.get_flag("simple") {
        loader = loader.set_override("output.simple", true)?;
    }
    if let Some(depth) = matches.get_one::<i64>("starting-depth") {
        loader = loader.set_override("build.starting_depth", *depth)?;
    }
    if let Some(depths) = matches.get_many::<i64>("mandatory") {
        loader = loader.set_override("build.mandatory_depths", depths.copied().collect::<Vec<_>>())?;
    }
    if matches.get_flag("all-mandatory") {
        loader = loader.set_override("build.mandatory_depths_all", true)?;
    }
    loader.build()
}

/// Logs go to stderr; `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Handle the build command
fn handle_build_command(path: &str, config: &LeveltreeConfig) {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });

    let records = parse_records(&source).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {}", path, e);
        std::process::exit(1);
    });
    debug!(path, records = records.len(), "parsed notation");

    let built = if config.output.simple {
        build_simple(records, &config.build).map(Output::Simple)
    } else {
        build_outline(records, &config.build).map(Output::Outline)
    };
    let output = built.unwrap_or_else(|e| {
        eprintln!("Error building tree: {}", e);
        std::process::exit(1);
    });

    let mut registry = FormatRegistry::with_defaults();
    registry.register(TextFormatter::new(config.output.indent.as_str()));

    let formatted = registry
        .serialize(&output, &config.output.format)
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            eprintln!("Available formats: {}", registry.list_formats().join(", "));
            std::process::exit(1);
        });

    print!("{}", formatted);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");

    for name in registry.list_formats() {
        println!("  {}", name);
        if let Some(formatter) = registry.get(&name) {
            println!("    {}", formatter.description());
        }
        println!();
    }
}
