use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;
use treepath::cli::{self, CliError, FindOptions, FlattenOptions};

#[derive(ClapParser)]
#[command(name = "treepath")]
#[command(about = "treepath - select elements of JSON documents with slash-delimited path queries")]
#[command(version)]
struct Cli {
    /// Log query compilation and matches to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a path query and print every match
    Find {
        /// The path query, e.g. '**/name=a*' or 'items/0..2'
        query: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Regex flags to apply (any of i, m, x)
        #[arg(short, long)]
        flags: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print every leaf of the document under its path
    Flatten {
        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Do not escape special characters in keys
        #[arg(long)]
        raw: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Find {
            query,
            input,
            flags,
            pretty,
        } => run_find(query, input, flags, pretty),
        Commands::Flatten { input, raw, pretty } => run_flatten(input, raw, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("treepath=trace")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_find(
    query: String,
    input: Option<String>,
    flags: Option<String>,
    pretty: bool,
) -> Result<(), CliError> {
    let options = FindOptions {
        query,
        input: read_input(input)?,
        flags,
    };

    for record in cli::execute_find(&options)? {
        print_json(&record, pretty)?;
    }
    Ok(())
}

fn run_flatten(input: Option<String>, raw: bool, pretty: bool) -> Result<(), CliError> {
    let options = FlattenOptions {
        input: read_input(input)?,
        raw,
    };

    print_json(&cli::execute_flatten(&options)?, pretty)
}
