use clap::{ArgGroup, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use teddy_lib::bytes::{format_bytes, parse_bytes};
use teddy_lib::config::Config;
use teddy_lib::file::load_document;
use teddy_lib::tree::resolve_str;
use teddy_lib::{filter_objects, get_info, logging, search_page, Error, Query};

#[derive(Parser)]
#[command(name = "teddy")]
#[command(about = "Search nested JSON documents", long_about = None)]
struct Cli {
    /// Config file (defaults to $TEDDY_CONFIG, then ./.teddy.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

// VALUE arguments are parsed as JSON first, so `1` is a number and `'"1"'` a string.
#[derive(Subcommand)]
enum Command {
    /// Find nodes by key, value or key regex
    #[command(group(ArgGroup::new("query").required(true).args(["key", "value", "pattern"])))]
    Search {
        file: PathBuf,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        pattern: Option<String>,
        /// Case-insensitive substring matching
        #[arg(long)]
        fuzzy: bool,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Pull fields out of the records holding the target values
    Info {
        file: PathBuf,
        #[arg(long = "target", required = true)]
        targets: Vec<String>,
        #[arg(long = "key")]
        keys: Vec<String>,
        #[arg(long)]
        fuzzy_values: bool,
        #[arg(long)]
        fuzzy_keys: bool,
    },
    /// Select top-level records by field values
    Filter {
        file: PathBuf,
        #[arg(long = "key", required = true)]
        keys: Vec<String>,
        #[arg(long = "accept")]
        accepts: Vec<String>,
        #[arg(long = "reject")]
        rejects: Vec<String>,
        #[arg(long)]
        fuzzy: bool,
    },
    /// Print the node at a dotted path such as `items[0].name`
    Show { file: PathBuf, path: Option<String> },
    /// Format a byte count, or parse a size like `1.5 MB`
    Bytes { size: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::discover(cli.config.as_deref())?;
    logging::init(&config.log)?;

    let output = run(cli.command, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(command: Command, config: &Config) -> teddy_lib::Result<Value> {
    let defaults = &config.search;
    match command {
        Command::Search {
            file,
            key,
            value,
            pattern,
            fuzzy,
            offset,
            limit,
        } => {
            let doc = load_document(&file)?;
            let (query, strict) = match (key, value, pattern) {
                (Some(k), _, _) => (Query::Key(k), defaults.strict_keys && !fuzzy),
                (_, Some(v), _) => (Query::Value(cli_value(&v)), defaults.strict_values && !fuzzy),
                (_, _, Some(p)) => (Query::key_pattern(&p)?, true),
                (None, None, None) => {
                    return Err(Error::InvalidArgument("one of --key, --value, --pattern".into()))
                }
            };
            let limit = limit.unwrap_or(defaults.limit);
            let response = search_page(&doc, &query, strict, offset, limit);
            Ok(serde_json::to_value(&response)?)
        }
        Command::Info {
            file,
            targets,
            keys,
            fuzzy_values,
            fuzzy_keys,
        } => {
            let doc = load_document(&file)?;
            let targets: Vec<Value> = targets.iter().map(|t| cli_value(t)).collect();
            let info = get_info(
                &doc,
                &targets,
                &keys,
                defaults.strict_values && !fuzzy_values,
                defaults.strict_keys && !fuzzy_keys,
            );
            Ok(Value::Object(info))
        }
        Command::Filter {
            file,
            keys,
            accepts,
            rejects,
            fuzzy,
        } => {
            let doc = load_document(&file)?;
            let accepts: Vec<Value> = accepts.iter().map(|v| cli_value(v)).collect();
            let rejects: Vec<Value> = rejects.iter().map(|v| cli_value(v)).collect();
            let records = filter_objects(
                &doc,
                &keys,
                &accepts,
                &rejects,
                defaults.strict_keys && !fuzzy,
            )?;
            Ok(Value::Array(records))
        }
        Command::Show { file, path } => {
            let doc = load_document(&file)?;
            let path = path.unwrap_or_default();
            resolve_str(&doc, &path)?
                .cloned()
                .ok_or(Error::PathNotFound(path))
        }
        Command::Bytes { size } => match size.trim().parse::<u64>() {
            Ok(n) => Ok(Value::String(format_bytes(n))),
            Err(_) => Ok(Value::from(parse_bytes(&size)?)),
        },
    }
}

fn cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
