//! Parse command - extract values from text with a template.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use stringparser_core::{ExtractionError, Flags, Parser, Value};

use super::config::{default_config_path, load_config};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Format string used as template (a template name with --named)
    #[arg(required = true)]
    template: String,

    /// Texts to parse (default: lines of --input or stdin)
    text: Vec<String>,

    /// Input file
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Look the template up by name in the configuration
    #[arg(long)]
    named: bool,

    /// Ignore letter case
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Let the template match any single line of the text
    #[arg(short, long)]
    multiline: bool,

    /// Let string fields span newlines
    #[arg(short = 's', long)]
    dotall: bool,

    /// Ignore whitespace in the generated pattern
    #[arg(long)]
    extended: bool,

    /// Parse the whole input as one text instead of line by line
    #[arg(long)]
    whole: bool,

    /// Skip texts that do not match instead of failing
    #[arg(long)]
    skip_unmatched: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array of results
    Json,
    /// CSV, one row per text
    Csv,
    /// One result per line
    Text,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config_path = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);
    let config = load_config(&config_path)?;

    let template = if args.named {
        config
            .template(&args.template)
            .ok_or_else(|| anyhow::anyhow!("Template not found in configuration: {}", args.template))?
            .to_string()
    } else {
        args.template.clone()
    };

    let mut flags = config.matching.flags();
    for (enabled, flag) in [
        (args.ignore_case, Flags::IGNORECASE),
        (args.multiline, Flags::MULTILINE),
        (args.dotall, Flags::DOTALL),
        (args.extended, Flags::VERBOSE),
    ] {
        if enabled {
            flags |= flag;
        }
    }

    let parser = Parser::with_flags(&template, flags)?;
    info!("Compiled template into {}", parser.pattern());

    let texts = read_texts(&args)?;
    debug!("Parsing {} texts", texts.len());

    let skip_unmatched = args.skip_unmatched || config.output.skip_unmatched;
    let mut results = Vec::with_capacity(texts.len());
    for text in &texts {
        match parser.parse(text) {
            Ok(value) => results.push(value),
            Err(ExtractionError::NoMatch { text, .. }) if skip_unmatched => {
                warn!("Skipping unmatched text: {:?}", text);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let output = format_results(&results, args.format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} {} results written to {}",
            style("✓").green(),
            results.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn read_texts(args: &ParseArgs) -> anyhow::Result<Vec<String>> {
    if !args.text.is_empty() {
        return Ok(args.text.clone());
    }

    let content = match &args.input {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            fs::read_to_string(path)?
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if args.whole {
        Ok(vec![content])
    } else {
        Ok(content.lines().map(str::to_string).collect())
    }
}

fn format_results(results: &[Value], format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = if pretty {
                serde_json::to_string_pretty(results)?
            } else {
                serde_json::to_string(results)?
            };
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => format_csv(results),
        OutputFormat::Text => Ok(results.iter().map(|value| format!("{}\n", value)).collect()),
    }
}

fn format_csv(results: &[Value]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Maps and objects get a header row taken from the first result
    let header: Option<Vec<String>> = results.first().and_then(|first| match first {
        Value::Map(map) => Some(map.keys().map(|k| k.to_string()).collect()),
        Value::Object(attrs) => Some(attrs.keys().cloned().collect()),
        _ => None,
    });
    if let Some(header) = &header {
        wtr.write_record(header)?;
    }

    // Scalars as plain text, containers as compact JSON
    for value in results {
        let row: Vec<String> = match value {
            Value::List(items) => items.iter().map(Value::to_string).collect(),
            Value::Map(map) => map.values().map(Value::to_string).collect(),
            Value::Object(attrs) => attrs.values().map(Value::to_string).collect(),
            scalar => vec![scalar.to_string()],
        };
        wtr.write_record(&row)?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}
