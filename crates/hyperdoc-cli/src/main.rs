//! hyperdoc CLI: hypermedia document assembly from the command line
//!
//! Commands: expand, afford, tree, completions

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing::debug;

use hyperdoc_affordance::AffordanceBuilder;
use hyperdoc_core::{DeclaredType, HttpVerb, InputParameter, ParameterStyle};
use hyperdoc_transform::{render, OutputFormat, TransformConfig, Transformer};
use hyperdoc_uri::{Bindings, PartialUriTemplate};

#[derive(Parser)]
#[command(name = "hyperdoc")]
#[command(version)]
#[command(about = "Format-agnostic hypermedia document assembly")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Expand a URI template against a partial set of bindings
    #[command(alias = "x")]
    Expand {
        template: String,
        /// Variable binding as name=value (repeatable)
        #[arg(short, long = "bind", value_parser = parse_pair)]
        bind: Vec<(String, String)>,
    },
    /// Build an affordance and print it as JSON
    #[command(alias = "a")]
    Afford {
        template: String,
        /// HTTP verb of a declared action (repeatable)
        #[arg(short = 'X', long = "verb", default_value = "GET")]
        verbs: Vec<HttpVerb>,
        /// Link relation (repeatable, at least one)
        #[arg(short, long = "rel", required = true)]
        rels: Vec<String>,
        /// Variable binding as name=value (repeatable)
        #[arg(short, long = "bind", value_parser = parse_pair)]
        bind: Vec<(String, String)>,
        /// Input parameter as name, name:Type or name:Type=A|B (repeatable)
        #[arg(short, long = "param", value_parser = parse_parameter)]
        params: Vec<InputParameter>,
        /// Request body of mutating actions as name:Type
        #[arg(long, value_parser = parse_body)]
        body: Option<InputParameter>,
        /// Reverse relation as anchor=rel (repeatable)
        #[arg(long = "rev", value_parser = parse_pair)]
        reverse: Vec<(String, String)>,
    },
    /// Transform a JSON document into a node tree
    #[command(alias = "t")]
    Tree {
        /// Input file, or - for stdin
        input: PathBuf,
        /// Transformer config (.toml, .yaml or .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output format: json or outline
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Expand { template, bind } => expand(&template, bind),
        Commands::Afford {
            template,
            verbs,
            rels,
            bind,
            params,
            body,
            reverse,
        } => afford(
            &template,
            &AffordArgs {
                verbs,
                rels,
                bindings: bind.into_iter().collect(),
                params,
                body,
                reverse,
            },
        ),
        Commands::Tree {
            input,
            config,
            format,
        } => tree(&input, config.as_deref(), format),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "hyperdoc", &mut io::stdout());
            Ok(())
        }
    }
}

fn expand(template: &str, bind: Vec<(String, String)>) -> Result<()> {
    let template = PartialUriTemplate::parse(template)?;
    let bindings: Bindings = bind.into_iter().collect();
    let expansion = template.expand(&bindings);
    println!("{}", serde_json::to_string_pretty(&expansion)?);
    Ok(())
}

struct AffordArgs {
    verbs: Vec<HttpVerb>,
    rels: Vec<String>,
    bindings: Bindings,
    params: Vec<InputParameter>,
    body: Option<InputParameter>,
    reverse: Vec<(String, String)>,
}

impl AffordArgs {
    /// Declared parameters for one verb; only form-style verbs take a body.
    fn parameters_for(&self, verb: HttpVerb) -> Vec<InputParameter> {
        let mut parameters = self.params.clone();
        if verb.parameter_style() == ParameterStyle::Form {
            parameters.extend(self.body.clone());
        }
        parameters
    }
}

fn afford(template: &str, args: &AffordArgs) -> Result<()> {
    let (first, rest) = args
        .verbs
        .split_first()
        .context("at least one --verb is required")?;

    let mut builder = AffordanceBuilder::new(template, &args.bindings)?
        .afford(*first)
        .parameters(args.parameters_for(*first))?
        .done();
    for verb in rest {
        builder = builder
            .afford(*verb)
            .parameters(args.parameters_for(*verb))?
            .done();
    }
    for rel in &args.rels {
        builder = builder.rel(rel)?;
    }
    for (anchor, rel) in &args.reverse {
        builder = builder.reverse_rel(anchor, rel)?;
    }

    let affordance = builder.build()?;
    println!("{}", serde_json::to_string_pretty(&affordance)?);
    Ok(())
}

fn tree(input: &Path, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = match config {
        Some(path) => TransformConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TransformConfig::default(),
    };

    let source = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("reading {}", input.display()))?
    };
    let document: serde_json::Value =
        serde_json::from_str(&source).context("input is not valid JSON")?;
    debug!(bytes = source.len(), "parsed input document");

    let node = Transformer::new(config).to_node_tree(&document)?;
    println!("{}", render(&node, format));
    Ok(())
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    if name.is_empty() {
        return Err(format!("missing name in '{s}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn parse_declared_type(s: &str) -> (String, DeclaredType) {
    let Some((name, declared)) = s.split_once(':') else {
        return (s.to_string(), DeclaredType::string());
    };
    let declared_type = match declared.split_once('=') {
        Some((type_name, members)) => DeclaredType::enumeration(type_name, members.split('|')),
        None => DeclaredType::named(declared),
    };
    (name.to_string(), declared_type)
}

fn parse_parameter(s: &str) -> Result<InputParameter, String> {
    let (name, declared_type) = parse_declared_type(s);
    if name.is_empty() {
        return Err(format!("missing parameter name in '{s}'"));
    }
    Ok(InputParameter::new(name, declared_type))
}

fn parse_body(s: &str) -> Result<InputParameter, String> {
    if !s.contains(':') {
        return Err(format!("expected name:Type, got '{s}'"));
    }
    let (name, declared_type) = parse_declared_type(s);
    if name.is_empty() {
        return Err(format!("missing body name in '{s}'"));
    }
    Ok(InputParameter::body(name, declared_type))
}
