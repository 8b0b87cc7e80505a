//! Formulary CLI - named-function catalog tool

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use formulary::prelude::*;
use formulary::{parse_formula_with, DependencyGraph, Expander, ParserOptions};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "formulary")]
#[command(
    author,
    version,
    about = "Build, document and lint spreadsheet named functions"
)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CatalogArgs {
    /// Directory containing one YAML file per formula
    #[arg(short, long, default_value = "formulas")]
    dir: PathBuf,

    /// Never re-add a leading '=' to expanded formulas
    #[arg(long)]
    no_equals_prefix: bool,
}

impl CatalogArgs {
    fn load(&self) -> Result<Catalog> {
        let catalog = Catalog::open(&self.dir)
            .with_context(|| format!("Failed to load formulas from '{}'", self.dir.display()))?;
        tracing::info!("Loaded {} formula(s)", catalog.len());
        Ok(catalog)
    }

    fn expand_options(&self) -> ExpandOptions {
        if self.no_equals_prefix {
            ExpandOptions::new().with_equals_prefixes(Vec::<String>::new())
        } else {
            ExpandOptions::new()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate README.md from formula files and a template
    Readme {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Template with AUTO-GENERATED CONTENT markers
        #[arg(short, long, default_value = ".readme-template.md")]
        template: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "README.md")]
        output: PathBuf,
    },

    /// Check formula files against the lint rules
    Lint {
        /// Directory containing one YAML file per formula
        #[arg(short, long, default_value = "formulas")]
        dir: PathBuf,

        /// Rule to skip (repeatable)
        #[arg(long = "disable", value_name = "RULE")]
        disabled: Vec<String>,
    },

    /// Print one formula with every named call inlined
    Expand {
        /// Formula name
        name: String,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which formulas call which
    Graph {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a formula and show its syntax tree
    Parse {
        /// Formula text
        formula: String,

        /// Accept LAMBDA(...)(...) style invocations
        #[arg(long)]
        allow_invocation: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Readme {
            catalog,
            template,
            output,
        } => generate_readme(&catalog, &template, &output),
        Commands::Lint { dir, disabled } => lint(&dir, disabled),
        Commands::Expand {
            name,
            catalog,
            json,
        } => expand(&name, &catalog, json),
        Commands::Graph { catalog, json } => graph(&catalog, json),
        Commands::Parse {
            formula,
            allow_invocation,
        } => parse(&formula, allow_invocation),
    }
}

/// Log to stderr; `RUST_LOG` overrides the flags
fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time(),
        )
        .init();
}

fn generate_readme(args: &CatalogArgs, template: &Path, output: &Path) -> Result<()> {
    let catalog = args.load()?;
    let built = catalog
        .build_with_options(&BuildOptions {
            expand: args.expand_options(),
        })
        .context("Failed to build formula catalog")?;

    let text = std::fs::read_to_string(template)
        .with_context(|| format!("Failed to read template '{}'", template.display()))?;
    let list = render_formula_list(&built.formulas);
    let readme = render_readme(&text, &list)
        .with_context(|| format!("Invalid template '{}'", template.display()))?;

    std::fs::write(output, readme)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    eprintln!(
        "Wrote {} formula(s) to '{}'",
        built.stats.formulas,
        output.display()
    );

    Ok(())
}

fn lint(dir: &Path, disabled: Vec<String>) -> Result<()> {
    let linter = Linter::with_options(&LintOptions {
        disabled_rules: disabled,
    });
    let summary = linter
        .lint_dir(dir, &YamlReadOptions::default())
        .with_context(|| format!("Failed to lint '{}'", dir.display()))?;

    for error in &summary.errors {
        println!("ERROR: {}", error);
    }
    for warning in &summary.warnings {
        println!("WARNING: {}", warning);
    }
    println!(
        "Checked {} file(s): {} error(s), {} warning(s)",
        summary.files_checked,
        summary.errors.len(),
        summary.warnings.len()
    );

    if summary.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn expand(name: &str, args: &CatalogArgs, json: bool) -> Result<()> {
    let catalog = args.load()?;
    let options = BuildOptions {
        expand: args.expand_options(),
    };
    let formula = catalog
        .expand_formula(name, &options)
        .with_context(|| format!("Failed to expand '{}'", name))?;

    if json {
        let value = serde_json::json!({
            "name": formula.name,
            "expanded": formula.expanded,
            "dependencies": formula.dependencies,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", formula.expanded);
    }

    Ok(())
}

fn graph(args: &CatalogArgs, json: bool) -> Result<()> {
    let catalog = args.load()?;
    let expander = Expander::new(&catalog);
    for (idx, definition) in catalog.iter().enumerate() {
        if let Some(Err(err)) = expander.parsed(idx) {
            tracing::warn!("{}: {}", definition.name, err);
        }
    }

    let graph = DependencyGraph::build(
        catalog
            .names()
            .enumerate()
            .map(|(idx, name)| (name, expander.parsed(idx).and_then(|r| r.ok()))),
        &catalog,
    );
    let cycles = graph.find_cycles();

    if json {
        let edges: BTreeMap<&str, Vec<&str>> = graph
            .nodes()
            .map(|name| (name, graph.dependencies(name).collect()))
            .collect();
        let cycles: Vec<&[String]> = cycles.iter().map(|c| c.members()).collect();
        let value = serde_json::json!({
            "dependencies": edges,
            "cycles": cycles,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for name in graph.nodes() {
        let deps: Vec<&str> = graph.dependencies(name).collect();
        if deps.is_empty() {
            writeln!(out, "{}", name)?;
        } else {
            writeln!(out, "{} -> {}", name, deps.join(", "))?;
        }
    }

    if !cycles.is_empty() {
        for cycle in &cycles {
            writeln!(out, "cycle: {}", cycle)?;
        }
        bail!("{} circular dependenc(ies) found", cycles.len());
    }

    Ok(())
}

fn parse(formula: &str, allow_invocation: bool) -> Result<()> {
    let options = ParserOptions {
        allow_immediate_invocation: allow_invocation,
    };
    let ast = parse_formula_with(formula, &options).context("Failed to parse formula")?;

    println!("{:#?}", ast);
    println!();
    println!("{}", ast);

    Ok(())
}
