//! fieldql: query mapped tables from the command line
//!
//! Tables and their coercion rules are declared in the configuration file.
//!
//! # Usage
//!
//! ```bash
//! # List declared tables
//! fieldql tables
//!
//! # Show the SQL for a filter (no database needed)
//! fieldql compile t_multiple_boolean --where "primitiveFlag IS TRUE"
//!
//! # Count matching rows
//! fieldql count t_multiple_boolean --where "objectFlag IS NULL"
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use fieldql::prelude::*;

#[derive(Parser)]
#[command(name = "fieldql")]
#[command(version)]
#[command(about = "Typed conditions over mapped tables", long_about = None)]
#[command(after_help = "EXAMPLES:
    fieldql tables
    fieldql compile t_multiple_boolean --where 'booleanFlag IS TRUE AND objectFlag IS NULL'
    fieldql select t_multiple_boolean --where 'primitiveFlag = 1' --limit 10 --format json")]
struct Cli {
    /// Configuration file (defaults to <config dir>/fieldql/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database connection URL
    #[arg(long, global = true, env = "FIELDQL_DATABASE_URL")]
    database_url: Option<String>,

    /// SQL dialect (inferred from the URL when omitted)
    #[arg(long, global = true)]
    dialect: Option<Dialect>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatementKind {
    Count,
    Select,
    Delete,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tables declared in the configuration
    Tables,
    /// Show the SQL and parameters for a filter without executing it
    Compile {
        table: String,
        /// Filter expression, e.g. "flag IS TRUE AND score > 3"
        #[arg(short, long = "where")]
        filter: Option<String>,
        #[arg(short, long, value_enum, default_value = "select")]
        kind: StatementKind,
        #[arg(short, long)]
        limit: Option<u64>,
    },
    /// Count rows matching a filter
    Count {
        table: String,
        #[arg(short, long = "where")]
        filter: Option<String>,
    },
    /// Fetch rows matching a filter
    Select {
        table: String,
        #[arg(short, long = "where")]
        filter: Option<String>,
        #[arg(short, long)]
        limit: Option<u64>,
        /// Field to sort by; prefix with '-' for descending
        #[arg(short, long)]
        order_by: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "fieldql=debug" } else { "fieldql=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
    }
    if cli.dialect.is_some() {
        config.database.dialect = cli.dialect;
    }
    let registry = config.registry()?;

    match &cli.command {
        Commands::Tables => {
            show_tables(&registry);
            Ok(())
        }
        Commands::Compile {
            table,
            filter,
            kind,
            limit,
        } => compile(&config, &registry, table, filter.as_deref(), *kind, *limit),
        Commands::Count { table, filter } => {
            let db = connect(&config, registry).await?;
            let mut query = db.from_table(table)?;
            if let Some(filter) = filter {
                query = query.parse_filter(filter)?;
            }
            let count = query.select_count().await?;
            println!("{}", count.to_string().cyan().bold());
            Ok(())
        }
        Commands::Select {
            table,
            filter,
            limit,
            order_by,
        } => {
            let db = connect(&config, registry).await?;
            let mut query = db.from_table(table)?;
            if let Some(filter) = filter {
                query = query.parse_filter(filter)?;
            }
            if let Some(order) = order_by {
                let definition = db.registry().table(table)?;
                query = match order.strip_prefix('-') {
                    Some(field) => query.order_by_desc(&definition.field(field)?)?,
                    None => query.order_by(&definition.field(order)?)?,
                };
            }
            if let Some(n) = limit {
                query = query.limit(*n);
            }
            let rows = query.select().await?;
            format_output(&rows, &cli.format);
            Ok(())
        }
    }
}

fn resolve_dialect(config: &Config) -> Dialect {
    config
        .database
        .dialect
        .or_else(|| Dialect::from_url(&config.database.url))
        .unwrap_or_default()
}

async fn connect(config: &Config, registry: Registry) -> anyhow::Result<Db> {
    if config.database.url.is_empty() {
        bail!("No database URL. Use --database-url or set FIELDQL_DATABASE_URL");
    }
    let db = Db::open(&config.database, registry)
        .await
        .with_context(|| format!("failed to connect to {}", config.database.url))?;
    Ok(db)
}

fn compile(
    config: &Config,
    registry: &Registry,
    table: &str,
    filter: Option<&str>,
    kind: StatementKind,
    limit: Option<u64>,
) -> anyhow::Result<()> {
    let dry = DryRun::new(resolve_dialect(config));
    let mut query = Query::<Row, _>::new(&dry, registry.table(table)?);
    if let Some(filter) = filter {
        query = query.parse_filter(filter)?;
    }
    if let Some(n) = limit {
        query = query.limit(n);
    }

    let stmt = match kind {
        StatementKind::Count => query.select_count_statement()?,
        StatementKind::Select => query.select_statement()?,
        StatementKind::Delete => query.delete_statement()?,
    };

    println!("{} {}", "Dialect:".dimmed(), stmt.dialect.to_string().cyan());
    println!("{}", "Generated SQL:".green().bold());
    println!("  {}", stmt.sql.white());
    if !stmt.params.is_empty() {
        println!();
        println!("{}", "Bindings:".cyan());
        for (i, value) in stmt.params.iter().enumerate() {
            println!("  {} = {}", i + 1, value.to_string().yellow());
        }
        println!();
        println!("{}", "Inline (display only):".dimmed());
        println!("  {}", stmt.to_inline_sql().dimmed());
    }
    Ok(())
}

fn show_tables(registry: &Registry) {
    if registry.is_empty() {
        println!("{}", "(no tables configured)".dimmed());
        return;
    }
    for table in registry.tables() {
        println!("{}", table.name.white().bold());
        for column in &table.columns {
            let rule = column
                .coercion
                .map(|rule| rule.to_string())
                .unwrap_or_default();
            let key = if column.primary_key { " [pk]" } else { "" };
            println!(
                "  {:20} {:20} {:?}{} {}",
                column.field.cyan(),
                column.column,
                column.sql_type,
                key.yellow(),
                rule.dimmed()
            );
        }
    }
}

fn format_output(rows: &[Row], format: &OutputFormat) {
    if rows.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows).unwrap_or_default());
        }
        OutputFormat::Table => {
            let columns: Vec<&str> = rows[0].iter().map(|(field, _)| field).collect();

            let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
            for row in rows {
                for (i, (_, value)) in row.iter().enumerate() {
                    if let Some(w) = widths.get_mut(i) {
                        *w = (*w).max(value.to_string().len());
                    }
                }
            }

            let header: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:width$}", c, width = *w))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in rows {
                let cells: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|((_, value), w)| format!("{:width$}", value.to_string(), width = *w))
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", rows.len().to_string().cyan());
        }
    }
}
