//! gitql - SQL-shaped queries over git repository metadata
//!
//! Command-line entry point: run one query, list tables, or start the REPL.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gitql::db::{Database, DatabaseConfig, DatabaseResult, Repl, ReplConfig};
use gitql::executor::DEFAULT_LIMIT;
use gitql::output::{OutputFormat, OutputWriter};

const AFTER_LONG_HELP: &str = r#"
TABLES
  commits    hash, date, author, author_email, committer, committer_email, message, full_message
  refs       name, full_name, type, hash
  branches   refs where type = 'branch'
  tags       refs where type = 'tag'
  remotes    name, url, push_url, owner
  trees      reserved, always empty

EXAMPLES
  gitql "SELECT hash, message FROM commits LIMIT 2"
  gitql "SELECT name, hash FROM tags ORDER BY name"
  gitql -f json "SELECT * FROM remotes"
  gitql -p ../other-repo "SELECT author FROM commits WHERE message LIKE 'fix%'""#;

#[derive(Parser)]
#[command(name = "gitql")]
#[command(version)]
#[command(about = "Query git repository metadata with SQL")]
#[command(after_long_help = AFTER_LONG_HELP)]
struct Cli {
    /// Query to execute; starts the REPL when omitted
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Path inside the repository to query
    #[arg(short, long, env = "GITQL_REPO", default_value = ".")]
    path: PathBuf,

    /// Output format: table, json, jsonl
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Row limit for queries without a LIMIT clause
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    default_limit: usize,

    /// List the queryable tables and exit
    #[arg(long)]
    show_tables: bool,

    /// Enable verbose/debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("gitql=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> DatabaseResult<()> {
    let config = DatabaseConfig::new(&cli.path)
        .default_limit(cli.default_limit)
        .verbose(cli.verbose);
    let db = Database::open_with_config(config)?;

    let query = if cli.show_tables {
        Some("SHOW TABLES".to_string())
    } else {
        cli.query
    };

    match query {
        Some(sql) => {
            let rs = db.execute(&sql)?;
            let mut out = OutputWriter::new(io::stdout().lock(), cli.format);
            out.write_result(&rs)?;
            out.flush()?;
            Ok(())
        }
        None => {
            let config = ReplConfig {
                format: cli.format,
                ..Default::default()
            };
            Repl::with_config(db, config).run()
        }
    }
}
