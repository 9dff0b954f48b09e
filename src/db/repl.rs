//! Interactive REPL (Read-Eval-Print Loop) for gitql.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use super::api::{Database, DatabaseResult};
use crate::output::{OutputFormat, OutputWriter};

/// REPL configuration.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string.
    pub prompt: String,
    /// Show timing information.
    pub timing: bool,
    /// Format for query results.
    pub format: OutputFormat,
    /// Print the banner on start.
    pub banner: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "gitql> ".into(),
            timing: false,
            format: OutputFormat::Table,
            banner: true,
        }
    }
}

/// The interactive REPL.
pub struct Repl {
    db: Database,
    config: ReplConfig,
    history: Vec<String>,
}

impl Repl {
    /// Create a new REPL with the given database.
    pub fn new(db: Database) -> Self {
        Self::with_config(db, ReplConfig::default())
    }

    /// Create a REPL with custom configuration.
    pub fn with_config(db: Database, config: ReplConfig) -> Self {
        Self {
            db,
            config,
            history: Vec::new(),
        }
    }

    /// Run the REPL on stdin and stdout.
    pub fn run(&mut self) -> DatabaseResult<()> {
        let stdin = io::stdin();
        self.run_with(stdin.lock(), io::stdout())
    }

    /// Run the REPL until `.quit` or end of input. Query errors are reported
    /// on stderr and do not end the session.
    pub fn run_with<R: BufRead, W: Write>(&mut self, mut input: R, output: W) -> DatabaseResult<()> {
        let mut out = OutputWriter::new(output, self.config.format);
        if self.config.banner {
            self.print_banner(&mut out)?;
        }

        let mut buffer = String::new();
        loop {
            let prompt = if buffer.is_empty() { self.config.prompt.as_str() } else { "    -> " };
            out.write_prompt(prompt)?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();

            if buffer.is_empty() && line.is_empty() {
                continue;
            }

            if buffer.is_empty() && is_command(line) {
                self.history.push(line.to_string());
                if self.handle_command(line, &mut out)? {
                    break;
                }
                continue;
            }

            // Queries run once they end with a semicolon.
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(line);
            if !buffer.ends_with(';') {
                continue;
            }

            let sql = std::mem::take(&mut buffer);
            self.history.push(sql.clone());

            let start = Instant::now();
            match self.db.execute(&sql) {
                Ok(rs) => {
                    out.write_result(&rs)?;
                    if self.config.timing {
                        out.writeln(&format!("Time: {:.3}ms", start.elapsed().as_secs_f64() * 1000.0))?;
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }

        out.flush()?;
        Ok(())
    }

    fn print_banner<W: Write>(&self, out: &mut OutputWriter<W>) -> DatabaseResult<()> {
        out.writeln(&format!("gitql v{}", env!("CARGO_PKG_VERSION")))?;
        out.writeln(&format!("Repository: {}", self.db.path().display()))?;
        out.writeln("Type .help for commands; end queries with ';'")?;
        Ok(())
    }

    /// Handle a dot command. Returns true when the session should end.
    fn handle_command<W: Write>(&mut self, cmd: &str, out: &mut OutputWriter<W>) -> DatabaseResult<bool> {
        let cmd = cmd.trim_start_matches(&['.', '\\'][..]).trim_end_matches(';');
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        let command = parts.first().map(|s| s.to_lowercase());

        match command.as_deref() {
            Some("help") | Some("h") | Some("?") => self.print_help(out)?,
            Some("quit") | Some("exit") | Some("q") => return Ok(true),
            Some("tables") | Some("dt") => {
                for table in self.db.tables() {
                    out.writeln(table)?;
                }
            }
            Some("schema") | Some("describe") | Some("d") => match parts.get(1) {
                Some(table) => match self.db.execute(&format!("DESCRIBE {}", table)) {
                    Ok(rs) => out.write_result(&rs)?,
                    Err(e) => eprintln!("Error: {}", e),
                },
                None => eprintln!("Usage: .schema <table_name>"),
            },
            Some("history") => {
                for (i, entry) in self.history.iter().enumerate() {
                    out.writeln(&format!("  {}: {}", i + 1, entry))?;
                }
            }
            Some("format") => match parts.get(1).map(|f| f.to_lowercase()).as_deref() {
                Some("table") => out.set_format(OutputFormat::Table),
                Some("json") => out.set_format(OutputFormat::Json),
                Some("jsonl") => out.set_format(OutputFormat::Jsonl),
                _ => eprintln!("Usage: .format table|json|jsonl"),
            },
            Some("timing") => {
                self.config.timing = !self.config.timing;
                out.writeln(&format!("Timing: {}", if self.config.timing { "on" } else { "off" }))?;
            }
            Some(other) => {
                eprintln!("Unknown command: .{}", other);
                eprintln!("Type .help for available commands");
            }
            None => {}
        }

        Ok(false)
    }

    fn print_help<W: Write>(&self, out: &mut OutputWriter<W>) -> DatabaseResult<()> {
        let help = [
            "Commands:",
            "  .help, .h, .?           Show this help message",
            "  .quit, .exit, .q        Exit the REPL",
            "  .tables, .dt            List all tables",
            "  .schema <table>         Show the fields of a table",
            "  .history                Show command history",
            "  .format <fmt>           Switch output: table, json, jsonl",
            "  .timing                 Toggle timing display",
            "",
            "Queries:",
            "  SELECT fields FROM table [WHERE ...] [ORDER BY field [ASC|DESC]] [LIMIT n];",
            "  SHOW TABLES;",
            "  DESCRIBE table;",
        ];
        for line in help {
            out.writeln(line)?;
        }
        Ok(())
    }
}

fn is_command(input: &str) -> bool {
    input.starts_with('.') || input.starts_with('\\')
}
