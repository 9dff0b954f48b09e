//! Result rendering for the CLI and REPL.

use std::io::{self, Write};

use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use crate::executor::ResultSet;

/// How result sets are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Jsonl,
}

/// Writes result sets in one output format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Render one result set. Empty results still print their header.
    pub fn write_result(&mut self, rs: &ResultSet) -> io::Result<()> {
        match self.format {
            OutputFormat::Table => {
                writeln!(self.writer, "{}", render_table(rs))?;
                let noun = if rs.len() == 1 { "row" } else { "rows" };
                writeln!(self.writer, "({} {})", rs.len(), noun)?;
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&rs.rows)?;
                writeln!(self.writer, "{}", json)?;
            }
            OutputFormat::Jsonl => {
                for row in rs.iter() {
                    writeln!(self.writer, "{}", serde_json::to_string(row)?)?;
                }
            }
        }
        Ok(())
    }

    /// Write text without a newline and flush it.
    pub fn write_prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.writer, "{}", text)?;
        self.writer.flush()
    }

    pub fn writeln(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", text)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Build a table with the result's columns as header.
pub fn render_table(rs: &ResultSet) -> Table {
    let mut table = create_table();
    table.set_header(rs.columns.iter());
    for row in rs.iter() {
        table.add_row(row.values());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Row;

    fn sample() -> ResultSet {
        let mut rs = ResultSet::new(vec!["name".into(), "hash".into()]);
        rs.push(Row::from_iter([("name", "v1"), ("hash", "abc")]));
        rs.push(Row::from_iter([("name", "latest"), ("hash", "NULL")]));
        rs
    }

    fn render(rs: &ResultSet, format: OutputFormat) -> String {
        let mut out = OutputWriter::new(Vec::new(), format);
        out.write_result(rs).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_table_output() {
        let text = render(&sample(), OutputFormat::Table);
        assert!(text.contains("name"));
        assert!(text.contains("latest"));
        assert!(text.trim_end().ends_with("(2 rows)"));
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let text = render(&ResultSet::new(vec!["hash".into()]), OutputFormat::Table);
        assert!(text.contains("hash"));
        assert!(text.contains("(0 rows)"));
    }

    #[test]
    fn test_json_output() {
        let text = render(&sample(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[1]["hash"], "NULL");
        assert_eq!(render(&ResultSet::default(), OutputFormat::Json).trim(), "[]");
    }

    #[test]
    fn test_jsonl_output() {
        let text = render(&sample(), OutputFormat::Jsonl);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, vec![r#"{"name":"v1","hash":"abc"}"#, r#"{"name":"latest","hash":"NULL"}"#]);
    }
}
