use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser as ClapParser};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use startline::{
    format_debug, format_json, format_wire, ParseError, Parser, ParserConfig, Report, StartLine,
};

/// startline CLI — strict HTTP/1.x start-line parser.
///
/// Reads raw HTTP bytes from a file, --raw string, or stdin, parses the
/// start line at the front and prints it in the chosen format.
///
/// Escape sequences (\r, \n, \t, \\) in the --raw value are interpreted so
/// you can pass a full request as a single shell argument.
#[derive(ClapParser)]
#[command(name = "startline-cli", version, about, long_about = None)]
struct Cli {
    /// Path to a file containing raw HTTP bytes.
    /// Reads from stdin when neither FILE nor --raw is given.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Raw HTTP string (escape sequences \r \n \t \\ are expanded).
    #[arg(long)]
    raw: Option<String>,

    /// Parse a response status line instead of a request line.
    #[arg(long)]
    status: bool,

    /// Output format.
    #[arg(short, long, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Pretty-print JSON output (ignored for other formats).
    #[arg(short, long)]
    pretty: bool,

    /// Maximum start-line length in bytes, terminator excluded.
    #[arg(long, default_value = "8192")]
    max_line_len: usize,

    /// Require a CRLF terminator; reject bare LF.
    #[arg(long)]
    strict_crlf: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable debug output
    Debug,
    /// Canonical CRLF-terminated start line
    Wire,
}

/// Why a run ended without output.
#[derive(Debug, Error)]
enum CliError {
    #[error("Error reading input: {0}")]
    Input(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Input(_) => 1,
            Self::Parse(_) => 2,
        }
    }
}

/// Where the raw bytes come from.
enum Source<'a> {
    Raw(&'a str),
    File(&'a Path),
    Stdin,
}

impl Cli {
    /// `--raw` wins over FILE; stdin is the fallback.
    fn source(&self) -> Source<'_> {
        match (&self.raw, &self.file) {
            (Some(raw), _) => Source::Raw(raw),
            (None, Some(path)) => Source::File(path),
            (None, None) => Source::Stdin,
        }
    }

    fn parser(&self) -> Parser {
        Parser::with_config(ParserConfig {
            max_line_len: self.max_line_len,
            allow_bare_lf: !self.strict_crlf,
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // Nothing to read and nothing piped in: print usage rather than block.
    if matches!(cli.source(), Source::Stdin) && io::stdin().is_terminal() {
        Cli::command().print_help().ok();
        println!();
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(report) => {
            match cli.format {
                OutputFormat::Json => println!("{}", format_json(&report, cli.pretty)),
                OutputFormat::Debug => print!("{}", format_debug(&report)),
                OutputFormat::Wire => print!("{}", format_wire(&report)),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<Report, CliError> {
    let data = read_source(cli.source())?;
    tracing::debug!(len = data.len(), status = cli.status, "read input");

    let parser = cli.parser();
    let (line, resume) = if cli.status {
        let (line, resume) = parser.parse_status_line(&data)?;
        (StartLine::Status(line), resume)
    } else {
        let (line, resume) = parser.parse_request_line(&data)?;
        (StartLine::Request(line), resume)
    };
    Ok(Report::new(line, resume, data.len()))
}

fn read_source(source: Source<'_>) -> io::Result<Vec<u8>> {
    match source {
        Source::Raw(raw) => Ok(unescape(raw)),
        Source::File(path) => std::fs::read(path),
        Source::Stdin => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Expand `\r`, `\n`, `\t` and `\\` into raw bytes.
///
/// A backslash before anything else, or at the very end, is kept literally.
fn unescape(raw: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut rest = raw.as_bytes();

    while let Some(pos) = rest.iter().position(|&b| b == b'\\') {
        out.extend_from_slice(&rest[..pos]);
        let expanded = match rest.get(pos + 1) {
            Some(b'r') => Some(b'\r'),
            Some(b'n') => Some(b'\n'),
            Some(b't') => Some(b'\t'),
            Some(b'\\') => Some(b'\\'),
            _ => None,
        };
        match expanded {
            Some(byte) => {
                out.push(byte);
                rest = &rest[pos + 2..];
            }
            None => {
                out.push(b'\\');
                rest = &rest[pos + 1..];
            }
        }
    }

    out.extend_from_slice(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_expands_known_sequences() {
        assert_eq!(unescape(r"GET / HTTP/1.1\r\n"), b"GET / HTTP/1.1\r\n");
        assert_eq!(unescape(r"a\tb\\c"), b"a\tb\\c");
    }

    #[test]
    fn unescape_keeps_unknown_and_trailing_backslash() {
        assert_eq!(unescape(r"\x\"), b"\\x\\");
    }

    #[test]
    fn raw_flag_takes_precedence_over_file() {
        let cli = Cli::parse_from(["startline-cli", "req.txt", "--raw", "GET"]);
        assert!(matches!(cli.source(), Source::Raw("GET")));
    }

    #[test]
    fn run_maps_parse_failures() {
        let cli = Cli::parse_from(["startline-cli", "--raw", r"GET /\r\n"]);
        let err = run(&cli).unwrap_err();
        assert!(matches!(err, CliError::Parse(ParseError::InputTooShort { len: 7, .. })));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn run_parses_status_lines() {
        let cli = Cli::parse_from([
            "startline-cli",
            "--status",
            "--raw",
            r"HTTP/1.1 207 Multi-Status\r\n",
        ]);
        let report = run(&cli).unwrap();
        assert_eq!(report.remainder_len, 0);
        assert_eq!(format_wire(&report), "HTTP/1.1 207 Multi-Status\r\n");
    }
}
