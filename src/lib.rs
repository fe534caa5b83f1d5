use std::{cmp, error, fmt, io, io::Write, time::Instant};

use tracing::debug;

mod cli;
pub mod parse;

pub use self::{
    cli::*,
    parse::{
        ast::{self, Program},
        error::SyntaxError,
        lexer::Lexer,
        parser::Parser,
        token::{Token, TokenKind},
        Scanner, Span, Spanned,
    },
};

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[derive(Debug)]
pub struct Source {
    pub name: String,
    pub code: String,
}

impl cmp::PartialEq for Source {
    fn eq(&self, other: &Source) -> bool {
        self.name == other.name
    }
}

impl cmp::Eq for Source {}

impl Source {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_owned(),
            code: code.to_owned(),
        }
    }

    pub fn slice(&self, span: Span) -> &str {
        &self.code[span.start..span.end]
    }
}

pub enum CompilationError {
    ParseError,
    IO(io::Error),
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CompilationError::*;

        match self {
            ParseError => write!(f, "Error while parsing"),
            IO(err) => write!(f, "{}", err),
        }
    }
}

// `main` prints errors with `Debug`
impl fmt::Debug for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl error::Error for CompilationError {}

impl From<io::Error> for CompilationError {
    fn from(err: io::Error) -> Self {
        CompilationError::IO(err)
    }
}

fn init_ansi() {
    #[cfg(windows)]
    {
        if let Err(code) = ansi_term::enable_ansi_support() {
            eprintln!(
                "Could not initialise windows ansi support. Error code: {}",
                code
            );
        }
    }
}

pub fn parse(source: &Source) -> Result<Program<'_>, Spanned<SyntaxError<'_>>> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    parser.parse_program()
}

/// Parses `source` and writes a formatted diagnostic to `writer` if that fails.
pub fn parse_source<'src, W: Write>(
    source: &'src Source,
    writer: &mut W,
    color: bool,
) -> Result<Program<'src>, CompilationError> {
    if color {
        init_ansi();
    }

    let now = Instant::now();
    match parse(source) {
        Ok(prg) => {
            debug!(
                "parsed {} statements of {} in {} μs",
                prg.0.len(),
                source.name,
                now.elapsed().as_micros()
            );
            Ok(prg)
        }
        Err(err) => {
            debug!("parsing {} failed at byte {}", source.name, err.span.start);
            report_error(source, &err, writer, color)?;
            Err(CompilationError::ParseError)
        }
    }
}

/// Writes one line per token, including the final `Eof`.
pub fn dump_tokens<W: Write>(source: &Source, writer: &mut W) -> io::Result<()> {
    let mut lexer = Lexer::new(source);
    let mut count = 0;

    loop {
        let Spanned { span, node } = lexer.next_token();
        writeln!(writer, "{:?} {:?} @{}", node.kind, node.literal, span.start)?;
        count += 1;

        if node.kind == TokenKind::Eof {
            break;
        }
    }

    debug!("scanned {} tokens of {}", count, source.name);
    Ok(())
}
