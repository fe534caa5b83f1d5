use clap::{App, Arg, ArgMatches};
use std::{
    fs,
    io::{self, Write},
};
use tracing::Level;

use oasis::{dump_tokens, parse_source, CompilationError, Source, DESCRIPTION, NAME, VERSION};

fn main() -> Result<(), CompilationError> {
    let args = parse_args();
    init_logging(args.occurrences_of("verbose"));

    let file_name = args.value_of("source-file").unwrap_or_default();
    let code = fs::read_to_string(file_name)?;
    let source = Source {
        name: file_name.to_owned(),
        code,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.is_present("tokens") {
        dump_tokens(&source, &mut out)?;
        return Ok(());
    }

    let stderr = io::stderr();
    let mut err_writer = stderr.lock();
    let color = !args.is_present("no-color");

    let prg = parse_source(&source, &mut err_writer, color)?;
    writeln!(out, "{}", prg)?;

    Ok(())
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => return,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

pub fn parse_args<'a>() -> ArgMatches<'a> {
    App::new(NAME)
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::with_name("tokens")
                .short("t")
                .long("tokens")
                .help("print the token stream instead of the syntax tree"),
        )
        .arg(
            Arg::with_name("no-color")
                .long("no-color")
                .help("print diagnostics without ansi colours"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("log to stderr, repeat for more detail"),
        )
        .arg(Arg::with_name("source-file").required(true))
        .get_matches()
}
