//! Command-line driver for `loomc`.
//!
//! `loomc` is deliberately flat: a single input file plus a handful of
//! dump flags, no subcommands. `-v`/`--verbose` is repeatable and raises
//! the log level one notch per occurrence, the same way `env_logger`
//! examples in the ecosystem tend to wire up clap's `count` flags.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use loom_ast::{AstContext, AstArena};
use loom_base::Interner;
use loom_lexer::{Lexer, TokenKind};

use crate::Pipeline;

#[derive(Parser)]
#[command(name = "loomc")]
#[command(about = "Front-end driver for the Loom language", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the `.lm` source file to parse
    pub input: PathBuf,

    /// Print the token stream instead of the parsed module
    #[arg(long)]
    pub tokens: bool,

    /// Pretty-print the parsed module's AST
    #[arg(long)]
    pub ast: bool,

    /// Increase log verbosity; repeatable (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Entry point for the CLI. Returns a process exit code rather than a
/// `Result` so `main` can propagate it without an `eprintln!`/`exit` pair
/// at the call site.
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut pipeline = Pipeline::new();
    let file_id = match pipeline.sources.load_file(&cli.input) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.tokens {
        dump_tokens(pipeline.sources.file(file_id).text());
    }

    let arena = AstArena::new();
    let ctx = AstContext::new(&arena);
    let module = pipeline.parse_file(&cli.input, &ctx).expect("file already loaded above");

    if cli.ast {
        println!("{:#?}", module);
    }

    let file = pipeline.sources.file(file_id);
    for diagnostic in pipeline.diagnostics.diagnostics() {
        let (line, column) = file.lookup_line_col(diagnostic.span.start);
        eprintln!("{}:{}", cli.input.display(), diagnostic.render(line, column));
    }

    if pipeline.diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).format_timestamp(None).init();
}

fn dump_tokens(source: &str) {
    let mut interner = Interner::new();
    let mut lexer = Lexer::new(source);
    loop {
        let token = lexer.next(&mut interner);
        let is_eof = token.kind == TokenKind::Eof;
        println!("{:?} {:?}", token.kind, interner.resolve(token.lexeme));
        if is_eof {
            break;
        }
    }
}
