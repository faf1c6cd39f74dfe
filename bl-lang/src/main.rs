use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bl_lang::ir::pretty::{DEFAULT_INDENT, Printer};
use bl_lang::parser::{self, lexer};

#[derive(Parser)]
#[command(name = "bl")]
#[command(about = "Parser and pretty-printer for BL (Block Language) programs", version)]
struct Cli {
    /// Log parser progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a BL program and pretty-print it
    Parse {
        /// Source file
        input: PathBuf,

        /// Spaces per nesting level
        #[arg(long, default_value_t = DEFAULT_INDENT)]
        indent: usize,

        /// Also dump the syntax tree
        #[arg(long)]
        show_ast: bool,
    },

    /// Parse a file of bare BL statements and pretty-print them
    Block {
        /// Source file
        input: PathBuf,

        /// Spaces per nesting level
        #[arg(long, default_value_t = DEFAULT_INDENT)]
        indent: usize,
    },

    /// Show the tokens handed to the parser
    Tokens {
        /// Source file
        input: PathBuf,
    },

    /// Check that a program survives a pretty-print round trip
    Check {
        /// Source file
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Parse { input, indent, show_ast } => {
            info!("Parsing {}", input.display());
            let program = parser::parse_file(&input)?;

            if show_ast {
                println!("=== AST ===");
                println!("{:#?}", program);
                println!("=== PRETTY ===");
            }
            print!("{}", Printer::new(indent).program(&program));
        }
        Commands::Block { input, indent } => {
            info!("Parsing statements in {}", input.display());
            let source = fs::read_to_string(&input)?;
            let block = parser::parse_statements(&source)?;
            print!("{}", Printer::new(indent).statement(&block, 0));
        }
        Commands::Tokens { input } => {
            let source = fs::read_to_string(&input)?;
            for token in lexer::tokenize(&source).iter() {
                println!("{:<8} {}", token.span.to_string(), token.text);
            }
        }
        Commands::Check { input } => {
            let program = parser::parse_file(&input)?;
            let printed = program.to_string();
            debug!(bytes = printed.len(), "pretty-printed program");

            let reparsed = parser::parse(&printed)?;
            if reparsed != program {
                return Err(format!(
                    "{}: round trip changed the program\n--- printed ---\n{}",
                    input.display(),
                    printed
                )
                .into());
            }
            println!(
                "{}: ok (program {}, {} instruction(s))",
                input.display(),
                program.name(),
                program.context().len()
            );
        }
    }

    Ok(())
}
