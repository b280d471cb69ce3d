use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::interpreter::DEFAULT_MAX_DEPTH;
use rox::parser::Parser;
use rox::scanner;
use rox::{Run, Session};

/// Exit code for command-line usage errors.
const EXIT_USAGE: i32 = 64;
/// Exit code for lexical, syntax and resolver errors.
const EXIT_COMPILE: i32 = 65;
/// Exit code for runtime errors.
const EXIT_RUNTIME: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,

    /// Maximum nesting of function and class calls before "Stack overflow."
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a Lox program and prints its AST
    Parse { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run {
        filename: PathBuf,

        /// Print a JSON report instead of the program output
        #[arg(long)]
        json: bool,
    },

    /// Reads Lox from stdin line by line, keeping globals between lines
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // [module:line] - message
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Print a run's output and diagnostics; returns the exit code.
fn report(run: &Run, json: bool) -> Result<i32> {
    if json {
        let rendered = serde_json::to_string_pretty(&run.report())
            .context("Failed to serialize run report")?;
        println!("{}", rendered);
    } else {
        for line in &run.output {
            println!("{}", line);
        }

        for err in &run.parse_errors {
            eprintln!("{}", err);
        }

        if let Some(err) = &run.runtime_error {
            eprintln!("{}", err);
        }
    }

    if run.had_compile_error() {
        debug!("Compile errors, exiting with code {}", EXIT_COMPILE);
        Ok(EXIT_COMPILE)
    } else if run.had_runtime_error() {
        debug!("Runtime error, exiting with code {}", EXIT_RUNTIME);
        Ok(EXIT_RUNTIME)
    } else {
        Ok(0)
    }
}

fn tokenize(filename: PathBuf, json: bool) -> Result<i32> {
    info!("Running Tokenize subcommand");

    let source = read_file(filename)?;
    let tokens = scanner::scan(&source);
    let errors = scanner::lexical_errors(&tokens);

    if json {
        let rendered =
            serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?;
        println!("{}", rendered);
    } else {
        for token in tokens.iter().filter(|t| !t.is_error()) {
            debug!("Scanned token: {}", token);
            println!("{}", token);
        }
    }

    for err in &errors {
        eprintln!("{}", err);
    }

    if errors.is_empty() {
        info!("Tokenization completed successfully");
        Ok(0)
    } else {
        debug!("Tokenization failed, exiting with code {}", EXIT_COMPILE);
        Ok(EXIT_COMPILE)
    }
}

fn parse(filename: PathBuf) -> Result<i32> {
    info!("Running Parse subcommand");

    let source = read_file(filename)?;
    let tokens = scanner::scan(&source);

    let mut errors = scanner::lexical_errors(&tokens);
    if errors.is_empty() {
        let outcome = Parser::new(&tokens).parse();
        println!("{}", AstPrinter.print_program(&outcome.statements));
        errors = outcome.errors;
    }

    for err in &errors {
        eprintln!("{}", err);
    }

    if errors.is_empty() {
        info!("Parse subcommand completed");
        Ok(0)
    } else {
        Ok(EXIT_COMPILE)
    }
}

fn run_file(filename: PathBuf, json: bool, max_depth: usize) -> Result<i32> {
    info!("Running Run subcommand");

    let source = read_file(filename)?;
    info!("Provided input:\n {}", source);

    let run = Session::with_max_depth(max_depth).run(&source);
    report(&run, json)
}

fn repl(max_depth: usize) -> Result<i32> {
    info!("Starting REPL");

    let mut session = Session::with_max_depth(max_depth);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if read == 0 {
            println!();
            break;
        }

        // Errors are reported but never end the session.
        let run = session.run(&line);
        report(&run, false)?;
    }

    info!("REPL finished");
    Ok(0)
}

fn execute(args: Cli) -> Result<i32> {
    let max_depth = args.max_depth;

    match args.commands {
        Commands::Tokenize { filename, json } => tokenize(filename, json),
        Commands::Parse { filename } => parse(filename),
        Commands::Run { filename, json } => run_file(filename, json, max_depth),
        Commands::Repl => repl(max_depth),
    }
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(EXIT_USAGE);
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let code = execute(args)?;

    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
