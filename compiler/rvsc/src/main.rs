//! rvs command-line interface.

use std::path::Path;

use rvsc::commands::{
    check_files, explain_error, lex_file, report_error, run_files, run_repl, stderr_emitter,
    Options,
};
use rvsc::init_tracing;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let options = options_or_exit(&args[2..]);
            if options.files.is_empty() {
                eprintln!("Usage: rvs run <file.rvs>... [options]");
                print_options();
                std::process::exit(1);
            }
            let mut stdout = std::io::stdout().lock();
            if let Err(err) = run_files(&options, &mut stdout) {
                report_error(&err, None, options.color);
                std::process::exit(1);
            }
        }
        "check" => {
            let options = options_or_exit(&args[2..]);
            if options.files.is_empty() {
                eprintln!("Usage: rvs check <file.rvs>... [--seed=N] [--search-path=DIRS]");
                std::process::exit(1);
            }
            let mut stdout = std::io::stdout().lock();
            if let Err(err) = check_files(&options, &mut stdout) {
                report_error(&err, None, options.color);
                std::process::exit(1);
            }
        }
        "repl" => {
            let options = options_or_exit(&args[2..]);
            let mut emitter = stderr_emitter(options.color);
            let mut stdin = std::io::stdin().lock();
            let mut stdout = std::io::stdout().lock();
            if let Err(err) = run_repl(&options, &mut stdin, &mut stdout, &mut emitter) {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: rvs lex <file.rvs>");
                std::process::exit(1);
            }
            let mut stdout = std::io::stdout().lock();
            if let Err(err) = lex_file(Path::new(&args[2]), &mut stdout) {
                report_error(&err, None, Options::from_env().map(|o| o.color).unwrap_or_default());
                std::process::exit(1);
            }
        }
        "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: rvs explain <error-code>");
                eprintln!("Example: rvs explain E1002");
                std::process::exit(1);
            }
            if !explain_error(&args[2], &mut std::io::stdout().lock()) {
                eprintln!("Unknown error code: {}", args[2]);
                eprintln!();
                eprintln!("Codes have the format EXXXX where X is a digit.");
                eprintln!("Examples: E0001, E1002, E2001");
                std::process::exit(1);
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("rvs {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Environment defaults plus `args`, or exit with the parse problem.
fn options_or_exit(args: &[String]) -> Options {
    match Options::from_env().and_then(|options| options.apply_args(args)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("rvs - random value sequences");
    println!();
    println!("Usage: rvs <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.rvs>...     Transform files and print sequence values");
    println!("  check <file.rvs>...   Parse and transform files without printing values");
    println!("  repl [file.rvs]...    Evaluate statements read from stdin");
    println!("  lex <file.rvs>        Print the token stream of a file");
    println!("  explain <code>        Describe an error code");
    println!("  help                  Show this message");
    println!("  version               Show version information");
    println!();
    print_options();
}

fn print_options() {
    println!("Options:");
    println!("  --seed=N              Seed for Shuffle and Sample (default: 0, env RVS_SEED)");
    println!("  --search-path=DIRS    Import directories, separated like PATH (env RVS_PATH)");
    println!("  --count=N             Values to print per identifier (default: 16)");
    println!("  --id=NAME             Print only NAME (repeatable)");
    println!("  --hex, -x             Print values in hexadecimal");
    println!("  --color=WHEN          auto, always or never (NO_COLOR disables)");
    println!();
    println!("Environment:");
    println!("  RUST_LOG              Enable tracing, e.g. RUST_LOG=rvs_transform=trace");
    println!("  RVS_LOG_TREE=1        Render tracing output as a tree");
}
