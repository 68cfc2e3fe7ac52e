//! Hanami front-end CLI
//!
//! Usage: hanamic <input.hnm> [-o output.json]

use clap::Parser;
use colored::Colorize;
use hanami::Driver;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "hanamic")]
#[command(version = "0.1.0")]
#[command(about = "Hanami front end - parses and type-checks Hanami source", long_about = None)]
struct Args {
    /// Input Hanami file (.hnm), or a serialized AST with --from-ast
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file for the validated AST JSON (defaults to <input>.json)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Validate only; do not write the AST
    #[arg(long, default_value_t = false)]
    check: bool,

    /// Treat the input as an AST in JSON interchange form and run only
    /// the semantic analyzer
    #[arg(long, default_value_t = false)]
    from_ast: bool,

    /// Print tokens for debugging
    #[arg(long, default_value_t = false)]
    dump_tokens: bool,

    /// Print the AST for debugging
    #[arg(long, default_value_t = false)]
    dump_ast: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if !args.from_ast && args.input.extension().map_or(true, |ext| ext != "hnm") {
        eprintln!(
            "{}: input file must have .hnm extension: {}",
            "error".red().bold(),
            args.input.display()
        );
        return ExitCode::FAILURE;
    }

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!(
                "{}: could not read file '{}': {}",
                "error".red().bold(),
                args.input.display(),
                err
            );
            return ExitCode::FAILURE;
        }
    };

    let mut driver = Driver::new(args.input.to_string_lossy().to_string(), source);
    driver.set_dump_tokens(args.dump_tokens);
    driver.set_dump_ast(args.dump_ast);

    let result = if args.from_ast {
        driver.run_from_ast()
    } else {
        driver.run()
    };

    match result {
        Ok(program) => {
            if args.check {
                println!("{}: {}", "ok".green().bold(), args.input.display());
                return ExitCode::SUCCESS;
            }

            let output = args
                .output
                .unwrap_or_else(|| args.input.with_extension("json"));

            let json = match serde_json::to_string_pretty(&program) {
                Ok(json) => json,
                Err(err) => {
                    eprintln!(
                        "{}: could not serialize AST: {}",
                        "error".red().bold(),
                        err
                    );
                    return ExitCode::FAILURE;
                }
            };

            if let Err(err) = std::fs::write(&output, json) {
                eprintln!(
                    "{}: could not write file '{}': {}",
                    "error".red().bold(),
                    output.display(),
                    err
                );
                return ExitCode::FAILURE;
            }

            println!(
                "{}: {} -> {}",
                "checked".green().bold(),
                args.input.display(),
                output.display()
            );
            ExitCode::SUCCESS
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic);
            }

            let error_count = diagnostics.iter().filter(|d| d.is_error()).count();
            eprintln!(
                "\n{}",
                format!(
                    "{} error{} generated",
                    error_count,
                    if error_count == 1 { "" } else { "s" }
                )
                .red()
                .bold()
            );

            ExitCode::FAILURE
        }
    }
}
