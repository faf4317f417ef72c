// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use clap::{Parser as ClapParser, Subcommand};
use console::style;
use windlass_vm::ecmascript::execution::Options;
use windlass_vm::{DefaultHostHooks, Engine};

/// An ECMAScript interpreter
#[derive(Debug, ClapParser)]
#[command(name = "windlass")]
#[command(about = "An ECMAScript interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluates one or more files
    Eval {
        /// Evaluates all scripts in strict mode.
        #[arg(short, long)]
        strict: bool,

        /// Bounds evaluation to the given number of steps.
        #[arg(long)]
        step_budget: Option<u64>,

        /// The files to evaluate.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Parses a file and reports whether it is valid
    Parse {
        /// The path of the file to parse
        path: String,
    },
}

fn main() -> std::process::ExitCode {
    let args = Cli::parse();
    match args.command {
        Command::Eval {
            strict,
            step_budget,
            paths,
        } => {
            let options = Options {
                step_budget,
                ..Default::default()
            };
            let mut engine = Engine::with_default_plugins(options, &DefaultHostHooks);
            let realm = match engine.create_realm() {
                Ok(realm) => realm,
                Err(err) => {
                    eprintln!("{}", style(engine.debug_string(err.value())).red());
                    return std::process::ExitCode::FAILURE;
                }
            };
            for path in paths {
                let source = match std::fs::read_to_string(&path) {
                    Ok(source) => source,
                    Err(error) => {
                        eprintln!("{}", style(format!("{path}: {error}")).red());
                        return std::process::ExitCode::FAILURE;
                    }
                };
                match engine.run_script(&source, realm, strict) {
                    Ok(value) => {
                        println!("{}", engine.debug_string(value));
                    }
                    Err(err) => {
                        report_uncaught(&engine, err);
                        return std::process::ExitCode::FAILURE;
                    }
                }
                // The job queue drains to empty between scripts.
                if let Err(err) = engine.run_jobs() {
                    report_uncaught(&engine, err);
                    return std::process::ExitCode::FAILURE;
                }
            }
            std::process::ExitCode::SUCCESS
        }
        Command::Parse { path } => {
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(error) => {
                    eprintln!("{}", style(format!("{path}: {error}")).red());
                    return std::process::ExitCode::FAILURE;
                }
            };
            let mut engine =
                Engine::with_default_plugins(Options::default(), &DefaultHostHooks);
            let realm = engine.create_realm().expect("realm creation");
            match windlass_vm::ecmascript::scripts_and_modules::script::parse_script(
                &mut engine.agent,
                &source,
                realm,
                false,
                None,
            ) {
                Ok(_) => {
                    println!("{}", style("ok").green());
                    std::process::ExitCode::SUCCESS
                }
                Err(errors) => {
                    for error in errors {
                        eprintln!("{}", style(error.to_string()).red());
                    }
                    std::process::ExitCode::FAILURE
                }
            }
        }
    }
}

fn report_uncaught(engine: &Engine, err: windlass_vm::JsError) {
    // An uncaught throw surfaces with its name, message, and stack.
    let value = err.value();
    let rendered = engine.debug_string(value);
    eprintln!("{} {}", style("Uncaught").red().bold(), style(rendered).red());
    if let Some(stack) = engine.error_stack(value) {
        eprintln!("{}", style(stack).dim());
    }
}
