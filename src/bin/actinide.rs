// ABOUTME: The CLI, a REPL over stdin plus a script-file mode, built on
// ABOUTME: `clap` and `rustyline`. No sandbox-capability flags: the core
// ABOUTME: never gains I/O except by a host calling `bind`.

use actinide::value::Value;
use actinide::Session;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::path::PathBuf;

const WELCOME_MESSAGE: &str = "Actinide, a sandboxed Scheme-flavored Lisp";
const WELCOME_SUBTITLE: &str = "Type an expression and press enter. (exit) or Ctrl-D to quit.";

const HISTORY_FILE: &str = ".actinide_history";

/// An embeddable Lisp interpreter with guaranteed tail calls and no built-in
/// I/O capability of its own.
#[derive(Parser, Debug)]
#[command(name = "actinide")]
#[command(version)]
#[command(about = "A sandboxed Scheme-flavored Lisp interpreter")]
struct CliArgs {
    /// Script file to execute. If omitted, starts the REPL.
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let session = Session::new();

    if let Some(script_path) = args.script {
        run_script(&session, &script_path)?;
        return Ok(());
    }

    run_repl(&session)
}

/// Reads every top-level form out of the file in turn, evaluating each as
/// its own top-level program, in file order. A script prints nothing on
/// success; an error aborts the run.
fn run_script(session: &Session, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read script file {}: {}", path.display(), e))?;

    let port = std::rc::Rc::new(std::cell::RefCell::new(actinide::value::PortState::from_str(&contents)));
    let reader = session.reader();

    loop {
        let form = reader.read_form(&port)?;
        if matches!(form, Value::EndOfFile) {
            break;
        }
        session.eval(form)?;
    }

    Ok(())
}

/// Each line of interactive input is its own top-level program: a
/// `define-macro` read on one line is visible to every later line, because
/// macro installation at expansion time happens against the session's
/// persistent macro table.
fn run_repl(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), _> = Editor::with_config(config)
        .map_err(|e| format!("failed to initialize REPL: {e}"))?;
    let _ = rl.load_history(HISTORY_FILE);

    println!("{WELCOME_MESSAGE}");
    println!("{WELCOME_SUBTITLE}");

    loop {
        let readline = rl.readline("actinide> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if matches!(line.trim(), "(exit)" | "(quit)") {
                    println!("Goodbye!");
                    break;
                }
                match session.run(&line) {
                    Ok(values) => {
                        for value in &values {
                            println!("=> {value}");
                        }
                    }
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}
