use std::io::{self, BufRead as _, Write as _};
use std::{env, fs, process::ExitCode};

use mky::{Interpreter, PROMPT, ReplOutcome, ReplSession, Value, render_all, render_runtime_error, settings};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    match args.get(1) {
        Some(path) => run_file(path),
        None => repl(),
    }
}

fn run_file(path: &str) -> ExitCode {
    settings::set_fatal_errors(true);

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read {path}: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut interpreter = Interpreter::new();
    match interpreter.run(&source, path) {
        Err(errors) => {
            eprint!("{}", render_all(&errors, &source));
            ExitCode::FAILURE
        }
        Ok(value) => {
            if let Some(rendered) = render_runtime_error(&value) {
                eprintln!("{rendered}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}

fn repl() -> ExitCode {
    let user = env::var("USER").unwrap_or_else(|_| "there".to_owned());
    println!("Hello {user}! Welcome to the Monkey Programming Language!");
    println!("REPL Started!");

    let mut session = ReplSession::new();
    let stdin = io::stdin();
    loop {
        print!("{PROMPT}");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return ExitCode::SUCCESS,
            Ok(_) => {}
        }
        let line = line.trim_end_matches(['\n', '\r']);

        match session.execute(line) {
            ReplOutcome::Empty => {}
            ReplOutcome::Command(message) => println!("{message}"),
            ReplOutcome::ParseErrors(errors) => print!("{}", render_all(&errors, line)),
            ReplOutcome::Value(value) => {
                if let Some(rendered) = render_runtime_error(&value) {
                    println!("{rendered}");
                } else if !matches!(value, Value::Null) {
                    println!("{}", value.inspect());
                }
            }
        }
    }
}
