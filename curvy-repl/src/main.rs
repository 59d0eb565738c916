mod logger;

use curvy_analysis::{Dashboard, DEFAULT_EXPRESSION};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}, process::ExitCode};

/// Submits the input to the dashboard, printing the analysis to stdout, or the error reports to
/// stderr. Returns true if the analysis succeeded.
fn submit(dashboard: &mut Dashboard, input: &str) -> bool {
    match dashboard.submit(input) {
        Ok(analysis) => {
            println!("{}", analysis);
            true
        },
        Err(err) => {
            if let Err(io_err) = err.report_to_stderr("input", input) {
                eprintln!("{}: {}", err, io_err);
            }
            false
        },
    }
}

/// Analyzes every non-empty line of the input, separating the results with a blank line.
fn submit_lines(dashboard: &mut Dashboard, input: &str) -> ExitCode {
    let mut failed = false;
    let lines = input.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());
    for (i, line) in lines.enumerate() {
        if i > 0 {
            println!();
        }
        failed |= !submit(dashboard, line);
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Reads one line and analyzes it. An empty line analyzes the default expression.
fn process_line(rl: &mut DefaultEditor, dashboard: &mut Dashboard) -> Result<(), ReadlineError> {
    let input = rl.readline("f(x) = ")?;
    let input = input.trim();
    if input.is_empty() {
        println!("f(x) = {}", DEFAULT_EXPRESSION);
        submit(dashboard, DEFAULT_EXPRESSION);
        return Ok(());
    }

    rl.add_history_entry(input)?;
    submit(dashboard, input);
    Ok(())
}

fn main() -> ExitCode {
    logger::init();

    let mut dashboard = Dashboard::new();
    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // analyze every line of the file
        match fs::read_to_string(&filename) {
            Ok(input) => submit_lines(&mut dashboard, &input),
            Err(err) => {
                eprintln!("could not read `{}`: {}", filename, err);
                ExitCode::FAILURE
            },
        }
    } else if !io::stdin().is_terminal() {
        // analyze every line piped to stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            eprintln!("could not read stdin: {}", err);
            return ExitCode::FAILURE;
        }
        submit_lines(&mut dashboard, &input)
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("could not start the editor: {}", err);
                return ExitCode::FAILURE;
            },
        };

        println!("enter an expression in x, or press enter to analyze {}", DEFAULT_EXPRESSION);
        loop {
            if let Err(err) = process_line(&mut rl, &mut dashboard) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
        ExitCode::SUCCESS
    }
}
