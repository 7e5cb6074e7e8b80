//! `quickmd chat`: Interactive session.
//!
//! Any line that is not a `:command` replaces the draft case.

use std::io::Write;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use quickmd_config::TemplateStore;
use quickmd_core::session::Session;
use quickmd_core::task::TaskId;
use quickmd_pipeline::{Pipeline, Selection};

/// One parsed line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    SelectTask(String),
    Template(String),
    Run,
    RunAll,
    History,
    ClearHistory,
    Help,
    Quit,
    SetCase(String),
    Unknown(String),
}

fn parse_line(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Command::SetCase(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "task" => Command::SelectTask(arg.to_string()),
        "template" => Command::Template(arg.to_string()),
        "run" => Command::Run,
        "all" => Command::RunAll,
        "history" => Command::History,
        "clear" => Command::ClearHistory,
        "help" | "h" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

fn print_help() {
    println!("  :task <id|label>     select task (treatment, confirmatory_test, differential)");
    println!("  :template <label>    load a case template");
    println!("  :run                 run the selected task");
    println!("  :all                 run all three tasks");
    println!("  :history             show this session's runs, newest first");
    println!("  :clear               clear history");
    println!("  :quit                exit");
    println!("  anything else        becomes the case text");
}

fn print_history(session: &Session) {
    let entries = session.history().list();
    if entries.is_empty() {
        println!("  (no runs yet)\n");
        return;
    }
    for entry in entries {
        println!(
            "  [{}] {:?} · {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.mode,
            entry.case
        );
        super::print_entry(entry);
    }
}

async fn run_selection(pipeline: &Pipeline, session: &mut Session, selection: Selection) {
    eprint!("  ...");
    let result = pipeline.run_in_session(session, selection).await;
    eprint!("\r     \r");
    match result {
        Ok(entry) => super::print_entry(&entry),
        Err(e) => eprintln!("  [Error] {e}\n"),
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let pipeline = super::build_pipeline(&config)?;
    let templates = TemplateStore::load(&config.templates_path);
    let mut session = Session::new();

    println!();
    println!("  ⚡ Quick MD Helper — Interactive Session");
    println!("  For licensed clinicians only. No PHI. Clinical judgment required.");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", config.model);
    println!();
    print_help();
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("  [{}] > ", session.task.task().label);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Command::SelectTask(name) => match name.parse::<TaskId>() {
                Ok(task) => {
                    session.select_task(task);
                    println!("  Task: {}\n", task.task().label);
                }
                Err(e) => eprintln!("  [Error] {e}\n"),
            },
            Command::Template(label) => match templates.get(&label) {
                Some(template) => {
                    session.set_case(template.text.clone());
                    println!("  Case: {}\n", template.text);
                }
                None => eprintln!("  [Error] Unknown template '{label}'\n"),
            },
            Command::Run => {
                let selection = Selection::Single(session.task);
                run_selection(&pipeline, &mut session, selection).await
            }
            Command::RunAll => run_selection(&pipeline, &mut session, Selection::All).await,
            Command::History => print_history(&session),
            Command::ClearHistory => {
                session.clear_history();
                println!("  History cleared.\n");
            }
            Command::Help => print_help(),
            Command::Quit => break,
            Command::SetCase(text) => {
                session.set_case(text);
                println!("  Case set. Type :run or :all.\n");
            }
            Command::Unknown(name) => eprintln!("  Unknown command ':{name}'. Type :help.\n"),
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_sets_case() {
        assert_eq!(
            parse_line("  45yo M chest pain  "),
            Command::SetCase("45yo M chest pain".into())
        );
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(
            parse_line(":task confirmatory_test"),
            Command::SelectTask("confirmatory_test".into())
        );
        assert_eq!(
            parse_line(":template   COPD Exacerbation "),
            Command::Template("COPD Exacerbation".into())
        );
    }

    #[test]
    fn bare_commands() {
        assert_eq!(parse_line(":run"), Command::Run);
        assert_eq!(parse_line(":all"), Command::RunAll);
        assert_eq!(parse_line(":history"), Command::History);
        assert_eq!(parse_line(":clear"), Command::ClearHistory);
        assert_eq!(parse_line(":q"), Command::Quit);
        assert_eq!(parse_line(":quit"), Command::Quit);
    }

    #[test]
    fn unknown_command() {
        assert_eq!(parse_line(":diagnose"), Command::Unknown("diagnose".into()));
    }
}
