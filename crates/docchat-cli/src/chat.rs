//! Interactive chat loop
//!
//! Lines starting with `:` are commands; anything else is a question.

use std::future::Future;
use std::path::PathBuf;

use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use docchat_core::{IntentResult, Operation, SelectedDocument, WorkflowCoordinator};

use crate::render;

const HELP: &str = "\
:open <path>   select a document
:upload        upload the selected document
:summary       summarize the uploaded document
:status        show the current state
:help          show this help
:quit          leave
anything else  ask it as a question";

/// A parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Open(PathBuf),
    Upload,
    Summary,
    Status,
    Help,
    Quit,
    Question(String),
    Empty,
    Unknown(String),
}

fn parse(line: &str) -> Input {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        if line.is_empty() {
            return Input::Empty;
        }
        return Input::Question(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "open" | "o" if !arg.is_empty() => Input::Open(PathBuf::from(arg)),
        "upload" | "u" => Input::Upload,
        "summary" | "s" => Input::Summary,
        "status" => Input::Status,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

/// Run an intent while re-rendering progress from published state
async fn drive(
    coordinator: &WorkflowCoordinator,
    operation: Operation,
    intent: impl Future<Output = IntentResult>,
) {
    let mut updates = coordinator.subscribe();
    tokio::pin!(intent);

    let resolution = loop {
        tokio::select! {
            resolution = &mut intent => break resolution,
            Ok(()) = updates.changed() => {
                let state = updates.borrow_and_update().clone();
                if state.busy || state.uploading {
                    render::progress(&state);
                }
            }
        }
    };

    let state = coordinator.snapshot();
    match resolution {
        Ok(resolution) => render::outcome(operation, &state, &resolution),
        Err(_) => render::notice(&state),
    }
}

pub async fn run(coordinator: &WorkflowCoordinator, file: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{}", style("docchat").bold().cyan());
    println!("{}", style("Type :help for commands.").dim());

    if let Some(path) = file {
        open(coordinator, &path);
    }

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = editor.add_history_entry(line.as_str());

        match parse(&line) {
            Input::Open(path) => open(coordinator, &path),
            Input::Upload => {
                drive(coordinator, Operation::Upload, coordinator.submit_document()).await
            }
            Input::Summary => {
                drive(coordinator, Operation::Summary, coordinator.request_summary()).await
            }
            Input::Question(question) => {
                coordinator.set_question(question);
                drive(coordinator, Operation::Ask, coordinator.submit_question()).await;
            }
            Input::Status => render::status(&coordinator.snapshot()),
            Input::Help => println!("{}", HELP),
            Input::Quit => break,
            Input::Empty => {}
            Input::Unknown(name) => println!(
                "{} unknown command :{} (try :help)",
                style("!").yellow().bold(),
                name
            ),
        }
    }

    Ok(())
}

fn open(coordinator: &WorkflowCoordinator, path: &std::path::Path) {
    match SelectedDocument::from_path(path) {
        Ok(document) => {
            println!(
                "{} {} ({})",
                style("Selected").green(),
                document.name,
                document.media_type
            );
            coordinator.select_document(document);
        }
        Err(e) => println!("{} {}: {}", style("!").yellow().bold(), path.display(), e),
    }
}
