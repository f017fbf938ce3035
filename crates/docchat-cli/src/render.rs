//! Terminal rendering of the coordinator's state surface

use std::path::Path;

use console::style;

use docchat_core::{Config, IntentResult, Operation, Outcome, Resolution, SessionState};

/// Print the result slot an operation wrote, or fail on a local refusal
pub fn report(
    operation: Operation,
    state: &SessionState,
    resolution: IntentResult,
) -> anyhow::Result<()> {
    let resolution = resolution?;
    outcome(operation, state, &resolution);
    Ok(())
}

/// Print one resolved request
pub fn outcome(operation: Operation, state: &SessionState, resolution: &Resolution) {
    let Resolution::Applied(outcome) = resolution else {
        println!("  {}", style(format!("(stale {} result discarded)", operation)).dim());
        return;
    };

    let label = match operation {
        Operation::Upload => "Upload",
        Operation::Ask => "Answer",
        Operation::Summary => "Summary",
    };
    let text = match operation {
        Operation::Upload => &state.upload_status,
        Operation::Ask => &state.last_answer,
        Operation::Summary => &state.last_summary,
    };

    match outcome {
        Outcome::Success(_) => println!("{}: {}", style(label).bold().green(), text),
        Outcome::Rejected { status, .. } => println!(
            "{}: {} {}",
            style(label).bold().red(),
            text,
            style(format!("[{}]", status)).dim()
        ),
        Outcome::TransportFailed(_) => println!("{}: {}", style(label).bold().red(), text),
    }
}

/// Progress line shown while a request is outstanding
pub fn progress(state: &SessionState) {
    if state.uploading {
        println!("  {}", style("uploading...").dim());
    }
    if state.busy {
        println!("  {}", style("thinking...").dim());
    }
}

/// Print a local refusal
pub fn notice(state: &SessionState) {
    if !state.notice.is_empty() {
        println!("{} {}", style("!").yellow().bold(), state.notice);
    }
}

/// Full state panel
pub fn status(state: &SessionState) {
    let document = match &state.selected_document {
        Some(doc) => format!("{} ({}, {} bytes)", doc.name, doc.media_type, doc.len()),
        None => style("none selected").dim().to_string(),
    };
    println!("{} {}", style("Document:").bold(), document);
    println!("{} {}", style("Upload:  ").bold(), state.upload_status);
    println!("{} {}", style("Question:").bold(), state.current_question);
    println!("{} {}", style("Answer:  ").bold(), state.last_answer);
    println!("{} {}", style("Summary: ").bold(), state.last_summary);
    if state.busy || state.uploading {
        progress(state);
    }
}

/// Print the resolved configuration as TOML
pub fn config(path: &Path, config: &Config) -> anyhow::Result<()> {
    println!("{} {}", style("Config file:").bold(), path.display());
    println!("{}", docchat_core::config::to_toml(config)?);
    Ok(())
}
