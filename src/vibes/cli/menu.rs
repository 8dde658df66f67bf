//! The interactive menu loop.
//!
//! Each choice runs one handler. A handler's error is reported and logged and the
//! loop goes on; only a broken terminal (an I/O error) ends the session early.

use super::prompt::Prompter;
use super::render;
use std::io::{BufRead, Write};
use tracing::{debug, warn};
use vibes::api::VibesApi;
use vibes::commands::create::validate_title;
use vibes::commands::remove::RemoveState;
use vibes::commands::CmdMessage;
use vibes::error::{Result, VibesError};
use vibes::model::FALLBACK_CATEGORY;
use vibes::store::VibeStore;

const CHOICES: [&str; 4] = ["1", "2", "3", "4"];
const DEFAULT_CHOICE: &str = "3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_session<S, R, W>(api: &mut VibesApi<S>, prompter: &mut Prompter<R, W>) -> Result<()>
where
    S: VibeStore,
    R: BufRead,
    W: Write,
{
    loop {
        prompter.say(&render::menu())?;
        let choice = match prompter.choose("What would you like to do?", &CHOICES, DEFAULT_CHOICE)? {
            Some(choice) => choice,
            None => return Ok(()),
        };
        debug!(choice = %choice, "menu choice");

        let outcome = match choice.as_str() {
            "1" => add(api, prompter),
            "2" => remove(api, prompter),
            "3" => list(api, prompter),
            _ => exit(prompter),
        };

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => return Ok(()),
            Err(VibesError::Io(e)) => return Err(VibesError::Io(e)),
            Err(e) => {
                warn!(choice = %choice, error = %e, "operation failed");
                prompter.say(&render::failure(&e))?;
            }
        }
    }
}

fn add<S: VibeStore, R: BufRead, W: Write>(
    api: &mut VibesApi<S>,
    prompter: &mut Prompter<R, W>,
) -> Result<Flow> {
    prompter.say(&render::heading("Adding a new vibe:"))?;

    let title = match prompter.ask("Enter vibe title", None)? {
        Some(title) => title,
        None => return Ok(Flow::Quit),
    };
    validate_title(&title)?;

    let description = match prompter.ask("Enter vibe description", Some(""))? {
        Some(description) => description,
        None => return Ok(Flow::Quit),
    };
    let category = match prompter.ask("Enter category", Some(FALLBACK_CATEGORY))? {
        Some(category) => category,
        None => return Ok(Flow::Quit),
    };

    let result = api.add_vibe(title, description, Some(category))?;
    prompter.say(&render::messages(&result.messages))?;
    Ok(Flow::Continue)
}

fn remove<S: VibeStore, R: BufRead, W: Write>(
    api: &mut VibesApi<S>,
    prompter: &mut Prompter<R, W>,
) -> Result<Flow> {
    prompter.say(&render::heading("Remove a vibe:"))?;

    let mut flow = api.begin_removal()?;
    if !flow.is_finished() {
        prompter.say(&render::candidates(flow.snapshot()))?;
    }

    while *flow.state() == RemoveState::Selecting {
        let input = match prompter.ask("Enter the number of the vibe to remove", Some("cancel"))? {
            Some(input) => input,
            None => return Ok(Flow::Quit),
        };
        match flow.select(&input) {
            Ok(()) => {}
            Err(VibesError::Validation(msg)) => {
                prompter.say(&render::messages(&[CmdMessage::warning(msg)]))?;
            }
            Err(e) => return Err(e),
        }
    }

    if let RemoveState::Previewing(_) = flow.state() {
        let vibe = flow.preview()?;
        prompter.say(&render::preview(vibe))?;
        let question = format!(
            "Are you sure you want to permanently delete '{}'?",
            vibe.title
        );
        let confirmed = match prompter.confirm(&question, Some(false))? {
            Some(confirmed) => confirmed,
            None => return Ok(Flow::Quit),
        };
        api.confirm_removal(&mut flow, confirmed)?;
    }

    prompter.say(&render::messages(&flow.report().messages))?;
    if let RemoveState::Done(outcome) = flow.state() {
        if outcome.is_unavailable() {
            prompter.say(&render::unavailable_hint())?;
        }
    }
    Ok(Flow::Continue)
}

fn list<S: VibeStore, R: BufRead, W: Write>(
    api: &mut VibesApi<S>,
    prompter: &mut Prompter<R, W>,
) -> Result<Flow> {
    prompter.say(&render::heading("Listing all vibes:"))?;

    let result = api.list_vibes()?;
    if result.listed_vibes.is_empty() {
        prompter.say(&render::messages(&result.messages))?;
    } else {
        prompter.say(&render::vibe_table(&result.listed_vibes))?;
    }
    Ok(Flow::Continue)
}

fn exit<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<Flow> {
    match prompter.confirm("Are you sure you want to exit?", None)? {
        Some(false) => Ok(Flow::Continue),
        Some(true) | None => {
            prompter.say(&render::messages(&[CmdMessage::success(
                "Thanks for using Vibes Manager!",
            )]))?;
            Ok(Flow::Quit)
        }
    }
}
