//! Interactive trip form
//!
//! Prompts for each field with rustyline, submits, and on a recoverable
//! failure shows the error and re-presents the form with the previous
//! answers prefilled.

use std::path::Path;

use colored::*;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use crate::error::GuideError;
use crate::llm::TextGenerator;
use crate::planner::Planner;
use crate::trip::{Itinerary, MAX_DAYS, MAX_NIGHTS};

/// The raw text of each form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub destination: String,
    pub days: String,
    pub nights: String,
    pub interests: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            destination: String::new(),
            days: "3".to_string(),
            nights: "2".to_string(),
            interests: String::new(),
        }
    }
}

/// What happened to one form submission
#[derive(Debug)]
pub enum Submission {
    Generated(Itinerary),
    /// Shown inline; the form stays as typed
    Rejected(GuideError),
}

/// Submit one filled-in form
///
/// Fatal errors (configuration, connection) are returned as `Err`; everything
/// else is folded into a `Submission` so the caller can redisplay the form.
pub async fn submit<G: TextGenerator>(planner: &Planner<G>, values: &FormValues) -> Result<Submission, GuideError> {
    debug!(?values, "submit: called");
    match planner
        .plan_from_form(&values.destination, &values.days, &values.nights, &values.interests)
        .await
    {
        Ok(itinerary) => Ok(Submission::Generated(itinerary)),
        Err(e) if e.kind().is_fatal() => Err(e),
        Err(e) => Ok(Submission::Rejected(e)),
    }
}

/// Text shown under the result area
pub fn render_itinerary(itinerary: &Itinerary) -> String {
    format!(
        "{}\n\n{}\n\n{} {}",
        "📋 Your Custom Itinerary".bold(),
        itinerary.text.trim_end(),
        "📥 Download:".dimmed(),
        itinerary.download_filename()
    )
}

/// Print an itinerary to stdout
pub fn print_itinerary(itinerary: &Itinerary) {
    println!("{}", render_itinerary(itinerary));
}

/// Read one field; `None` means the user quit
fn read_field(editor: &mut DefaultEditor, prompt: &str, current: &str) -> Result<Option<String>> {
    match editor.readline_with_initial(prompt, (current, "")) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
        Err(e) => Err(e).context("Failed to read input"),
    }
}

/// Fill in every field, returning `None` when the user quits
fn read_form(editor: &mut DefaultEditor, values: &FormValues) -> Result<Option<FormValues>> {
    let days_prompt = format!("📅 Days (1-{}): ", MAX_DAYS);
    let nights_prompt = format!("🌙 Nights (0-{}): ", MAX_NIGHTS);

    let Some(destination) = read_field(editor, "🎯 Destination: ", &values.destination)? else {
        return Ok(None);
    };
    let Some(days) = read_field(editor, &days_prompt, &values.days)? else {
        return Ok(None);
    };
    let Some(nights) = read_field(editor, &nights_prompt, &values.nights)? else {
        return Ok(None);
    };
    let Some(interests) = read_field(editor, "🎨 Interests (optional): ", &values.interests)? else {
        return Ok(None);
    };

    Ok(Some(FormValues {
        destination,
        days,
        nights,
        interests,
    }))
}

fn confirm(editor: &mut DefaultEditor, prompt: &str) -> Result<bool> {
    Ok(read_field(editor, prompt, "")?
        .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false))
}

/// Run the form until the user quits (Ctrl-D / Ctrl-C)
pub async fn run<G: TextGenerator>(planner: &Planner<G>, output_dir: &Path) -> Result<()> {
    debug!(?output_dir, "form::run: called");
    let mut editor = DefaultEditor::new().context("Failed to start line editor")?;
    let mut values = FormValues::default();

    println!("{}", "🌍 TravelGuideAI".bold());
    println!("Custom Itineraries for Your Next Journey");
    println!("{}", "Ctrl-D to quit".dimmed());

    loop {
        println!();
        println!("{}", "📝 Trip Details".bold());
        let Some(next) = read_form(&mut editor, &values)? else {
            info!("Form closed by user");
            return Ok(());
        };
        values = next;

        println!("{}", "🤖 AI is crafting your perfect itinerary...".dimmed());
        match submit(planner, &values).await? {
            Submission::Generated(itinerary) => {
                println!();
                print_itinerary(&itinerary);
                let question = format!("Save as {}? [y/N] ", itinerary.download_filename());
                if confirm(&mut editor, &question)? {
                    let path = itinerary.save(output_dir)?;
                    println!("{} Saved {}", "✓".green(), path.display());
                }
            }
            Submission::Rejected(e) => {
                println!("{} {}", "⚠️".yellow(), e.to_string().red());
            }
        }
    }
}
