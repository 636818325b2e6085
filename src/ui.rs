// UI layer: an interactive menu using `dialoguer` that drives the
// controller. Every action prints the status line and, after a
// generation, the rendered deck.

use crate::api::FlashcardApi;
use crate::controller::{Controller, Status};
use crate::render::format_deck;
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Editor, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

pub const DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];

/// Main interactive menu. Runs until the user chooses "Exit".
pub fn main_menu<A: FlashcardApi>(controller: &mut Controller<A>, use_color: bool) -> Result<()> {
    loop {
        let form = &controller.state().form;
        let file_label = form
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".into());
        let items = vec![
            format!("Edit text ({} chars)", form.text.chars().count()),
            format!("Choose file [{}]", file_label),
            format!("Number of cards [{}]", form.num_cards),
            format!("Difficulty [{}]", form.difficulty),
            "Extract text from file".to_string(),
            "Generate flashcards".to_string(),
            "Clear".to_string(),
            "Exit".to_string(),
        ];

        let selection = Select::new().items(&items).default(5).interact()?;
        match selection {
            0 => edit_text(controller)?,
            1 => choose_file(controller)?,
            2 => {
                let current = controller.state().form.num_cards.clone();
                let raw: String = Input::new()
                    .with_prompt("Number of cards")
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()?;
                controller.form_mut().num_cards = raw;
            }
            3 => {
                let current = controller.state().form.difficulty.as_str();
                let default = DIFFICULTIES.iter().position(|d| *d == current).unwrap_or(1);
                let idx = Select::new().items(&DIFFICULTIES).default(default).interact()?;
                controller.form_mut().difficulty = DIFFICULTIES[idx].to_string();
            }
            4 => {
                let spinner = spinner();
                let status = controller.extract_with(|s| spinner.set_message(s.message()));
                spinner.finish_and_clear();
                print_status(status, use_color);
                if status == Status::Extracted {
                    println!("{}", preview(&controller.state().form.text, 200));
                }
            }
            5 => {
                let spinner = spinner();
                let status = controller.generate_with(|s| spinner.set_message(s.message()));
                spinner.finish_and_clear();
                print_status(status, use_color);
                if status == Status::Generated {
                    println!("{}\n", format_deck(controller.deck(), use_color));
                }
            }
            6 => {
                controller.clear();
                println!("{}", controller.deck().count_label);
            }
            7 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Open the user's editor on the current text; fall back to a one-line
/// prompt when no editor is available.
fn edit_text<A: FlashcardApi>(controller: &mut Controller<A>) -> Result<()> {
    let current = controller.state().form.text.clone();
    match Editor::new().edit(&current) {
        Ok(Some(text)) => controller.form_mut().text = text,
        Ok(None) => {}
        Err(_) => {
            let text: String = Input::new()
                .with_prompt("Text")
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            controller.form_mut().text = text;
        }
    }
    Ok(())
}

fn choose_file<A: FlashcardApi>(controller: &mut Controller<A>) -> Result<()> {
    let options = ["Type a path", "Browse...", "No file"];
    let file = match Select::new().items(&options).default(0).interact()? {
        0 => {
            let path: String = Input::new()
                .with_prompt("File path")
                .allow_empty(true)
                .interact_text()?;
            let path = path.trim();
            (!path.is_empty()).then(|| PathBuf::from(path))
        }
        1 => rfd::FileDialog::new().set_title("Choose a file").pick_file(),
        _ => None,
    };
    controller.form_mut().file = file;
    Ok(())
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_status(status: Status, use_color: bool) {
    if status.message().is_empty() {
        return;
    }
    if !use_color {
        println!("{}", status);
    } else if status.is_failure() {
        println!("{}", status.message().red());
    } else {
        println!("{}", status.message().green());
    }
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    let mut out: String = text.chars().take(max).collect();
    if text.chars().count() > max {
        out.push_str("...");
    }
    out
}
