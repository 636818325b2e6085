// Pure card rendering: maps a list of flashcards to what should be shown,
// plus a terminal formatter for that model.

use crossterm::style::Stylize;
use serde::Serialize;

use crate::api::Flashcard;

pub const CARD_CAPTION: &str = "Auto-generated using simple NLP demo";

/// One displayed card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCard {
    /// 1-based position in the response.
    pub number: usize,
    /// `Q{n}. {question}`
    pub heading: String,
    /// `Answer: {answer}`
    pub answer: String,
    pub caption: &'static str,
}

/// Everything the card area shows: the cards and the count label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDeck {
    pub cards: Vec<RenderedCard>,
    pub count_label: String,
}

impl Default for RenderedDeck {
    fn default() -> Self {
        render_cards(&[])
    }
}

pub fn count_label(n: usize) -> String {
    format!("{} cards", n)
}

pub fn render_card(card: &Flashcard, index: usize) -> RenderedCard {
    let number = index + 1;
    RenderedCard {
        number,
        heading: format!("Q{}. {}", number, card.question),
        answer: format!("Answer: {}", card.answer),
        caption: CARD_CAPTION,
    }
}

/// Replace-all rendering: one entry per input card, in input order.
pub fn render_cards(cards: &[Flashcard]) -> RenderedDeck {
    RenderedDeck {
        cards: cards
            .iter()
            .enumerate()
            .map(|(i, card)| render_card(card, i))
            .collect(),
        count_label: count_label(cards.len()),
    }
}

/// Format a deck for the terminal.
pub fn format_deck(deck: &RenderedDeck, use_color: bool) -> String {
    let mut lines = Vec::new();
    if use_color {
        lines.push(deck.count_label.as_str().bold().to_string());
    } else {
        lines.push(deck.count_label.clone());
    }

    for card in &deck.cards {
        lines.push(String::new());
        if use_color {
            lines.push(card.heading.as_str().cyan().bold().to_string());
            // Bold only the "Answer:" prefix, like the page did.
            let rest = card.answer.strip_prefix("Answer:").unwrap_or(&card.answer);
            lines.push(format!("{}{}", "Answer:".bold(), rest));
            lines.push(card.caption.dark_grey().to_string());
        } else {
            lines.push(card.heading.clone());
            lines.push(card.answer.clone());
            lines.push(card.caption.to_string());
        }
    }

    lines.join("\n")
}
