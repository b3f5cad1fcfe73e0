//! Evaluation command handler.
//!
//! Prints the best five-card hand found in five to seven cards, the same evaluation the
//! table uses at showdown.

use std::collections::HashSet;
use std::io::Write;

use holdem_engine::cards::parse_cards;
use holdem_engine::hand::evaluate_best;

use crate::error::CliError;
use crate::formatters::format_board;

pub fn handle_eval_command(cards: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let cards = parse_cards(cards)?;
    if !(5..=7).contains(&cards.len()) {
        return Err(CliError::InvalidInput(format!(
            "expected 5 to 7 cards, got {}",
            cards.len()
        )));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
        return Err(CliError::InvalidInput(format!("duplicate card {dup}")));
    }

    let best = evaluate_best(&cards)
        .ok_or_else(|| CliError::InvalidInput("not enough cards to evaluate".into()))?;
    writeln!(out, "{}", best.description)?;
    writeln!(out, "best five: {}", format_board(&best.cards))?;
    writeln!(
        out,
        "category: {:?} ({})",
        best.strength.category,
        best.strength.category.value()
    )?;
    Ok(())
}
