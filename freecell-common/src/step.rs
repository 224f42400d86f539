use crate::board::{Board, Card};

/// A single pile on the board. Foundations are addressed by suit index,
/// which is also their position in `Board::foundations`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Location {
    Tableau(usize),
    Freecell(usize),
    Foundation(usize),
}

/// One atomic single-card relocation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveStep {
    pub from: Location,
    pub to: Location,
}

impl MoveStep {
    pub fn new(from: Location, to: Location) -> Self {
        Self { from, to }
    }
}

/// The card currently on top of `location`, if any.
pub fn peek_card(board: &Board, location: Location) -> Option<Card> {
    match location {
        Location::Tableau(idx) => board.columns[idx].peek_top().copied(),
        Location::Freecell(idx) => board.freecells[idx],
        Location::Foundation(suit) => board.foundations[suit],
    }
}

/// Replays a step against `board`. Steps produced by the planner are already
/// legality-checked, so this does not consult the rules again.
pub fn apply_step(board: &mut Board, step: &MoveStep) {
    let card = match step.from {
        Location::Tableau(idx) => board.columns[idx].pop_unchecked(),
        Location::Freecell(idx) => board.take_freecell_unchecked(idx),
        Location::Foundation(suit) => board.take_foundation_unchecked(suit),
    };
    match step.to {
        Location::Tableau(idx) => board.columns[idx].push(card),
        Location::Freecell(idx) => board.freecells[idx] = Some(card),
        Location::Foundation(suit) => board.foundations[suit] = Some(card),
    }
}

pub fn describe_step(board: &Board, step: &MoveStep) -> String {
    let format_card =
        |card: Option<Card>| -> String { card.map(|c| c.to_pretty_string()).unwrap_or_default() };

    let from_card = format_card(peek_card(board, step.from));
    let to_card = format_card(peek_card(board, step.to));
    format!(
        "({}) {from_card} -> ({}) {to_card}",
        location_label(step.from),
        location_label(step.to)
    )
}

pub fn format_steps(steps: &[MoveStep]) -> String {
    let list: Vec<String> = steps
        .iter()
        .map(|step| format!("{}:{}", location_code(step.from), location_code(step.to)))
        .collect();

    let mut output = String::new();
    let max_width = list.iter().map(|s| s.len()).max().unwrap_or_default() + 1;
    for chunk in list.chunks(10) {
        for cmd in chunk {
            output.push_str(&format!("{cmd:<width$}", width = max_width));
        }
        output.push('\n');
    }

    output
}

fn location_label(location: Location) -> String {
    match location {
        Location::Tableau(idx) => format!("Tableau{}", idx + 1),
        Location::Freecell(idx) => format!("Freecell{}", idx + 1),
        Location::Foundation(suit) => format!("Foundation{}", suit + 1),
    }
}

fn location_code(location: Location) -> String {
    match location {
        Location::Tableau(idx) => format!("T{}", idx + 1),
        Location::Freecell(idx) => format!("C{}", idx + 1),
        Location::Foundation(suit) => format!("F{}", suit + 1),
    }
}
