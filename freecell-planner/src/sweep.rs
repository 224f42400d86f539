//! Automatic foundation sweeps.

use crate::planner::Plan;

use freecell_common::board::{Board, Card, TOTAL_COLUMNS, TOTAL_FOUNDATIONS, TOTAL_FREECELLS};
use freecell_common::rules;
use freecell_common::step::{Location, MoveStep, apply_step};

/// Whether `card` may leave play without harming the tableau. Aces and Twos
/// always qualify; a higher card qualifies only once both foundations of the
/// opposite color have reached the rank below it, since no buried card could
/// still need it as a landing spot.
pub fn is_safe_to_send(board: &Board, card: Card) -> bool {
    let rank = card.rank();
    if rank <= 1 {
        return true;
    }
    (0..TOTAL_FOUNDATIONS)
        .filter(|&suit| (suit & 1) != (card.suit() & 1) as usize)
        .all(|suit| matches!(board.foundations[suit], Some(top) if top.rank() + 1 >= rank))
}

/// Collects every safe foundation send available from the given snapshot,
/// cascading as new tops are exposed. Column tops are scanned before
/// freecells, lowest index first, and the scan restarts after each send, so
/// the result is deterministic.
pub fn plan_foundation_sweep(board: &Board) -> Plan {
    let mut board = board.clone();
    let mut steps = Vec::new();
    while let Some(step) = next_sweep_step(&board) {
        apply_step(&mut board, &step);
        steps.push(step);
    }
    Plan { steps }
}

fn next_sweep_step(board: &Board) -> Option<MoveStep> {
    for idx in 0..TOTAL_COLUMNS {
        if let Some(&card) = board.columns[idx].peek_top() {
            if can_send(board, card) {
                return Some(MoveStep::new(
                    Location::Tableau(idx),
                    Location::Foundation(card.suit() as usize),
                ));
            }
        }
    }
    for idx in 0..TOTAL_FREECELLS {
        if let Some(card) = board.freecells[idx] {
            if can_send(board, card) {
                return Some(MoveStep::new(
                    Location::Freecell(idx),
                    Location::Foundation(card.suit() as usize),
                ));
            }
        }
    }
    None
}

fn can_send(board: &Board, card: Card) -> bool {
    rules::can_place_on_foundation(card, board.foundations[card.suit() as usize])
        && is_safe_to_send(board, card)
}
