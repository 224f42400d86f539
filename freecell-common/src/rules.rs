//! Pure placement predicates shared by the planner and any move validator.

use crate::board::{Card, Column};

/// Whether `card` may be stacked onto `on_top` in the tableau: one rank
/// lower and the opposite color.
pub fn can_stack(card: Card, on_top: Card) -> bool {
    card.rank() + 1 == on_top.rank() && card.is_red() != on_top.is_red()
}

/// Whether `cards` form a movable run. The slice is in column order, index 0
/// nearest the bottom. A single card is trivially a run; an empty slice is
/// not a run.
pub fn is_valid_run(cards: &[Card]) -> bool {
    if cards.is_empty() {
        return false;
    }
    cards.windows(2).all(|pair| can_stack(pair[1], pair[0]))
}

/// Whether `card` may be placed on a foundation whose current top is `top`.
/// An empty foundation accepts only an Ace. The caller is responsible for
/// picking the pile that matches the card's suit when the pile is empty.
pub fn can_place_on_foundation(card: Card, top: Option<Card>) -> bool {
    match top {
        None => card.is_ace(),
        Some(top) => card.suit() == top.suit() && card.rank() == top.rank() + 1,
    }
}

/// Whether `card` may land on `column`. An empty column accepts any card,
/// or only a King when the kings-only rule is in force.
pub fn can_place_on_column(card: Card, column: &Column, kings_only_on_empty: bool) -> bool {
    match column.peek_top() {
        None => !kings_only_on_empty || card.is_king(),
        Some(&top) => can_stack(card, top),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        let mut chars = s.chars();
        Card::parse(chars.next().unwrap(), chars.next().unwrap()).unwrap()
    }

    #[test]
    fn test_can_stack() {
        assert!(can_stack(card("7♦"), card("8♣")));
        assert!(can_stack(card("7♣"), card("8♥")));
        assert!(!can_stack(card("7♦"), card("8♥"))); // same color
        assert!(!can_stack(card("7♦"), card("9♣"))); // rank gap
        assert!(!can_stack(card("8♣"), card("7♦"))); // wrong direction
    }

    #[test]
    fn test_is_valid_run() {
        assert!(!is_valid_run(&[]));
        assert!(is_valid_run(&[card("K♠")]));
        assert!(is_valid_run(&[card("9♠"), card("8♥"), card("7♠")]));
        assert!(!is_valid_run(&[card("9♠"), card("8♠")]));
        assert!(!is_valid_run(&[card("9♠"), card("7♥")]));
        // Ascending order is not a run even though the pair would stack
        // the other way around.
        assert!(!is_valid_run(&[card("7♠"), card("8♥")]));
    }

    #[test]
    fn test_can_place_on_foundation() {
        assert!(can_place_on_foundation(card("A♦"), None));
        assert!(!can_place_on_foundation(card("2♦"), None));
        assert!(can_place_on_foundation(card("2♦"), Some(card("A♦"))));
        assert!(!can_place_on_foundation(card("2♣"), Some(card("A♦"))));
        assert!(!can_place_on_foundation(card("3♦"), Some(card("A♦"))));
    }

    #[test]
    fn test_can_place_on_column() {
        let empty = Column::default();
        let with_eight = Column::new(vec![card("2♠"), card("8♣")]);

        assert!(can_place_on_column(card("5♥"), &empty, false));
        assert!(!can_place_on_column(card("5♥"), &empty, true));
        assert!(can_place_on_column(card("K♥"), &empty, true));
        assert!(can_place_on_column(card("7♦"), &with_eight, false));
        assert!(!can_place_on_column(card("7♣"), &with_eight, false));
        // The kings-only rule only constrains empty columns.
        assert!(can_place_on_column(card("7♦"), &with_eight, true));
    }
}
