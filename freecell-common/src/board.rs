use anyhow::{Context, Result};
use smallvec::SmallVec;

pub const TOTAL_FREECELLS: usize = 4;
pub const TOTAL_COLUMNS: usize = 8;
pub const TOTAL_FOUNDATIONS: usize = 4;
pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;
pub const MAX_CARD: u8 = MAX_SUIT * MAX_RANK;

const SUITS: [char; 5] = ['♣', '♦', '♠', '♥', '?'];
const RANKS: [char; 14] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', '?',
];
const COLUMN_SIZE: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct Board {
    pub freecells: [Option<Card>; TOTAL_FREECELLS],
    pub foundations: [Option<Card>; TOTAL_FOUNDATIONS],
    pub columns: [Column; TOTAL_COLUMNS],
    kings_only_on_empty: bool,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kings_only_on_empty(&self) -> bool {
        self.kings_only_on_empty
    }

    pub fn set_kings_only_on_empty(&mut self, value: bool) {
        self.kings_only_on_empty = value;
    }

    pub fn foundation_score(&self) -> u8 {
        self.foundations
            .iter()
            .map(|card| match card {
                Some(card) => card.rank() + 1,
                None => 0,
            })
            .sum()
    }

    pub fn is_won(&self) -> bool {
        self.foundation_score() == MAX_CARD
    }

    pub fn is_valid(&self) -> bool {
        let mut seen = [false; MAX_CARD as usize];
        let mut count = 0;
        let mut check_cards = |cards: &[Card]| -> bool {
            for &card in cards {
                if card.is_unknown() {
                    return false;
                }
                let id = card.id() as usize;
                if seen[id] {
                    return false;
                }
                seen[id] = true;
                count += 1;
            }
            true
        };

        for cell in self.freecells.iter().flatten() {
            if !check_cards(std::slice::from_ref(cell)) {
                return false;
            }
        }
        for (suit, card) in self.foundations.iter().enumerate() {
            let Some(card) = card else {
                continue;
            };
            if card.suit() as usize != suit {
                return false;
            }
            let cards: Vec<_> = (0..=card.rank())
                .map(|r| Card::new_with_rank_suit(r, card.suit()))
                .collect();
            if !check_cards(&cards) {
                return false;
            }
        }
        for column in &self.columns {
            if !check_cards(&column.cards) {
                return false;
            }
        }
        count == MAX_CARD as usize
    }

    pub fn take_freecell_unchecked(&mut self, idx: usize) -> Card {
        self.freecells[idx].take().unwrap_or(Card::UNKNOWN)
    }

    pub fn take_foundation_unchecked(&mut self, suit: usize) -> Card {
        match self.foundations[suit] {
            Some(card) => {
                self.foundations[suit] = match card.rank() {
                    0 => None,
                    rank => Some(Card::new_with_rank_suit(rank - 1, card.suit())),
                };
                card
            }
            None => Card::UNKNOWN,
        }
    }

    /// Applies a committed multi-card move in one go, without decomposing it.
    pub fn move_tableau_run(&mut self, from_idx: usize, to_idx: usize, count: usize) {
        let cards = self.columns[from_idx].drain_unchecked(count);
        self.columns[to_idx].cards.extend(cards);
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut board: Self = Default::default();

        for line in content
            .split('\n')
            .map(|v| v.trim())
            .filter(|l| !l.is_empty())
        {
            let line_context = || format!("Failed to parse at '{line}'");
            if let Some(rest) = line.strip_prefix("Freecells:") {
                for (idx, token) in rest.split_whitespace().enumerate() {
                    if token == "-" {
                        continue;
                    }
                    let cards = Self::parse_cards(token).with_context(line_context)?;
                    let cell = board
                        .freecells
                        .get_mut(idx)
                        .context("Too many freecells")
                        .with_context(line_context)?;
                    *cell = cards.last().copied();
                }
            } else if let Some(rest) = line.strip_prefix("Foundation") {
                let mut parts = rest.splitn(2, ':');
                let idx = parts
                    .next()
                    .unwrap_or("")
                    .trim()
                    .parse::<usize>()
                    .context("Invalid foundation index")
                    .with_context(line_context)?;
                let idx = idx
                    .checked_sub(1)
                    .filter(|idx| *idx < TOTAL_FOUNDATIONS)
                    .context("Invalid foundation index")
                    .with_context(line_context)?;
                let cards = Self::parse_cards(parts.next().unwrap_or("").trim())
                    .with_context(line_context)?;
                board.foundations[idx] = cards.last().copied();
            } else if let Some(rest) = line.strip_prefix("Tableau") {
                let mut parts = rest.splitn(2, ':');
                let idx = parts
                    .next()
                    .unwrap_or("")
                    .trim()
                    .parse::<usize>()
                    .context("Invalid tableau index")
                    .with_context(line_context)?;
                let idx = idx
                    .checked_sub(1)
                    .filter(|idx| *idx < TOTAL_COLUMNS)
                    .context("Invalid tableau index")
                    .with_context(line_context)?;
                let cards = Self::parse_cards(parts.next().unwrap_or("").trim())
                    .with_context(line_context)?;
                for card in cards {
                    board.columns[idx].push(card);
                }
            } else if let Some(rest) = line.strip_prefix("KingsOnly:") {
                let value = rest
                    .trim()
                    .parse::<bool>()
                    .context("Invalid KingsOnly")
                    .with_context(line_context)?;
                board.set_kings_only_on_empty(value);
            }
        }

        Ok(board)
    }

    fn parse_cards(s: &str) -> Result<Vec<Card>> {
        let mut cards = Vec::new();
        let mut chars = s.chars().peekable();
        while let Some(&c1) = chars.peek() {
            if c1.is_whitespace() {
                chars.next();
                continue;
            }
            let rank = c1;
            chars.next();
            let suit = match chars.next() {
                Some(s) => s,
                None => break,
            };
            cards.push(Card::parse(rank, suit)?);
        }
        Ok(cards)
    }

    pub fn to_pretty_string(&self) -> String {
        let mut output = String::new();

        // Freecells
        if self.freecells.iter().any(|cell| cell.is_some()) {
            output.push_str("Freecells:");
            for cell in &self.freecells {
                output.push(' ');
                match cell {
                    Some(card) => output.push_str(&card.to_pretty_string()),
                    None => output.push('-'),
                }
            }
            output.push('\n');
        }

        // Foundations
        for (i, card) in self.foundations.iter().enumerate() {
            if let Some(card) = card {
                output.push_str(&format!("Foundation{}: {}\n", i + 1, card.to_pretty_string()));
            }
        }

        // Tableau columns
        for (i, column) in self.columns.iter().enumerate() {
            if column.is_empty() {
                continue;
            }
            output.push_str(&format!("Tableau{}: ", i + 1));
            for card in &column.cards {
                output.push_str(&card.to_pretty_string());
            }
            output.push('\n');
        }

        // KingsOnly
        output.push_str(&format!("KingsOnly: {}", self.kings_only_on_empty));

        output
    }
}

#[derive(Debug, Clone, Default)]
pub struct Column {
    pub cards: SmallVec<[Card; COLUMN_SIZE]>,
}

impl Column {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// The top `count` cards in column order, bottom of the selection first.
    pub fn top_cards(&self, count: usize) -> &[Card] {
        &self.cards[self.cards.len().saturating_sub(count)..]
    }

    pub fn pop_unchecked(&mut self) -> Card {
        self.cards.pop().unwrap_or(Card::UNKNOWN)
    }

    pub fn drain_unchecked(&mut self, count: usize) -> Vec<Card> {
        let len = self.cards.len();
        self.cards.drain(len - count..).collect()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    pub const UNKNOWN: Self = Self(MAX_CARD);

    pub fn new_with_rank_suit(rank: u8, suit: u8) -> Self {
        Self(suit * MAX_RANK + rank)
    }

    pub fn parse(rank: char, suit: char) -> Result<Self> {
        let rank = RANKS
            .iter()
            .position(|&r| r == rank)
            .with_context(|| format!("Invalid rank at card {rank}{suit}"))?;
        let suit = SUITS
            .iter()
            .position(|&s| s == suit)
            .with_context(|| format!("Invalid suit at card {rank}{suit}"))?;
        Ok(Card::new_with_rank_suit(rank as u8, suit as u8))
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 >= Card::UNKNOWN.0
    }

    pub fn rank(&self) -> u8 {
        self.0 % MAX_RANK
    }

    pub fn suit(&self) -> u8 {
        self.0 / MAX_RANK
    }

    pub fn is_red(&self) -> bool {
        self.suit() & 1 == 1
    }

    pub fn is_ace(&self) -> bool {
        self.rank() == 0
    }

    pub fn is_king(&self) -> bool {
        self.rank() == MAX_RANK - 1
    }

    pub fn to_pretty_string(&self) -> String {
        format!(
            "{}{}",
            RANKS[self.rank() as usize],
            SUITS[self.suit() as usize]
        )
    }
}

impl Default for Card {
    fn default() -> Self {
        Card::UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board() {
        const BOARD_STR: &str = r#"Freecells: Q♠ - 9♦ -
Foundation1: 2♣
Foundation2: A♦
Foundation4: 3♥
Tableau1: K♣Q♦J♠T♦
Tableau2: 3♣8♦2♦9♠8♥7♠
Tableau3: 5♦K♠T♥9♣J♥T♠
Tableau4: 4♥6♦Q♣J♦T♣9♥
Tableau5: 6♥3♦8♣7♦6♠5♥
Tableau6: J♣5♠K♥Q♥2♠A♠
Tableau7: 4♣K♦7♥4♦3♠
Tableau8: 5♣6♣7♣8♠4♠
KingsOnly: false"#;

        let board = Board::parse(BOARD_STR).unwrap();
        assert!(board.is_valid());
        assert_eq!(board.foundation_score(), 6);
        assert_eq!(BOARD_STR, board.to_pretty_string());
    }

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.foundation_score(), 0);
        assert!(!board.kings_only_on_empty());
        assert!(!board.is_valid());
        assert!(!board.is_won());
    }

    #[test]
    fn test_kings_only_round_trip() {
        const BOARD_STR: &str = "Tableau1: K♠\nKingsOnly: true";
        let board = Board::parse(BOARD_STR).unwrap();
        assert!(board.kings_only_on_empty());
        assert_eq!(board.to_pretty_string(), "Tableau1: K♠\nKingsOnly: true");
    }

    #[test]
    fn test_won_board() {
        const BOARD_STR: &str = r#"Foundation1: K♣
Foundation2: K♦
Foundation3: K♠
Foundation4: K♥
KingsOnly: false"#;

        let board = Board::parse(BOARD_STR).unwrap();
        assert!(board.is_valid());
        assert!(board.is_won());
        assert_eq!(board.foundation_score(), MAX_CARD);
    }

    #[test]
    fn test_foundation_suit_mismatch_is_invalid() {
        // Same 52 cards as the round-trip fixture, but the club and diamond
        // piles are filed under each other's foundation slot.
        const BOARD_STR: &str = r#"Freecells: Q♠ - 9♦ -
Foundation1: A♦
Foundation2: 2♣
Foundation4: 3♥
Tableau1: K♣Q♦J♠T♦
Tableau2: 3♣8♦2♦9♠8♥7♠
Tableau3: 5♦K♠T♥9♣J♥T♠
Tableau4: 4♥6♦Q♣J♦T♣9♥
Tableau5: 6♥3♦8♣7♦6♠5♥
Tableau6: J♣5♠K♥Q♥2♠A♠
Tableau7: 4♣K♦7♥4♦3♠
Tableau8: 5♣6♣7♣8♠4♠
KingsOnly: false"#;

        let board = Board::parse(BOARD_STR).unwrap();
        assert!(!board.is_valid());
    }

    #[test]
    fn test_take_foundation() {
        let mut board = Board::parse("Foundation4: 3♥\nKingsOnly: false").unwrap();
        let card = board.take_foundation_unchecked(3);
        assert_eq!(card.to_pretty_string(), "3♥");
        assert_eq!(board.foundations[3].unwrap().to_pretty_string(), "2♥");

        let mut board = Board::parse("Foundation1: A♣\nKingsOnly: false").unwrap();
        let card = board.take_foundation_unchecked(0);
        assert!(card.is_ace());
        assert_eq!(board.foundations[0], None);
    }

    #[test]
    fn test_card_colors() {
        let queen_of_spades = Card::parse('Q', '♠').unwrap();
        let ten_of_hearts = Card::parse('T', '♥').unwrap();
        assert!(!queen_of_spades.is_red());
        assert!(ten_of_hearts.is_red());
        assert!(Card::parse('K', '♦').unwrap().is_king());
    }
}
