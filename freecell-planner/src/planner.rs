use crate::capacity::max_movable;

use freecell_common::board::{Board, TOTAL_COLUMNS, TOTAL_FOUNDATIONS, TOTAL_FREECELLS};
use freecell_common::rules;
use freecell_common::step::{Location, MoveStep, apply_step, peek_card};

use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub num_cards: usize,
    pub source: Location,
    pub destination: Location,
}

impl PlanRequest {
    pub fn new(num_cards: usize, source: Location, destination: Location) -> Self {
        Self {
            num_cards,
            source,
            destination,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub steps: Vec<MoveStep>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlanError {
    EmptySource { requested: usize, available: usize },
    InvalidRun,
    InsufficientCapacity { requested: usize, max_movable: usize },
    IllegalDestination,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::EmptySource { .. } => write!(f, "Not enough cards to move."),
            PlanError::InvalidRun => {
                write!(f, "Cards must be in descending rank with alternating colors.")
            }
            PlanError::InsufficientCapacity { max_movable, .. } => write!(
                f,
                "You can only move up to {max_movable} cards at once, based on available freecells and empty columns."
            ),
            PlanError::IllegalDestination => {
                write!(f, "The selected cards cannot be placed there.")
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// Validates a request without producing any steps.
pub fn check(board: &Board, request: &PlanRequest) -> Result<(), PlanError> {
    validate(board, request)
}

/// Turns a request into an ordered step list, or refuses it with no steps
/// emitted. The caller's board is never touched.
pub fn plan(board: &Board, request: &PlanRequest) -> Result<Plan, PlanError> {
    validate(board, request)?;

    match (request.source, request.destination) {
        (Location::Tableau(src), Location::Tableau(dst)) if request.num_cards > 1 => {
            let mut planner = Planner {
                board: board.clone(),
                steps: Vec::new(),
            };
            planner.relocate(request.num_cards, src, dst)?;
            Ok(Plan {
                steps: planner.steps,
            })
        }
        (from, to) => Ok(Plan {
            steps: vec![MoveStep::new(from, to)],
        }),
    }
}

fn validate(board: &Board, request: &PlanRequest) -> Result<(), PlanError> {
    let num_cards = request.num_cards;

    let available = match request.source {
        Location::Tableau(idx) if idx < TOTAL_COLUMNS => board.columns[idx].len(),
        Location::Freecell(idx) if idx < TOTAL_FREECELLS => {
            board.freecells[idx].is_some() as usize
        }
        Location::Foundation(suit) if suit < TOTAL_FOUNDATIONS => {
            board.foundations[suit].is_some() as usize
        }
        _ => 0,
    };
    if num_cards == 0 || num_cards > available {
        return Err(PlanError::EmptySource {
            requested: num_cards,
            available,
        });
    }

    if request.source == request.destination {
        return Err(PlanError::IllegalDestination);
    }

    // The card that will land directly on the destination.
    let bottom = match request.source {
        Location::Tableau(idx) => {
            let run = board.columns[idx].top_cards(num_cards);
            if num_cards > 1 && !rules::is_valid_run(run) {
                return Err(PlanError::InvalidRun);
            }
            run[0]
        }
        source => peek_card(board, source).unwrap_or_default(),
    };

    match request.destination {
        Location::Tableau(dst) if dst < TOTAL_COLUMNS => {
            if num_cards > 1 {
                // A multi-card source can only be a tableau column; anything
                // else holds at most one card and was caught above.
                if let Location::Tableau(src) = request.source {
                    let max_movable = max_movable(board, src, dst);
                    if num_cards > max_movable {
                        return Err(PlanError::InsufficientCapacity {
                            requested: num_cards,
                            max_movable,
                        });
                    }
                }
            }
            if !rules::can_place_on_column(bottom, &board.columns[dst], board.kings_only_on_empty())
            {
                return Err(PlanError::IllegalDestination);
            }
        }
        Location::Freecell(idx) if idx < TOTAL_FREECELLS => {
            if num_cards > 1 || board.freecells[idx].is_some() {
                return Err(PlanError::IllegalDestination);
            }
        }
        Location::Foundation(suit) if suit < TOTAL_FOUNDATIONS => {
            if num_cards > 1
                || bottom.suit() as usize != suit
                || !rules::can_place_on_foundation(bottom, board.foundations[suit])
            {
                return Err(PlanError::IllegalDestination);
            }
        }
        _ => return Err(PlanError::IllegalDestination),
    }

    Ok(())
}

struct Planner {
    board: Board,
    steps: Vec<MoveStep>,
}

impl Planner {
    /// Moves the top `num_cards` cards of column `src` onto column `dst` in
    /// order. Parks into the lowest empty freecell; when the cells run out,
    /// the lowest idle column becomes a helper and the parked cells flush
    /// onto it newest-first. After the bottom card is carried, leftover
    /// cells unpark newest-first and helpers drain newest-first by recursing
    /// on the helper pile, which makes capacity multiplicative.
    fn relocate(&mut self, num_cards: usize, src: usize, dst: usize) -> Result<(), PlanError> {
        let mut parked: SmallVec<[usize; TOTAL_FREECELLS]> = SmallVec::new();
        let mut helpers: SmallVec<[(usize, usize); TOTAL_COLUMNS]> = SmallVec::new();

        // park
        for _ in 0..num_cards - 1 {
            if let Some(cell) = self.first_empty_freecell() {
                self.emit(Location::Tableau(src), Location::Freecell(cell));
                parked.push(cell);
            } else if let Some(helper) = self.first_idle_column(src, dst) {
                self.emit(Location::Tableau(src), Location::Tableau(helper));
                let mut count = 1;
                while let Some(cell) = parked.pop() {
                    self.emit(Location::Freecell(cell), Location::Tableau(helper));
                    count += 1;
                }
                helpers.push((helper, count));
            } else {
                return Err(PlanError::InsufficientCapacity {
                    requested: num_cards,
                    max_movable: max_movable(&self.board, src, dst),
                });
            }
        }

        // carry
        self.emit(Location::Tableau(src), Location::Tableau(dst));

        // unpark
        while let Some(cell) = parked.pop() {
            self.emit(Location::Freecell(cell), Location::Tableau(dst));
        }
        while let Some((helper, count)) = helpers.pop() {
            self.relocate(count, helper, dst)?;
        }

        Ok(())
    }

    fn emit(&mut self, from: Location, to: Location) {
        let step = MoveStep::new(from, to);
        apply_step(&mut self.board, &step);
        self.steps.push(step);
    }

    fn first_empty_freecell(&self) -> Option<usize> {
        self.board.freecells.iter().position(|cell| cell.is_none())
    }

    fn first_idle_column(&self, src: usize, dst: usize) -> Option<usize> {
        (0..TOTAL_COLUMNS).find(|&idx| idx != src && idx != dst && self.board.columns[idx].is_empty())
    }
}
