//! Magic Ball game engine.
//!
//! A two-player strategy game on a 5×5 grid. Each side pushes pawns toward the
//! opponent's home row and holds a small hand of single-use cards. Card play
//! shoves a shared "ball" toward the opponent; while the ball sits at a side's
//! far end, that side cannot play cards.
//!
//! # Architecture
//!
//! - **Tile / Board**: coordinates and the pawn store, no rules
//! - **Cards**: the closed catalog of card kinds and their move generators
//! - **Ball**: the three-state tracker gating card play
//! - **Validator**: ordered legality checks producing a resolved move
//! - **Game**: the state machine applying resolved moves atomically
//! - **Opponent**: pluggable move-selection strategies
//!
//! # Example
//!
//! ```
//! use magic_ball::{Game, GameSetup, MoveRequest, Side, Tile};
//!
//! let mut game = Game::new(GameSetup::human_vs_human());
//! let record = game
//!     .play(&MoveRequest::Push {
//!         source_tile: "C5".parse::<Tile>().unwrap(),
//!         target_tile: "C4".parse::<Tile>().unwrap(),
//!     })
//!     .unwrap();
//! assert_eq!(record.side, Side::White);
//! assert_eq!(game.state().current_player(), Side::Black);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod ball;
mod board;
mod cards;
mod game;
mod opponent;
mod rules;
mod tile;
mod types;
mod validator;

// Crate-level exports - Coordinates and board
pub use board::Board;
pub use tile::{BOARD_SIZE, Tile, TileParseError};
pub use types::{GameStatus, GameType, Occupant, Side, UnknownStatusCode};

// Crate-level exports - Ball
pub use ball::{BallPosition, BallTracker};

// Crate-level exports - Cards
pub use cards::{Card, CardKind, CardMove, DealError, Effect, Hand, MarkerShape, deal_hands};

// Crate-level exports - Moves and validation
pub use action::{MoveRecord, MoveRequest, Rejection, ResolvedMove};
pub use validator::{MoveOrigin, legal_moves_for, push_moves, select_card_move, validate};

// Crate-level exports - Rules
pub use rules::{apply_effects, check_winner, evaluate_status, has_legal_move};

// Crate-level exports - Game state machine
pub use game::{Game, GameSetup, GameState};

// Crate-level exports - Opponents
pub use opponent::{FirstLegal, HeuristicPolicy, OpponentKind, OpponentPolicy, RandomPolicy, ScoreWeights};
