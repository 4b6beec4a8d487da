//! # gridchess
//!
//! Chess position engine built around a plain 8×8 grid and a stack of grid snapshots.
//!
//! The central type is [`Board`]. For a given square and side, it produces the legal moves of
//! the piece on that square. Moves are applied with [`Board::apply()`] and reverted with
//! [`Board::undo()`]. There is no separate state for castling rights or en passant: both are
//! derived from the history of grids kept by the board.
//!
//! Optional rules (en passant, knight promotion, the check for castling through an attacked
//! square) are controlled by [`Rules`].
//!
//! [`Session`] wraps a board and enforces alternating moves. It can also ask an external
//! [`Oracle`](oracle::Oracle) for a move, see the [`oracle`] module for the data contract.
//!
//! # Example
//!
//! ```
//! # use gridchess::{Board, Side, Square};
//! # use std::str::FromStr;
//! #
//! let mut b = Board::initial();
//! assert_eq!(b.all_legal_moves(Side::White).len(), 20);
//!
//! let e2 = Square::from_str("e2").unwrap();
//! let e4 = Square::from_str("e4").unwrap();
//! let mv = b.find_legal(Side::White, e2, e4).unwrap();
//! b.apply(mv).unwrap();
//! assert!(!b.is_in_check(Side::Black));
//! assert_eq!(b.all_legal_moves(Side::Black).len(), 20);
//! ```

pub mod board;
pub mod castling;
pub mod grid;
pub mod movegen;
pub mod moves;
pub mod oracle;
pub mod perft;
pub mod rules;
pub mod session;

pub use gridchess_base::{geometry, types};

pub use board::Board;
pub use grid::Grid;
pub use movegen::MoveList;
pub use moves::{Move, MoveError, MoveKind};
pub use rules::Rules;
pub use session::Session;
pub use types::{CastlingRights, CastlingSide, File, Piece, PieceKind, Rank, Side, Square};
