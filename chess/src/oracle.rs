//! Data contract of an external move-selection oracle
//!
//! The oracle receives the position as a request string and answers with the squares of the
//! chosen move. Both are expressed from the point of view of the side to move (called the
//! _mover_ here): for Black, the ranks are reversed, and the pieces of the mover always get the
//! larger codes.
//!
//! The request contains 64 two-digit piece codes separated by single spaces. The codes go rank
//! by rank starting from the mover's home rank, and from file `a` to file `h` inside each rank.
//! See [`piece_code()`] for the codes themselves.
//!
//! The reply contains four digits from `0` to `7`: source rank, source file, destination rank
//! and destination file, again in the mover's frame.

use crate::board::Board;
use crate::grid::Grid;
use crate::moves::Move;
use crate::types::{File, Piece, PieceKind, Rank, Side, Square};

use std::error::Error as StdError;

use log::{debug, warn};
use thiserror::Error;

/// Error decoding an oracle reply
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ReplyError {
    /// Reply doesn't consist of exactly four characters
    #[error("expected 4 digits, got {0} chars")]
    BadLength(usize),
    /// Reply contains something besides digits from `0` to `7`
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error asking an oracle for a move
#[derive(Debug, Error)]
pub enum AskError<E: StdError + 'static> {
    /// Oracle itself failed
    #[error("oracle failed: {0}")]
    Oracle(#[source] E),
    /// Oracle reply cannot be decoded
    #[error("bad oracle reply: {0}")]
    Reply(#[from] ReplyError),
    /// Oracle has chosen a move which is not legal
    #[error("oracle chose {src}{dst}, which is not a legal move")]
    Illegal { src: Square, dst: Square },
}

/// Move-selection oracle
pub trait Oracle {
    type Err: StdError + 'static;

    /// Returns the reply for the encoded position `request`
    fn select(&mut self, request: &str) -> Result<String, Self::Err>;
}

/// Returns the code of `piece` for the side `mover`
///
/// Empty square gets code 0. Pieces of the opponent get codes from 1 to 6 in the order pawn,
/// knight, bishop, king, rook, queen. Pieces of the mover get the same codes shifted by 6.
pub fn piece_code(piece: Piece, mover: Side) -> u8 {
    let (side, kind) = match (piece.side(), piece.kind()) {
        (Some(side), Some(kind)) => (side, kind),
        _ => return 0,
    };
    let base = match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight => 2,
        PieceKind::Bishop => 3,
        PieceKind::King => 4,
        PieceKind::Rook => 5,
        PieceKind::Queen => 6,
    };
    if side == mover {
        base + 6
    } else {
        base
    }
}

#[inline]
fn rank_for(rank: Rank, mover: Side) -> Rank {
    match mover {
        Side::White => rank,
        Side::Black => rank.flipped(),
    }
}

/// Encodes `grid` as a request for side `mover`
pub fn encode_request(grid: &Grid, mover: Side) -> String {
    let mut codes = Vec::with_capacity(Square::COUNT);
    for rank in Rank::iter() {
        let rank = rank_for(rank, mover);
        for file in File::iter() {
            codes.push(format!("{:02}", piece_code(grid.get2(file, rank), mover)));
        }
    }
    codes.join(" ")
}

/// Decodes the source and destination squares from an oracle reply for side `mover`
///
/// Whitespace around the reply is ignored.
pub fn decode_reply(reply: &str, mover: Side) -> Result<(Square, Square), ReplyError> {
    let reply = reply.trim();
    let len = reply.chars().count();
    if len != 4 {
        return Err(ReplyError::BadLength(len));
    }
    let mut digits = [0_usize; 4];
    for (d, c) in digits.iter_mut().zip(reply.chars()) {
        *d = match c {
            '0'..='7' => c as usize - '0' as usize,
            _ => return Err(ReplyError::UnexpectedChar(c)),
        };
    }
    let square = |rank: usize, file: usize| {
        Square::from_parts(
            File::from_index(file),
            rank_for(Rank::from_index(rank), mover),
        )
    };
    Ok((square(digits[0], digits[1]), square(digits[2], digits[3])))
}

/// Asks `oracle` for a move of side `mover` on board `b`
///
/// The squares from the reply are resolved against the legal moves of `mover`. If the reply
/// denotes a promotion, the promotion to queen is chosen.
pub fn ask<O: Oracle>(oracle: &mut O, b: &Board, mover: Side) -> Result<Move, AskError<O::Err>> {
    let request = encode_request(b.grid(), mover);
    debug!("request for {:?}: {}", mover, request);
    let reply = oracle.select(&request).map_err(AskError::Oracle)?;
    debug!("reply for {:?}: {:?}", mover, reply);
    let (src, dst) = decode_reply(&reply, mover).map_err(|e| {
        warn!("cannot decode oracle reply {:?}: {}", reply, e);
        e
    })?;
    b.find_legal(mover, src, dst).ok_or_else(|| {
        warn!("oracle chose illegal move {}{}", src, dst);
        AskError::Illegal { src, dst }
    })
}
