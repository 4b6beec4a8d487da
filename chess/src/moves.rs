//! Moves and move kinds

use crate::types::{CastlingSide, File, PieceKind, Side, Square};
use crate::geometry;

use std::fmt;

use derive_more::Display;
use thiserror::Error;

/// Move kind
///
/// The [`Display`](fmt::Display) implementation gives a short internal label for the kind.
#[derive(Debug, Display, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Any move or capture not covered by the other kinds, including pawn double steps
    #[default]
    #[display(fmt = "normal")]
    Normal = 0,
    /// Kingside castling
    #[display(fmt = "castle-kingside")]
    CastleKingside = 1,
    /// Queenside castling
    #[display(fmt = "castle-queenside")]
    CastleQueenside = 2,
    /// Pawn promotes to queen (either non-capture or capture)
    #[display(fmt = "promote-queen")]
    PromoteToQueen = 3,
    /// Pawn promotes to knight (either non-capture or capture)
    #[display(fmt = "promote-knight")]
    PromoteToKnight = 4,
    /// En passant capture
    #[display(fmt = "en-passant")]
    EnPassant = 5,
}

impl From<CastlingSide> for MoveKind {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::King => Self::CastleKingside,
            CastlingSide::Queen => Self::CastleQueenside,
        }
    }
}

impl TryFrom<MoveKind> for CastlingSide {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::CastleKingside => Ok(Self::King),
            MoveKind::CastleQueenside => Ok(Self::Queen),
            _ => Err(()),
        }
    }
}

impl MoveKind {
    /// Returns the kind of the piece after promotion if this move kind represents a promotion
    ///
    /// Otherwise, returns `None`.
    #[inline]
    pub fn promote(self) -> Option<PieceKind> {
        match self {
            MoveKind::PromoteToQueen => Some(PieceKind::Queen),
            MoveKind::PromoteToKnight => Some(PieceKind::Knight),
            _ => None,
        }
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        matches!(self, MoveKind::CastleKingside | MoveKind::CastleQueenside)
    }
}

/// Chess move
///
/// A move is just a kind plus source and destination squares. It does not remember which side
/// makes it: that is determined by the piece standing on the source square when the move is
/// applied.
///
/// Moves obtained from [`Board::legal_moves()`](crate::Board::legal_moves) are legal in the
/// position they were generated from. Moves built by hand are not validated until they are
/// passed to [`Board::apply()`](crate::Board::apply).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    kind: MoveKind,
    src: Square,
    dst: Square,
}

impl Move {
    #[inline]
    pub const fn new(kind: MoveKind, src: Square, dst: Square) -> Move {
        Move { kind, src, dst }
    }

    #[inline]
    pub const fn normal(src: Square, dst: Square) -> Move {
        Move::new(MoveKind::Normal, src, dst)
    }

    /// Creates a castling move made by `side` towards `castling`
    #[inline]
    pub fn from_castling(side: Side, castling: CastlingSide) -> Move {
        let rank = geometry::home_rank(side);
        let src = Square::from_parts(File::E, rank);
        let dst = match castling {
            CastlingSide::King => Square::from_parts(File::G, rank),
            CastlingSide::Queen => Square::from_parts(File::C, rank),
        };
        Move::new(MoveKind::from(castling), src, dst)
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn src(&self) -> Square {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Square {
        self.dst
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if self.kind != MoveKind::Normal {
            write!(f, " ({})", self.kind)?;
        }
        Ok(())
    }
}

/// Error indicating that a move cannot be applied
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// There is no piece on the source square
    #[error("no piece on {0}")]
    EmptySource(Square),
    /// The piece on the source square belongs to the side not expected to move
    #[error("piece on {square} belongs to {found}, expected {expected}")]
    WrongSide {
        square: Square,
        expected: Side,
        found: Side,
    },
    /// Move is not legal
    #[error("move {0} is not legal")]
    NotLegal(Move),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rank;

    #[test]
    fn test_castling_moves() {
        let mv = Move::from_castling(Side::White, CastlingSide::King);
        assert_eq!(mv.kind(), MoveKind::CastleKingside);
        assert_eq!(mv.src(), Square::from_parts(File::E, Rank::R1));
        assert_eq!(mv.dst(), Square::from_parts(File::G, Rank::R1));

        let mv = Move::from_castling(Side::Black, CastlingSide::Queen);
        assert_eq!(mv.kind(), MoveKind::CastleQueenside);
        assert_eq!(mv.src(), Square::from_parts(File::E, Rank::R8));
        assert_eq!(mv.dst(), Square::from_parts(File::C, Rank::R8));
        assert_eq!(CastlingSide::try_from(mv.kind()), Ok(CastlingSide::Queen));
        assert_eq!(CastlingSide::try_from(MoveKind::Normal), Err(()));
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = [
            MoveKind::Normal,
            MoveKind::CastleKingside,
            MoveKind::CastleQueenside,
            MoveKind::PromoteToQueen,
            MoveKind::PromoteToKnight,
            MoveKind::EnPassant,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(
            labels,
            [
                "normal",
                "castle-kingside",
                "castle-queenside",
                "promote-queen",
                "promote-knight",
                "en-passant"
            ]
        );
    }

    #[test]
    fn test_display() {
        let e7 = Square::from_parts(File::E, Rank::R7);
        let e8 = Square::from_parts(File::E, Rank::R8);
        assert_eq!(Move::normal(e7, e8).to_string(), "e7e8");
        assert_eq!(
            Move::new(MoveKind::PromoteToKnight, e7, e8).to_string(),
            "e7e8 (promote-knight)"
        );
        assert_eq!(MoveKind::PromoteToKnight.promote(), Some(PieceKind::Knight));
        assert_eq!(MoveKind::EnPassant.promote(), None);
    }
}
