//! Piece placement on the 8×8 board

use crate::castling::Layout;
use crate::moves::{Move, MoveKind};
use crate::movegen;
use crate::types::{CastlingSide, File, Piece, PieceKind, Rank, Side, Square};
use crate::geometry;

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Error parsing the piece placement part of FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Placement contains non-ASCII characters
    #[error("non-ASCII data in placement")]
    NonAscii,
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error indicating that the kings on the board are not placed correctly
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum PositionError {
    /// One of the sides doesn't have a king
    #[error("no king of side {0:?}")]
    NoKing(Side),
    /// One of the sides has more than one king
    #[error("more than one king of side {0:?}")]
    TooManyKings(Side),
}

/// Contents of all the 64 squares
///
/// The grid is a plain value: it can hold any placement, including ones without kings. It is
/// used both as the current state of a [`Board`](crate::Board) and as an entry in its history.
///
/// # Example
///
/// ```
/// # use gridchess::{Grid, File, Rank, Side, Piece, PieceKind};
/// #
/// let grid = Grid::from_placement("4k3/8/8/8/8/8/4P3/4K3").unwrap();
/// assert_eq!(
///     grid.get2(File::E, Rank::R2),
///     Piece::from_parts(Side::White, PieceKind::Pawn)
/// );
/// assert_eq!(grid.to_string(), "4k3/8/8/8/8/8/4P3/4K3");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Grid {
    cells: [Piece; 64],
}

impl Grid {
    /// Returns a grid without any pieces
    #[inline]
    pub const fn empty() -> Grid {
        Grid {
            cells: [Piece::EMPTY; 64],
        }
    }

    /// Returns a grid with the initial position
    pub fn initial() -> Grid {
        let mut res = Grid::empty();
        for file in File::iter() {
            res.put2(file, Rank::R2, Piece::from_parts(Side::White, PieceKind::Pawn));
            res.put2(file, Rank::R7, Piece::from_parts(Side::Black, PieceKind::Pawn));
        }
        for side in [Side::White, Side::Black] {
            let rank = geometry::home_rank(side);
            for (file, kind) in File::iter().zip([
                PieceKind::Rook,
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Queen,
                PieceKind::King,
                PieceKind::Bishop,
                PieceKind::Knight,
                PieceKind::Rook,
            ]) {
                res.put2(file, rank, Piece::from_parts(side, kind));
            }
        }
        res
    }

    /// Parses a grid from the piece placement part of FEN
    ///
    /// Does the same as [`Grid::from_str`].
    #[inline]
    pub fn from_placement(s: &str) -> Result<Grid, PlacementParseError> {
        Grid::from_str(s)
    }

    /// Converts the grid into the piece placement part of FEN
    #[inline]
    pub fn as_placement(&self) -> String {
        self.to_string()
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Piece {
        self.cells[sq.index()]
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Piece {
        self.get(Square::from_parts(file, rank))
    }

    #[inline]
    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.cells[sq.index()] = piece;
    }

    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, piece: Piece) {
        self.put(Square::from_parts(file, rank), piece);
    }

    /// Returns all the cells, indexed by [`Square::index()`]
    #[inline]
    pub fn cells(&self) -> &[Piece; 64] {
        &self.cells
    }

    /// Iterates over all the squares together with their contents, starting from `a1`
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().map(move |sq| (sq, self.get(sq)))
    }

    /// Returns the position of the king of side `side`
    pub fn king_pos(&self, side: Side) -> Result<Square, PositionError> {
        let king = Piece::from_parts(side, PieceKind::King);
        let mut found = None;
        for (sq, piece) in self.iter() {
            if piece != king {
                continue;
            }
            if found.is_some() {
                return Err(PositionError::TooManyKings(side));
            }
            found = Some(sq);
        }
        found.ok_or(PositionError::NoKing(side))
    }

    /// Returns `true` if the king of side `side` is attacked
    ///
    /// Fails if `side` doesn't have exactly one king.
    #[inline]
    pub fn is_check(&self, side: Side) -> Result<bool, PositionError> {
        movegen::is_king_attacked(self, side)
    }

    /// Moves the pieces according to `mv`
    ///
    /// The move is not validated in any way.
    pub(crate) fn make(&mut self, mv: Move) {
        let (src, dst) = (mv.src(), mv.dst());
        let piece = self.get(src);
        match mv.kind() {
            MoveKind::Normal => {
                self.put(src, Piece::EMPTY);
                self.put(dst, piece);
            }
            MoveKind::CastleKingside | MoveKind::CastleQueenside => {
                let side = if src.rank() == geometry::home_rank(Side::White) {
                    Side::White
                } else {
                    Side::Black
                };
                let castling = match mv.kind() {
                    MoveKind::CastleKingside => CastlingSide::King,
                    _ => CastlingSide::Queen,
                };
                let layout = Layout::new(side, castling);
                for sq in layout.span() {
                    self.put(sq, Piece::EMPTY);
                }
                self.put(layout.king_dst, Piece::from_parts(side, PieceKind::King));
                self.put(layout.rook_dst, Piece::from_parts(side, PieceKind::Rook));
            }
            MoveKind::PromoteToQueen | MoveKind::PromoteToKnight => {
                let side = if dst.rank() == geometry::promote_rank(Side::White) {
                    Side::White
                } else {
                    Side::Black
                };
                let kind = mv.kind().promote().unwrap_or(PieceKind::Queen);
                self.put(src, Piece::EMPTY);
                self.put(dst, Piece::from_parts(side, kind));
            }
            MoveKind::EnPassant => {
                self.put(src, Piece::EMPTY);
                self.put(dst, piece);
                self.put(Square::from_parts(dst.file(), src.rank()), Piece::EMPTY);
            }
        }
    }
}

impl Default for Grid {
    #[inline]
    fn default() -> Grid {
        Grid::empty()
    }
}

fn parse_cells(s: &str) -> Result<[Piece; 64], PlacementParseError> {
    type Error = PlacementParseError;

    // Placement lists the ranks from the 8th down to the 1st
    let rank_at = |row: usize| Rank::from_index(7 - row);

    let mut file = 0_usize;
    let mut row = 0_usize;
    let mut cells = [Piece::EMPTY; 64];
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(rank_at(row)));
                }
                file += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(rank_at(row)));
                }
                row += 1;
                file = 0;
                if row >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(rank_at(row)));
                }
                let sq = Square::from_parts(File::from_index(file), rank_at(row));
                cells[sq.index()] =
                    Piece::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?;
                file += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(rank_at(row)));
    }
    if row < 7 {
        return Err(Error::Underflow);
    }

    Ok(cells)
}

impl FromStr for Grid {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Grid, Self::Err> {
        if !s.is_ascii() {
            return Err(PlacementParseError::NonAscii);
        }
        Ok(Grid {
            cells: parse_cells(s)?,
        })
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter().rev() {
            if rank != Rank::R8 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let piece = self.get2(file, rank);
                if piece.is_empty() {
                    empty += 1;
                    continue;
                }
                if empty != 0 {
                    write!(f, "{}", (b'0' + empty) as char)?;
                    empty = 0;
                }
                write!(f, "{}", piece)?;
            }
            if empty != 0 {
                write!(f, "{}", (b'0' + empty) as char)?;
            }
        }
        Ok(())
    }
}
