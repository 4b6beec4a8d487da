//! Board and related things

use crate::castling;
use crate::grid::{Grid, PlacementParseError, PositionError};
use crate::movegen::{self, Mode, MoveList};
use crate::moves::{Move, MoveError};
use crate::rules::Rules;
use crate::types::{CastlingRights, CastlingSide, File, Piece, Rank, Side, Square};

use std::fmt::{self, Display};
use std::str::FromStr;

use log::trace;
use thiserror::Error;

const KING_INVARIANT: &str = "board must contain exactly one king of each side";

/// Error parsing [`Board`] from the piece placement part of FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum BoardParseError {
    /// Placement cannot be parsed
    #[error("cannot parse placement: {0}")]
    Placement(#[from] PlacementParseError),
    /// Placement was parsed, but the kings are placed incorrectly
    #[error("invalid position: {0}")]
    Position(#[from] PositionError),
}

/// Error undoing a move
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum HistoryError {
    /// There are no moves to undo
    #[error("history is empty")]
    Empty,
}

/// Chess board
///
/// The board holds the current [`Grid`] together with the history of all the previous grids, one
/// per applied move. The history is used to undo moves and to find out whether castling and en
/// passant are still possible.
///
/// The board doesn't remember which side is to move: every query takes the side explicitly. Use
/// [`Session`](crate::Session) if you need a game with alternating moves.
///
/// The board always contains exactly one king of each side. This is checked when the board is
/// created, and legal moves can neither capture nor create kings.
///
/// # Example
///
/// ```
/// # use gridchess::{Board, Move, Side, Square};
/// # use std::str::FromStr;
/// #
/// let mut b = Board::initial();
/// let e2 = Square::from_str("e2").unwrap();
/// let e4 = Square::from_str("e4").unwrap();
/// assert_eq!(b.legal_moves(e2, Side::White).len(), 2);
///
/// b.apply(Move::normal(e2, e4)).unwrap();
/// assert_eq!(b.to_string(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR");
///
/// b.undo();
/// assert_eq!(b, Board::initial());
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    grid: Grid,
    history: Vec<Grid>,
    rules: Rules,
}

impl Board {
    /// Returns a board with the initial position and [standard rules](Rules::STANDARD)
    pub fn initial() -> Board {
        Board {
            grid: Grid::initial(),
            history: Vec::new(),
            rules: Rules::default(),
        }
    }

    /// Parses a board from the piece placement part of FEN
    ///
    /// Does the same as [`Board::from_str`]. It is recommended to use this function instead of
    /// `from_str()` for better readability.
    #[inline]
    pub fn from_placement(s: &str) -> Result<Board, BoardParseError> {
        Board::from_str(s)
    }

    /// Replaces the rules used by move generation
    #[inline]
    pub fn with_rules(mut self, rules: Rules) -> Board {
        self.rules = rules;
        self
    }

    #[inline]
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Returns the current grid
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the grids before each of the applied moves, oldest first
    #[inline]
    pub fn history(&self) -> &[Grid] {
        &self.history
    }

    /// Returns the contents of the square `sq`
    #[inline]
    pub fn get(&self, sq: Square) -> Piece {
        self.grid.get(sq)
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Piece {
        self.grid.get2(file, rank)
    }

    /// Returns the position of the king of side `side`
    pub fn king_pos(&self, side: Side) -> Square {
        self.grid.king_pos(side).expect(KING_INVARIANT)
    }

    /// Returns `true` if the king of side `side` is attacked
    pub fn is_in_check(&self, side: Side) -> bool {
        movegen::is_king_attacked(&self.grid, side).expect(KING_INVARIANT)
    }

    /// Returns legal moves of the piece on `src`
    ///
    /// If `src` is empty or holds a piece of the other side, the result is empty.
    #[inline]
    pub fn legal_moves(&self, src: Square, side: Side) -> MoveList {
        movegen::legal(self, src, side)
    }

    /// Returns legal moves of all the pieces of side `side`
    #[inline]
    pub fn all_legal_moves(&self, side: Side) -> Vec<Move> {
        movegen::all_legal(self, side)
    }

    /// Returns pseudo-legal moves of the piece on `src`
    ///
    /// Such moves obey the movement rules of the piece, but may leave the king of `side` under
    /// attack.
    #[inline]
    pub fn pseudo_legal_moves(&self, src: Square, side: Side) -> MoveList {
        movegen::pseudo_legal(self, src, side, Mode::Full)
    }

    /// Returns `true` if side `side` has at least one legal move
    #[inline]
    pub fn has_legal_moves(&self, side: Side) -> bool {
        movegen::has_legal_moves(self, side)
    }

    /// Returns castling rights derived from the board history
    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        castling::rights(self)
    }

    /// Returns `true` if side `side` can castle towards `castling` right now
    #[inline]
    pub fn castle_possible(&self, side: Side, castling: CastlingSide) -> bool {
        castling::is_possible(self, side, castling)
    }

    /// Finds the legal move of `side` from `src` to `dst`
    ///
    /// If several moves share these squares (i.e. the move is a promotion), the promotion to
    /// queen is returned.
    pub fn find_legal(&self, side: Side, src: Square, dst: Square) -> Option<Move> {
        self.legal_moves(src, side)
            .iter()
            .copied()
            .find(|mv| mv.dst() == dst)
    }

    /// Applies the move `mv` after checking that it is legal
    ///
    /// The side making the move is the owner of the piece on the source square.
    pub fn apply(&mut self, mv: Move) -> Result<(), MoveError> {
        let side = self
            .get(mv.src())
            .side()
            .ok_or(MoveError::EmptySource(mv.src()))?;
        if !self.legal_moves(mv.src(), side).contains(&mv) {
            return Err(MoveError::NotLegal(mv));
        }
        self.apply_unchecked(mv);
        Ok(())
    }

    /// Applies the move `mv` without any checks
    ///
    /// The move must be legal in the current position, i.e. obtained from
    /// [`Board::legal_moves()`] or [`Board::all_legal_moves()`]. Otherwise, the board may end
    /// up in a state that breaks its invariants.
    pub fn apply_unchecked(&mut self, mv: Move) {
        trace!("apply {}", mv);
        self.history.push(self.grid);
        self.grid.make(mv);
    }

    /// Reverts the last applied move
    ///
    /// # Panics
    ///
    /// The function panics if there are no moves to undo. Use [`Board::try_undo()`] to handle
    /// such case gracefully.
    pub fn undo(&mut self) {
        if let Err(e) = self.try_undo() {
            panic!("cannot undo: {}", e);
        }
    }

    /// Reverts the last applied move, failing if there are no moves to undo
    pub fn try_undo(&mut self) -> Result<(), HistoryError> {
        let prev = self.history.pop().ok_or(HistoryError::Empty)?;
        trace!("undo, {} grids left in history", self.history.len());
        self.grid = prev;
        Ok(())
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::initial()
    }
}

impl TryFrom<Grid> for Board {
    type Error = PositionError;

    fn try_from(grid: Grid) -> Result<Board, PositionError> {
        grid.king_pos(Side::White)?;
        grid.king_pos(Side::Black)?;
        Ok(Board {
            grid,
            history: Vec::new(),
            rules: Rules::default(),
        })
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Ok(Board::try_from(Grid::from_str(s)?)?)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        Display::fmt(&self.grid, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveKind;
    use crate::types::PieceKind;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Ok(Board::initial())
        );
        assert_eq!(
            Board::from_placement("8/8/8/8/8/8/8/4K3"),
            Err(BoardParseError::Position(PositionError::NoKing(Side::Black)))
        );
        assert_eq!(
            Board::from_placement("k7/8/8/8/8/8/8/K6K"),
            Err(BoardParseError::Position(PositionError::TooManyKings(
                Side::White
            )))
        );
        assert_eq!(
            Board::from_placement("k7/8/8/8/8/8/8/K6"),
            Err(BoardParseError::Placement(
                PlacementParseError::RankUnderflow(Rank::R1)
            ))
        );
        assert_eq!(
            Board::try_from(Grid::empty()),
            Err(PositionError::NoKing(Side::White))
        );
    }

    #[test]
    fn test_apply_undo() {
        let mut b = Board::initial();
        b.apply(Move::normal(sq("e2"), sq("e4"))).unwrap();
        b.apply(Move::normal(sq("e7"), sq("e5"))).unwrap();
        b.apply(Move::normal(sq("g1"), sq("f3"))).unwrap();
        assert_eq!(b.history().len(), 3);
        assert_eq!(
            b.to_string(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"
        );
        b.undo();
        b.undo();
        b.undo();
        assert_eq!(b, Board::initial());
        assert_eq!(b.try_undo(), Err(HistoryError::Empty));
    }

    #[test]
    #[should_panic]
    fn test_undo_empty() {
        let mut b = Board::initial();
        b.undo();
    }

    #[test]
    fn test_apply_errors() {
        let mut b = Board::initial();
        assert_eq!(
            b.apply(Move::normal(sq("e4"), sq("e5"))),
            Err(MoveError::EmptySource(sq("e4")))
        );
        let mv = Move::normal(sq("e2"), sq("e5"));
        assert_eq!(b.apply(mv), Err(MoveError::NotLegal(mv)));
        let mv = Move::new(MoveKind::PromoteToQueen, sq("e2"), sq("e3"));
        assert_eq!(b.apply(mv), Err(MoveError::NotLegal(mv)));
        assert_eq!(b, Board::initial());
    }

    #[test]
    fn test_check() {
        let b = Board::from_placement("4k3/8/8/8/8/8/3p4/4K3").unwrap();
        assert!(b.is_in_check(Side::White));
        assert!(!b.is_in_check(Side::Black));

        let b = Board::from_placement("4k3/8/8/8/8/8/4p3/4K3").unwrap();
        assert!(!b.is_in_check(Side::White));
        assert_eq!(b.king_pos(Side::White), sq("e1"));
    }

    #[test]
    fn test_castling() {
        let mut b = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        assert_eq!(b.castling_rights(), CastlingRights::FULL);
        let moves = b.legal_moves(sq("e1"), Side::White);
        let kingside = Move::from_castling(Side::White, CastlingSide::King);
        let queenside = Move::from_castling(Side::White, CastlingSide::Queen);
        assert!(moves.contains(&kingside));
        assert!(moves.contains(&queenside));

        b.apply(kingside).unwrap();
        assert_eq!(b.to_string(), "r3k2r/8/8/8/8/8/8/R4RK1");
        b.apply(Move::from_castling(Side::Black, CastlingSide::Queen))
            .unwrap();
        assert_eq!(b.to_string(), "2kr3r/8/8/8/8/8/8/R4RK1");
        b.undo();
        b.undo();

        // King walks away and back: no castling anymore
        b.apply(Move::normal(sq("e1"), sq("f1"))).unwrap();
        b.apply(Move::normal(sq("f1"), sq("e1"))).unwrap();
        assert_eq!(b.to_string(), "r3k2r/8/8/8/8/8/8/R3K2R");
        assert!(!b.castle_possible(Side::White, CastlingSide::King));
        assert!(!b.castle_possible(Side::White, CastlingSide::Queen));
        assert!(b.castle_possible(Side::Black, CastlingSide::King));
        assert_eq!(b.apply(kingside), Err(MoveError::NotLegal(kingside)));
    }

    #[test]
    fn test_castling_into_check() {
        // Rook on g8 attacks g1, the destination of the white king
        let b = Board::from_placement("4k1r1/8/8/8/8/8/8/4K2R")
            .unwrap()
            .with_rules(Rules::MINIMAL);
        assert!(b.castle_possible(Side::White, CastlingSide::King));
        let kingside = Move::from_castling(Side::White, CastlingSide::King);
        assert!(b.pseudo_legal_moves(sq("e1"), Side::White).contains(&kingside));
        assert!(!b.legal_moves(sq("e1"), Side::White).contains(&kingside));
    }

    #[test]
    fn test_castling_path() {
        // Rook on f8 attacks f1, the square crossed by the white king
        let b = Board::from_placement("4kr2/8/8/8/8/8/8/4K2R").unwrap();
        let kingside = Move::from_castling(Side::White, CastlingSide::King);
        assert!(!b.legal_moves(sq("e1"), Side::White).contains(&kingside));

        let b = b.with_rules(Rules::MINIMAL);
        assert!(b.legal_moves(sq("e1"), Side::White).contains(&kingside));
    }

    #[test]
    fn test_enpassant() {
        let mut b = Board::from_placement("4k3/8/8/8/5p2/8/4P3/4K3").unwrap();
        b.apply(Move::normal(sq("e2"), sq("e4"))).unwrap();
        let ep = Move::new(MoveKind::EnPassant, sq("f4"), sq("e3"));
        assert_eq!(b.find_legal(Side::Black, sq("f4"), sq("e3")), Some(ep));
        b.apply(ep).unwrap();
        assert_eq!(b.to_string(), "4k3/8/8/8/8/4p3/8/4K3");
        b.undo();
        assert_eq!(b.to_string(), "4k3/8/8/8/4Pp2/8/8/4K3");
    }

    #[test]
    fn test_promotion() {
        let mut b = Board::from_placement("4k3/8/8/8/8/8/p7/4K3").unwrap();
        assert_eq!(
            b.find_legal(Side::Black, sq("a2"), sq("a1")),
            Some(Move::new(MoveKind::PromoteToQueen, sq("a2"), sq("a1")))
        );
        b.apply(Move::new(MoveKind::PromoteToKnight, sq("a2"), sq("a1")))
            .unwrap();
        assert_eq!(
            b.get(sq("a1")),
            Piece::from_parts(Side::Black, PieceKind::Knight)
        );

        let mut b = Board::from_placement("4k3/8/8/8/8/8/p7/4K3")
            .unwrap()
            .with_rules(Rules::MINIMAL);
        let mv = Move::new(MoveKind::PromoteToKnight, sq("a2"), sq("a1"));
        assert_eq!(b.apply(mv), Err(MoveError::NotLegal(mv)));
    }

    #[test]
    fn test_random_playouts() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let mut b = Board::initial();
            let mut side = Side::White;
            let mut grids = vec![*b.grid()];
            for _ in 0..80 {
                let moves = b.all_legal_moves(side);
                if moves.is_empty() {
                    break;
                }
                let mv = moves[rng.gen_range(0..moves.len())];
                assert_eq!(b.get(mv.src()).side(), Some(side));
                b.apply(mv).unwrap();
                assert!(!b.is_in_check(side));
                grids.push(*b.grid());
                side = side.opponent();
            }
            assert_eq!(b.history(), &grids[..grids.len() - 1]);
            while let Some(grid) = grids.pop() {
                assert_eq!(b.grid(), &grid);
                if grids.is_empty() {
                    break;
                }
                b.undo();
            }
            assert_eq!(b, Board::initial());
        }
    }
}
