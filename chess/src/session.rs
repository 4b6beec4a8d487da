//! Game session with alternating moves

use crate::board::{Board, BoardParseError};
use crate::moves::{Move, MoveError};
use crate::oracle::{self, AskError, Oracle};
use crate::types::Side;

use log::debug;

/// Board together with the side to move and the moves played so far
///
/// Unlike [`Board`], the session enforces the order of moves: each move must be made by the
/// side to move, after which the other side gets the turn.
///
/// # Example
///
/// ```
/// # use gridchess::{Move, Session, Side, Square};
/// # use std::str::FromStr;
/// #
/// let mut s = Session::new_initial();
/// let sq = |s: &str| Square::from_str(s).unwrap();
///
/// s.push(Move::normal(sq("e2"), sq("e4"))).unwrap();
/// assert_eq!(s.side(), Side::Black);
/// assert!(s.push(Move::normal(sq("d2"), sq("d4"))).is_err());
///
/// assert_eq!(s.pop(), Some(Move::normal(sq("e2"), sq("e4"))));
/// assert_eq!(s.side(), Side::White);
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Session {
    board: Board,
    side: Side,
    stack: Vec<Move>,
}

impl Session {
    /// Creates a session from board `b` where side `side` moves first
    pub fn new(b: Board, side: Side) -> Session {
        Session {
            board: b,
            side,
            stack: Vec::new(),
        }
    }

    /// Creates a session from the initial position
    pub fn new_initial() -> Session {
        Session::new(Board::initial(), Side::White)
    }

    /// Creates a session from the piece placement part of FEN
    pub fn from_placement(placement: &str, side: Side) -> Result<Session, BoardParseError> {
        Ok(Session::new(Board::from_placement(placement)?, side))
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Returns the moves played so far, oldest first
    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.stack
    }

    /// Returns all the legal moves of the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.all_legal_moves(self.side)
    }

    /// Returns `true` if the side to move is in check
    pub fn is_check(&self) -> bool {
        self.board.is_in_check(self.side)
    }

    fn do_push(&mut self, mv: Move) {
        debug!("{:?} plays {}", self.side, mv);
        self.board.apply_unchecked(mv);
        self.stack.push(mv);
        self.side = self.side.opponent();
    }

    /// Plays the move `mv` for the side to move
    pub fn push(&mut self, mv: Move) -> Result<(), MoveError> {
        let found = self
            .board
            .get(mv.src())
            .side()
            .ok_or(MoveError::EmptySource(mv.src()))?;
        if found != self.side {
            return Err(MoveError::WrongSide {
                square: mv.src(),
                expected: self.side,
                found,
            });
        }
        if !self.board.legal_moves(mv.src(), self.side).contains(&mv) {
            return Err(MoveError::NotLegal(mv));
        }
        self.do_push(mv);
        Ok(())
    }

    /// Takes back the last move and returns it
    ///
    /// Returns `None` if no moves were played in this session.
    pub fn pop(&mut self) -> Option<Move> {
        let mv = self.stack.pop()?;
        self.board.undo();
        self.side = self.side.opponent();
        debug!("{:?} takes back {}", self.side, mv);
        Some(mv)
    }

    /// Asks `oracle` for a move of the side to move and plays it
    pub fn ask<O: Oracle>(&mut self, oracle: &mut O) -> Result<Move, AskError<O::Err>> {
        let mv = oracle::ask(oracle, &self.board, self.side)?;
        self.do_push(mv);
        Ok(mv)
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new_initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;
    use std::convert::Infallible;
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    struct Script(Vec<&'static str>);

    impl Oracle for Script {
        type Err = Infallible;

        fn select(&mut self, _request: &str) -> Result<String, Infallible> {
            Ok(self.0.remove(0).to_string())
        }
    }

    #[test]
    fn test_push_pop() {
        let mut s = Session::new_initial();
        assert!(s.is_empty());
        assert_eq!(s.legal_moves().len(), 20);

        s.push(Move::normal(sq("e2"), sq("e4"))).unwrap();
        s.push(Move::normal(sq("e7"), sq("e5"))).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.side(), Side::White);
        assert_eq!(
            s.moves(),
            [
                Move::normal(sq("e2"), sq("e4")),
                Move::normal(sq("e7"), sq("e5"))
            ]
        );

        assert_eq!(
            s.push(Move::normal(sq("d7"), sq("d5"))),
            Err(MoveError::WrongSide {
                square: sq("d7"),
                expected: Side::White,
                found: Side::Black,
            })
        );
        assert_eq!(
            s.push(Move::normal(sq("d3"), sq("d4"))),
            Err(MoveError::EmptySource(sq("d3")))
        );

        assert_eq!(s.pop(), Some(Move::normal(sq("e7"), sq("e5"))));
        assert_eq!(s.pop(), Some(Move::normal(sq("e2"), sq("e4"))));
        assert_eq!(s.pop(), None);
        assert_eq!(s, Session::new_initial());
    }

    #[test]
    fn test_check() {
        let mut s = Session::new_initial();
        for (src, dst) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4")] {
            s.push(Move::normal(sq(src), sq(dst))).unwrap();
        }
        assert!(!s.is_check());
        s.push(Move::normal(sq("d8"), sq("h4"))).unwrap();
        assert!(s.is_check());
        assert!(s.legal_moves().is_empty());
    }

    #[test]
    fn test_ask() {
        let mut s = Session::new_initial();
        let mut oracle = Script(vec!["1434", "1434", "0000"]);
        assert_eq!(s.ask(&mut oracle).unwrap(), Move::normal(sq("e2"), sq("e4")));
        assert_eq!(s.ask(&mut oracle).unwrap(), Move::normal(sq("e7"), sq("e5")));
        assert!(matches!(
            s.ask(&mut oracle),
            Err(AskError::Illegal { .. })
        ));
        assert_eq!(s.len(), 2);
        assert_eq!(s.side(), Side::White);
    }
}
