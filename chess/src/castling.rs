//! Castling geometry and castling rights
//!
//! Castling rights are not stored anywhere. Instead, they are derived from the board history: a
//! side may castle towards some corner only if its king and the rook in that corner stood on
//! their home squares in the current grid and in every grid of the history.

use crate::board::Board;
use crate::geometry;
use crate::movegen;
use crate::types::{CastlingRights, CastlingSide, File, Piece, PieceKind, Rank, Side, Square};

/// Squares involved in castling for one side and one corner
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    pub king_src: Square,
    pub king_dst: Square,
    pub rook_src: Square,
    pub rook_dst: Square,
    /// Square the king crosses on its way
    pub transit: Square,
}

impl Layout {
    pub const fn new(side: Side, castling: CastlingSide) -> Layout {
        let rank = geometry::home_rank(side);
        let (king_dst, rook_src, rook_dst) = match castling {
            CastlingSide::King => (File::G, File::H, File::F),
            CastlingSide::Queen => (File::C, File::A, File::D),
        };
        Layout {
            king_src: Square::from_parts(File::E, rank),
            king_dst: Square::from_parts(king_dst, rank),
            rook_src: Square::from_parts(rook_src, rank),
            rook_dst: Square::from_parts(rook_dst, rank),
            transit: Square::from_parts(rook_dst, rank),
        }
    }

    #[inline]
    fn rank(&self) -> Rank {
        self.king_src.rank()
    }

    /// Squares strictly between the king and the rook
    ///
    /// They must all be empty for castling to be possible.
    pub fn between(&self) -> impl Iterator<Item = Square> {
        let (lo, hi) = self.file_bounds();
        let rank = self.rank();
        (lo + 1..hi).map(move |f| Square::from_parts(File::from_index(f), rank))
    }

    /// Squares from the king to the rook inclusive
    ///
    /// Castling rewrites all of them.
    pub fn span(&self) -> impl Iterator<Item = Square> {
        let (lo, hi) = self.file_bounds();
        let rank = self.rank();
        (lo..=hi).map(move |f| Square::from_parts(File::from_index(f), rank))
    }

    fn file_bounds(&self) -> (usize, usize) {
        let (a, b) = (self.king_src.file().index(), self.rook_src.file().index());
        (a.min(b), a.max(b))
    }
}

fn corner_untouched(b: &Board, side: Side, castling: CastlingSide) -> bool {
    let layout = Layout::new(side, castling);
    let king = Piece::from_parts(side, PieceKind::King);
    let rook = Piece::from_parts(side, PieceKind::Rook);
    std::iter::once(b.grid())
        .chain(b.history().iter())
        .all(|g| g.get(layout.king_src) == king && g.get(layout.rook_src) == rook)
}

/// Derives castling rights from the current grid and the history of `b`
///
/// Rights only reflect whether the king and the rook have ever moved (or the rook was
/// captured). They do not guarantee that castling is possible right now: use [`is_possible()`]
/// for that.
pub fn rights(b: &Board) -> CastlingRights {
    let mut res = CastlingRights::EMPTY;
    for side in [Side::White, Side::Black] {
        for castling in [CastlingSide::King, CastlingSide::Queen] {
            if corner_untouched(b, side, castling) {
                res.set(side, castling);
            }
        }
    }
    res
}

/// Returns `true` if `side` can castle towards `castling` in `b` right now
///
/// Castling is possible if the corresponding rights are present, the squares between the king
/// and the rook are empty and the king is not in check. If [`Rules::castling_path_check`] is
/// enabled, the square crossed by the king must not be attacked as well. Attacks on the
/// destination square of the king are handled by the legality filter, as for any other move.
///
/// [`Rules::castling_path_check`]: crate::Rules::castling_path_check
pub fn is_possible(b: &Board, side: Side, castling: CastlingSide) -> bool {
    if !corner_untouched(b, side, castling) {
        return false;
    }
    let layout = Layout::new(side, castling);
    if layout.between().any(|sq| b.get(sq).is_occupied()) {
        return false;
    }
    if b.is_in_check(side) {
        return false;
    }
    if b.rules().castling_path_check {
        let mut scratch = *b.grid();
        scratch.put(layout.transit, scratch.get(layout.king_src));
        scratch.put(layout.king_src, Piece::EMPTY);
        if movegen::is_king_attacked(&scratch, side).unwrap_or(true) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;
    use crate::Rules;
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    #[test]
    fn test_layout() {
        let l = Layout::new(Side::White, CastlingSide::King);
        assert_eq!(l.king_src, sq("e1"));
        assert_eq!(l.king_dst, sq("g1"));
        assert_eq!(l.rook_src, sq("h1"));
        assert_eq!(l.rook_dst, sq("f1"));
        assert_eq!(l.transit, sq("f1"));
        assert_eq!(l.between().collect::<Vec<_>>(), vec![sq("f1"), sq("g1")]);
        assert_eq!(l.span().count(), 4);

        let l = Layout::new(Side::Black, CastlingSide::Queen);
        assert_eq!(l.king_dst, sq("c8"));
        assert_eq!(l.rook_src, sq("a8"));
        assert_eq!(l.transit, sq("d8"));
        assert_eq!(
            l.between().collect::<Vec<_>>(),
            vec![sq("b8"), sq("c8"), sq("d8")]
        );
        assert_eq!(l.span().count(), 5);
    }

    #[test]
    fn test_rights_from_history() {
        let mut b = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        assert_eq!(rights(&b), CastlingRights::FULL);

        b.apply(Move::normal(sq("h1"), sq("h2"))).unwrap();
        b.apply(Move::normal(sq("h2"), sq("h1"))).unwrap();
        let r = rights(&b);
        assert!(!r.has(Side::White, CastlingSide::King));
        assert!(r.has(Side::White, CastlingSide::Queen));
        assert!(r.has(Side::Black, CastlingSide::King));

        b.apply(Move::normal(sq("e8"), sq("d8"))).unwrap();
        let r = rights(&b);
        assert!(!r.has(Side::Black, CastlingSide::King));
        assert!(!r.has(Side::Black, CastlingSide::Queen));

        b.undo();
        b.undo();
        b.undo();
        assert_eq!(rights(&b), CastlingRights::FULL);
    }

    #[test]
    fn test_rook_captured() {
        let mut b = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K1NR").unwrap();
        let before = rights(&b);
        assert!(before.has(Side::Black, CastlingSide::King));
        b.apply(Move::normal(sq("h1"), sq("h8"))).unwrap();
        assert!(!rights(&b).has(Side::Black, CastlingSide::King));
        assert!(!rights(&b).has(Side::White, CastlingSide::King));
    }

    #[test]
    fn test_is_possible() {
        let b = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        assert!(is_possible(&b, Side::White, CastlingSide::King));
        assert!(is_possible(&b, Side::White, CastlingSide::Queen));

        // Blocked by a knight
        let b = Board::from_placement("r3k2r/8/8/8/8/8/8/RN2K2R").unwrap();
        assert!(!is_possible(&b, Side::White, CastlingSide::Queen));
        assert!(is_possible(&b, Side::White, CastlingSide::King));

        // King in check
        let b = Board::from_placement("r3k2r/8/8/8/4r3/8/8/R3K2R").unwrap();
        assert!(!is_possible(&b, Side::White, CastlingSide::King));
        assert!(!is_possible(&b, Side::White, CastlingSide::Queen));
    }

    #[test]
    fn test_path_check() {
        // Bishop on c4 attacks f1, the square crossed by the white king
        let placement = "4k3/8/8/8/2b5/8/8/4K2R";
        let b = Board::from_placement(placement).unwrap();
        assert!(!is_possible(&b, Side::White, CastlingSide::King));

        let b = b.with_rules(Rules::MINIMAL);
        assert!(is_possible(&b, Side::White, CastlingSide::King));
    }
}
