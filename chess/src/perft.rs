//! Move path enumeration
//!
//! Perft counts the leaf nodes of the full game tree of the given depth. It is mostly useful to
//! check the move generator against the well-known numbers.

use crate::board::Board;
use crate::moves::Move;
use crate::types::Side;

/// Counts the leaf nodes of the game tree of depth `depth`, where `side` moves first
pub fn perft(b: &mut Board, side: Side, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = b.all_legal_moves(side);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut res = 0;
    for mv in moves {
        b.apply_unchecked(mv);
        res += perft(b, side.opponent(), depth - 1);
        b.undo();
    }
    res
}

/// Same as [`perft()`], but returns the counts for each move of `side` separately
pub fn divide(b: &mut Board, side: Side, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = b.all_legal_moves(side);
    let mut res = Vec::with_capacity(moves.len());
    for mv in moves {
        b.apply_unchecked(mv);
        res.push((mv, perft(b, side.opponent(), depth - 1)));
        b.undo();
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R";

    #[test]
    fn test_initial() {
        let mut b = Board::initial();
        assert_eq!(perft(&mut b, Side::White, 0), 1);
        assert_eq!(perft(&mut b, Side::White, 1), 20);
        assert_eq!(perft(&mut b, Side::White, 2), 400);
        assert_eq!(perft(&mut b, Side::White, 3), 8902);
        assert_eq!(b, Board::initial());
    }

    #[test]
    fn test_kiwipete() {
        let mut b = Board::from_placement(KIWIPETE).unwrap();
        assert_eq!(perft(&mut b, Side::White, 1), 48);
        assert_eq!(perft(&mut b, Side::White, 2), 2039);
        assert!(b.history().is_empty());
    }

    #[test]
    fn test_divide() {
        let mut b = Board::initial();
        let res = divide(&mut b, Side::White, 2);
        assert_eq!(res.len(), 20);
        assert!(res.iter().all(|&(_, count)| count == 20));
        assert_eq!(res.iter().map(|&(_, count)| count).sum::<u64>(), 400);
    }
}
