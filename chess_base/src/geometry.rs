use crate::types::{Rank, Side};

/// Direction as `(file delta, rank delta)`
pub type Delta = (isize, isize);

pub const ROOK_DIRS: [Delta; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const BISHOP_DIRS: [Delta; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const QUEEN_DIRS: [Delta; 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const KING_STEPS: [Delta; 8] = QUEEN_DIRS;

pub const KNIGHT_JUMPS: [Delta; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const fn home_rank(s: Side) -> Rank {
    match s {
        Side::White => Rank::R1,
        Side::Black => Rank::R8,
    }
}

pub const fn pawn_start_rank(s: Side) -> Rank {
    match s {
        Side::White => Rank::R2,
        Side::Black => Rank::R7,
    }
}

pub const fn promote_rank(s: Side) -> Rank {
    home_rank(s.opponent())
}

/// Rank on which a pawn of side `s` stands when it can capture en passant
pub const fn enpassant_src_rank(s: Side) -> Rank {
    match s {
        Side::White => Rank::R5,
        Side::Black => Rank::R4,
    }
}

pub const fn pawn_forward(s: Side) -> isize {
    match s {
        Side::White => 1,
        Side::Black => -1,
    }
}
