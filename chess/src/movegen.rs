//! Move generation
//!
//! All the generators here work square by square: they take a board, a source square and a side,
//! and produce the moves of the piece standing on that square. If the square is empty or holds a
//! piece of the other side, nothing is produced.
//!
//! Use [`legal()`] or [`all_legal()`] to obtain legal moves. Pseudo-legal moves (i.e. moves that
//! may leave the king of the moving side under attack) are available via [`pseudo_legal()`].

use crate::board::Board;
use crate::castling;
use crate::geometry::{self, Delta};
use crate::grid::{Grid, PositionError};
use crate::moves::{Move, MoveKind};
use crate::types::{CastlingSide, Piece, PieceKind, Side, Square};

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;
use log::trace;

/// Generation mode
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Generate all the moves, including castling and en passant
    Full,
    /// Generate only the moves that may capture something on an occupied square
    ///
    /// Castling and en passant are suppressed. This mode is used to detect attacks on the king,
    /// and castling itself depends on such detection.
    CheckTest,
}

trait MaybeMovePush {
    type Err;

    fn push(&mut self, m: Move) -> Result<(), Self::Err>;
}

/// Fixed-capacity list of moves
///
/// The capacity is large enough to hold all the moves of any single piece.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut MoveList {
    type Item = &'a mut Move;
    type IntoIter = slice::IterMut<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

/// Destination for the generated moves
pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl<const N: usize> MovePush for ArrayVec<Move, N> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl<T: MovePush> MaybeMovePush for T {
    type Err = Infallible;

    fn push(&mut self, m: Move) -> Result<(), Self::Err> {
        <Self as MovePush>::push(self, m);
        Ok(())
    }
}

/// Returns `true` if `mv` made on `grid` may capture a piece on its destination
///
/// Castling never captures, and pawns capture only diagonally.
fn is_attack_shaped(grid: &Grid, mv: Move) -> bool {
    if mv.kind().is_castling() {
        return false;
    }
    match grid.get(mv.src()).kind() {
        Some(PieceKind::Pawn) => mv.src().file() != mv.dst().file(),
        _ => true,
    }
}

/// Stops the generation as soon as some move attacks the king
struct KingHunter<'a> {
    grid: &'a Grid,
    king: Square,
}

impl MaybeMovePush for KingHunter<'_> {
    type Err = ();

    fn push(&mut self, mv: Move) -> Result<(), ()> {
        if mv.dst() == self.king && is_attack_shaped(self.grid, mv) {
            return Err(());
        }
        Ok(())
    }
}

struct ErrOnFirst;

impl MaybeMovePush for ErrOnFirst {
    type Err = ();

    fn push(&mut self, _mv: Move) -> Result<(), ()> {
        Err(())
    }
}

struct LegalFilter<'a, P> {
    grid: &'a Grid,
    side: Side,
    inner: &'a mut P,
}

impl<'a, P: MaybeMovePush> MaybeMovePush for LegalFilter<'a, P> {
    type Err = P::Err;

    fn push(&mut self, mv: Move) -> Result<(), Self::Err> {
        match leaves_king_safe(self.grid, self.side, mv) {
            true => self.inner.push(mv),
            false => {
                trace!("rejected {} for {:?}: king left under attack", mv, self.side);
                Ok(())
            }
        }
    }
}

fn leaves_king_safe(grid: &Grid, side: Side, mv: Move) -> bool {
    if grid.get(mv.dst()).kind() == Some(PieceKind::King) {
        return false;
    }
    let mut scratch = *grid;
    scratch.make(mv);
    !is_king_attacked(&scratch, side).unwrap_or(true)
}

#[inline]
fn owned_kind(piece: Piece, side: Side) -> Option<PieceKind> {
    if piece.side() == Some(side) {
        piece.kind()
    } else {
        None
    }
}

struct MoveGen<'a, P> {
    grid: &'a Grid,
    side: Side,
    knight_promotion: bool,
    dst: &'a mut P,
}

impl<'a, P: MaybeMovePush> MoveGen<'a, P> {
    fn new(grid: &'a Grid, side: Side, knight_promotion: bool, dst: &'a mut P) -> Self {
        MoveGen {
            grid,
            side,
            knight_promotion,
            dst,
        }
    }

    #[inline]
    fn add_move(&mut self, kind: MoveKind, src: Square, dst: Square) -> Result<(), P::Err> {
        self.dst.push(Move::new(kind, src, dst))
    }

    fn add_pawn_move(&mut self, src: Square, dst: Square) -> Result<(), P::Err> {
        if dst.rank() != geometry::promote_rank(self.side) {
            return self.add_move(MoveKind::Normal, src, dst);
        }
        self.add_move(MoveKind::PromoteToQueen, src, dst)?;
        if self.knight_promotion {
            self.add_move(MoveKind::PromoteToKnight, src, dst)?;
        }
        Ok(())
    }

    fn gen_steps(&mut self, src: Square, deltas: &[Delta]) -> Result<(), P::Err> {
        for &(df, dr) in deltas {
            if let Some(dst) = src.try_shift(df, dr) {
                if self.grid.get(dst).side() != Some(self.side) {
                    self.add_move(MoveKind::Normal, src, dst)?;
                }
            }
        }
        Ok(())
    }

    fn gen_rays(&mut self, src: Square, dirs: &[Delta]) -> Result<(), P::Err> {
        for &(df, dr) in dirs {
            let mut cur = src;
            while let Some(dst) = cur.try_shift(df, dr) {
                let piece = self.grid.get(dst);
                if piece.side() == Some(self.side) {
                    break;
                }
                self.add_move(MoveKind::Normal, src, dst)?;
                if piece.is_occupied() {
                    break;
                }
                cur = dst;
            }
        }
        Ok(())
    }

    fn gen_pawn(&mut self, src: Square) -> Result<(), P::Err> {
        let fwd = geometry::pawn_forward(self.side);
        if let Some(one) = src.try_shift(0, fwd) {
            if self.grid.get(one).is_empty() {
                self.add_pawn_move(src, one)?;
                if src.rank() == geometry::pawn_start_rank(self.side) {
                    if let Some(two) = one.try_shift(0, fwd) {
                        if self.grid.get(two).is_empty() {
                            self.add_move(MoveKind::Normal, src, two)?;
                        }
                    }
                }
            }
        }
        for df in [-1, 1] {
            if let Some(dst) = src.try_shift(df, fwd) {
                if self.grid.get(dst).side() == Some(self.side.opponent()) {
                    self.add_pawn_move(src, dst)?;
                }
            }
        }
        Ok(())
    }

    /// Generates en passant captures, given `prev` is the grid right before the last move
    fn gen_pawn_enpassant(&mut self, src: Square, prev: &Grid) -> Result<(), P::Err> {
        if src.rank() != geometry::enpassant_src_rank(self.side) {
            return Ok(());
        }
        let fwd = geometry::pawn_forward(self.side);
        let enemy_pawn = Piece::from_parts(self.side.opponent(), PieceKind::Pawn);
        for df in [-1, 1] {
            let (victim, target, origin) = match (
                src.try_shift(df, 0),
                src.try_shift(df, fwd),
                src.try_shift(df, 2 * fwd),
            ) {
                (Some(victim), Some(target), Some(origin)) => (victim, target, origin),
                _ => continue,
            };
            // The last move must be the double step from `origin` to `victim` over `target`
            let double_step = prev.get(origin) == enemy_pawn
                && prev.get(target).is_empty()
                && prev.get(victim).is_empty()
                && self.grid.get(origin).is_empty()
                && self.grid.get(target).is_empty()
                && self.grid.get(victim) == enemy_pawn;
            if double_step {
                self.add_move(MoveKind::EnPassant, src, target)?;
            }
        }
        Ok(())
    }

    fn gen_castling(&mut self, b: &Board) -> Result<(), P::Err> {
        for castling in [CastlingSide::King, CastlingSide::Queen] {
            if castling::is_possible(b, self.side, castling) {
                self.dst.push(Move::from_castling(self.side, castling))?;
            }
        }
        Ok(())
    }

    fn gen_piece(&mut self, src: Square, kind: PieceKind) -> Result<(), P::Err> {
        match kind {
            PieceKind::Pawn => self.gen_pawn(src),
            PieceKind::Knight => self.gen_steps(src, &geometry::KNIGHT_JUMPS),
            PieceKind::Bishop => self.gen_rays(src, &geometry::BISHOP_DIRS),
            PieceKind::Rook => self.gen_rays(src, &geometry::ROOK_DIRS),
            PieceKind::Queen => self.gen_rays(src, &geometry::QUEEN_DIRS),
            PieceKind::King => self.gen_steps(src, &geometry::KING_STEPS),
        }
    }
}

fn do_gen<P: MaybeMovePush>(
    b: &Board,
    src: Square,
    side: Side,
    mode: Mode,
    dst: &mut P,
) -> Result<(), P::Err> {
    let kind = match owned_kind(b.get(src), side) {
        Some(kind) => kind,
        None => return Ok(()),
    };
    let rules = b.rules();
    let mut gen = MoveGen::new(b.grid(), side, rules.knight_promotion, dst);
    gen.gen_piece(src, kind)?;
    if mode == Mode::Full {
        match kind {
            PieceKind::King => gen.gen_castling(b)?,
            PieceKind::Pawn if rules.en_passant => {
                if let Some(prev) = b.history().last() {
                    gen.gen_pawn_enpassant(src, prev)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Returns `true` if the king of side `side` is attacked on `grid`
///
/// Fails if `side` doesn't have exactly one king.
pub fn is_king_attacked(grid: &Grid, side: Side) -> Result<bool, PositionError> {
    let king = grid.king_pos(side)?;
    let enemy = side.opponent();
    let mut hunter = KingHunter { grid, king };
    for (src, piece) in grid.iter() {
        if let Some(kind) = owned_kind(piece, enemy) {
            // Promotion kinds do not matter for attack detection
            if MoveGen::new(grid, enemy, false, &mut hunter)
                .gen_piece(src, kind)
                .is_err()
            {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Generates pseudo-legal moves of the piece on `src` and puts them into `dst`
pub fn pseudo_legal_into<P: MovePush>(
    b: &Board,
    src: Square,
    side: Side,
    mode: Mode,
    dst: &mut P,
) {
    let _ = do_gen(b, src, side, mode, dst);
}

/// Returns pseudo-legal moves of the piece on `src`
pub fn pseudo_legal(b: &Board, src: Square, side: Side, mode: Mode) -> MoveList {
    let mut res = MoveList::new();
    pseudo_legal_into(b, src, side, mode, &mut res);
    res
}

/// Generates legal moves of the piece on `src` and puts them into `dst`
pub fn legal_into<P: MovePush>(b: &Board, src: Square, side: Side, dst: &mut P) {
    let mut p = LegalFilter {
        grid: b.grid(),
        side,
        inner: dst,
    };
    let _ = do_gen(b, src, side, Mode::Full, &mut p);
}

/// Returns legal moves of the piece on `src`
pub fn legal(b: &Board, src: Square, side: Side) -> MoveList {
    let mut res = MoveList::new();
    legal_into(b, src, side, &mut res);
    res
}

/// Generates legal moves of all the pieces of side `side` and puts them into `dst`
pub fn all_legal_into<P: MovePush>(b: &Board, side: Side, dst: &mut P) {
    for src in Square::iter() {
        legal_into(b, src, side, dst);
    }
}

/// Returns legal moves of all the pieces of side `side`
pub fn all_legal(b: &Board, side: Side) -> Vec<Move> {
    let mut res = Vec::new();
    all_legal_into(b, side, &mut res);
    res
}

/// Returns `true` if side `side` has at least one legal move
pub fn has_legal_moves(b: &Board, side: Side) -> bool {
    let mut err_on_first = ErrOnFirst;
    let mut p = LegalFilter {
        grid: b.grid(),
        side,
        inner: &mut err_on_first,
    };
    Square::iter().any(|src| do_gen(b, src, side, Mode::Full, &mut p).is_err())
}
