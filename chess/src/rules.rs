//! Rule switches for move generation

/// Set of optional rules the move generator honors
///
/// [`Rules::STANDARD`] (also the [`Default`]) gives regular chess as far as the supported move
/// kinds go. [`Rules::MINIMAL`] turns every switch off: no en passant, no knight promotion, and
/// castling that only checks the king is not in check before moving.
///
/// # Example
///
/// ```
/// # use gridchess::Rules;
/// #
/// let rules = Rules::STANDARD.with_en_passant(false);
/// assert!(rules.castling_path_check);
/// assert!(!rules.en_passant);
/// assert_eq!(Rules::default(), Rules::STANDARD);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rules {
    /// Forbid castling when the square crossed by the king is attacked
    pub castling_path_check: bool,
    /// Generate en passant captures right after a double pawn step
    pub en_passant: bool,
    /// Generate promotion to knight alongside promotion to queen
    pub knight_promotion: bool,
}

impl Rules {
    pub const STANDARD: Rules = Rules {
        castling_path_check: true,
        en_passant: true,
        knight_promotion: true,
    };

    pub const MINIMAL: Rules = Rules {
        castling_path_check: false,
        en_passant: false,
        knight_promotion: false,
    };

    #[inline]
    pub const fn with_castling_path_check(mut self, on: bool) -> Rules {
        self.castling_path_check = on;
        self
    }

    #[inline]
    pub const fn with_en_passant(mut self, on: bool) -> Rules {
        self.en_passant = on;
        self
    }

    #[inline]
    pub const fn with_knight_promotion(mut self, on: bool) -> Rules {
        self.knight_promotion = on;
        self
    }
}

impl Default for Rules {
    #[inline]
    fn default() -> Rules {
        Rules::STANDARD
    }
}
