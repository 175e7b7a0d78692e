//! Provides functions used to compute attacks and pawn origins
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1),
];

const DIAGONAL_RAYS: [(i8, i8); 4] = [ (1, 1), (1, -1), (-1, -1), (-1, 1) ];

const ORTHOGONAL_RAYS: [(i8, i8); 4] = [ (0, 1), (1, 0), (0, -1), (-1, 0) ];

fn steps(sq: Square, deltas: &[(i8, i8)]) -> Bitboard {
    deltas.iter()
        .filter_map(|&(x, y)| sq.offset(x, y))
        .collect()
}

fn rays(sq: Square, occ: Bitboard, directions: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::new();

    for &(x, y) in directions {
        let mut next = sq.offset(x, y);
        while let Some(target) = next {
            attacks.insert(target);
            if occ.contains(target) {
                break;
            }
            next = target.offset(x, y);
        }
    }

    attacks
}

/// Computes knight-like attacks to or from `sq`
pub fn knight_attacks(sq: Square) -> Bitboard {
    steps(sq, &KNIGHT_STEPS)
}

/// Computes king-like attacks to or from `sq`
pub fn king_attacks(sq: Square) -> Bitboard {
    steps(sq, &KING_STEPS)
}

/// Computes bishop-like attacks to or from `sq` based on the occupied squares
/// given by `occ`
///
/// Each ray stops at, and includes, the first occupied square.
pub fn bishop_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    rays(sq, occ, &DIAGONAL_RAYS)
}

/// Computes rook-like attacks to or from `sq` based on the occupied squares
/// given by `occ`
pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    rays(sq, occ, &ORTHOGONAL_RAYS)
}

/// Computes queen-like attacks to or from `sq` based on the occupied squares
/// given by `occ`
#[inline]
pub fn queen_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    rook_attacks(sq, occ) | bishop_attacks(sq, occ)
}

/// Returns the squares from which a pawn of color `c` could advance, without capturing, to `dest`.
///
/// A two-square advance is only possible from the pawn's initial rank, and only if the square
/// passed over is empty.
///
/// ```rust
/// use cps::chess::{Color, Square};
/// use cps::chess::bitboard::{Bitboard, pawn_pushes_to};
///
/// let origins = pawn_pushes_to(Square::E4, Color::White, Bitboard::new());
/// assert_eq!(origins, Bitboard::from(Square::E3) | Square::E2.into());
///
/// let blocked = Bitboard::from(Square::E3);
/// assert_eq!(pawn_pushes_to(Square::E4, Color::White, blocked), Bitboard::from(Square::E3));
/// ```
pub fn pawn_pushes_to(dest: Square, c: Color, occ: Bitboard) -> Bitboard {
    let back = -c.forward();
    let initial = if c == Color::White { Rank::R2 } else { Rank::R7 };

    let mut origins = Bitboard::new();
    if let Some(one) = dest.offset(0, back) {
        origins.insert(one);
        if !occ.contains(one) {
            if let Some(two) = one.offset(0, back) {
                if two.rank() == initial {
                    origins.insert(two);
                }
            }
        }
    }

    origins
}

/// Returns the squares from which a pawn of color `c` could capture on `dest`.
pub fn pawn_attacks_to(dest: Square, c: Color) -> Bitboard {
    let back = -c.forward();

    Bitboard::from(dest).shift_xy(-1, back) | Bitboard::from(dest).shift_xy(1, back)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_attacks_from_corner_and_center() {
        assert_eq!(knight_attacks(Square::A1), Bitboard::from(Square::B3) | Square::C2.into());
        assert_eq!(knight_attacks(Square::E4).len(), 8);
        assert!(knight_attacks(Square::G1).contains(Square::F3));
    }

    #[test]
    fn king_attacks_from_edge() {
        let attacks = king_attacks(Square::E1);
        assert_eq!(attacks.len(), 5);
        assert!(attacks.contains(Square::D2));
        assert!(!attacks.contains(Square::E3));
    }

    #[test]
    fn sliders_stop_at_first_blocker() {
        let occ = Bitboard::from(Square::C3) | Square::E6.into();
        let attacks = bishop_attacks(Square::A1, occ);
        assert_eq!(attacks, Bitboard::from(Square::B2) | Square::C3.into());

        let attacks = rook_attacks(Square::E1, occ);
        assert!(attacks.contains(Square::E6));
        assert!(!attacks.contains(Square::E7));
        assert!(attacks.contains(Square::A1));
        assert!(attacks.contains(Square::H1));

        assert_eq!(queen_attacks(Square::D4, Bitboard::new()).len(), 27);
    }

    #[test]
    fn black_pawn_pushes() {
        let origins = pawn_pushes_to(Square::D5, Color::Black, Bitboard::new());
        assert_eq!(origins, Bitboard::from(Square::D6) | Square::D7.into());

        let origins = pawn_pushes_to(Square::D4, Color::Black, Bitboard::new());
        assert_eq!(origins, Bitboard::from(Square::D5));
    }

    #[test]
    fn pawn_captures_come_from_adjacent_files() {
        assert_eq!(
            pawn_attacks_to(Square::D5, Color::White),
            Bitboard::from(Square::C4) | Square::E4.into()
        );
        assert_eq!(pawn_attacks_to(Square::A6, Color::Black), Bitboard::from(Square::B7));
    }
}
