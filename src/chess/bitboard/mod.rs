//! Provides a representation of sets of squares on the board
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! # Planes
//! A [`Position`](../struct.Position.html) is stored as eight bitboards, called planes: one per
//! color and one per piece type. A square's occupant is found by intersecting a color plane with a
//! piece-type plane.
//!
//! ```rust
//! use cps::chess::{Position, Plane, Square};
//!
//! let pos = Position::new();
//! let white_knights = pos.plane(Plane::White) & pos.plane(Plane::Knight);
//! assert!(white_knights.contains(Square::B1));
//! assert!(white_knights.contains(Square::G1));
//! assert_eq!(white_knights.len(), 2);
//! ```
//!
//! # Reachability
//! The functions in this module compute which squares a piece could come from to reach a given
//! square. They are only used to tell apart several pieces of the same type that could have made a
//! move. For knights and kings the attack sets are symmetric, so the squares attacked *from* the
//! destination are exactly the squares a piece could come *from*.
//!
//! ```rust
//! use cps::chess::Square;
//! use cps::chess::bitboard::knight_attacks;
//!
//! let mut attacks = knight_attacks(Square::H1);
//! assert_eq!(attacks.pop(), Some(Square::F2));
//! assert_eq!(attacks.pop(), Some(Square::G3));
//! assert_eq!(attacks.pop(), None);
//! ```
//!
//! Sliding pieces can be blocked, so their functions also take a `Bitboard` of occupied squares.
//!
//! ```rust
//! use cps::chess::Square;
//! use cps::chess::bitboard::{Bitboard, rook_attacks};
//!
//! let occ = Bitboard::from(Square::A2) | Square::C1.into();
//! let mut attacks = rook_attacks(Square::A1, occ);
//! assert_eq!(attacks.pop(), Some(Square::B1));
//! assert_eq!(attacks.pop(), Some(Square::C1));
//! assert_eq!(attacks.pop(), Some(Square::A2));
//! assert_eq!(attacks.pop(), None);
//! ```
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::{TryFrom, TryInto};
use std::iter::FusedIterator;
use std::iter::{FromIterator, Extend};
use std::ops;
use std::fmt;
use super::*;

mod attacks;
pub use attacks::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of squares with each bit representing one square
///
/// A `Bitboard` is, essentially, a set of [`Square`](../enum.Square.html)s stored in a 64-bit
/// integer. Each bit corresponds to one `Square`. If the bit is set, that `Square` is present. If
/// it is clear, the `Square` is not present. The diagram below shows the layout of the bits.
///
/// ```text
///     a    b    c    d    e    f    g    h
///    ---------------------------------------
/// 8 | 56 | 57 | 58 | 59 | 60 | 61 | 62 | 63 | 8
///    ---------------------------------------
/// 7 | 48 | 49 | 50 | 51 | 52 | 53 | 54 | 55 | 7
///    ---------------------------------------
/// 6 | 40 | 41 | 42 | 43 | 44 | 45 | 46 | 47 | 6
///    ---------------------------------------
/// 5 | 32 | 33 | 34 | 35 | 36 | 37 | 38 | 39 | 5
///    ---------------------------------------
/// 4 | 24 | 25 | 26 | 27 | 28 | 29 | 30 | 31 | 4
///    ---------------------------------------
/// 3 | 16 | 17 | 18 | 19 | 20 | 21 | 22 | 23 | 3
///    ---------------------------------------
/// 2 | 08 | 09 | 10 | 11 | 12 | 13 | 14 | 15 | 2
///    ---------------------------------------
/// 1 | 00 | 01 | 02 | 03 | 04 | 05 | 06 | 07 | 1
///    ---------------------------------------
///     a    b    c    d    e    f    g    h
/// ```
///
/// `Bitboard` implements all the bit-wise logic operators: `|`, `&`, `^`, `!`, `|=`, `&=`, and
/// `^=`. It also has methods that are typical for sets and collections, such as `insert`, `remove`,
/// `len`, and `contains`. It implements IntoIterator. However, since it's only a 64-bit value, it
/// implement's `Copy`, and there's no need for the borrowing iterator methods `iter` and
/// `iter_mut`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    /// Creates a new, empty bitboard
    pub fn new() -> Bitboard {
        Default::default()
    }

    /// Returns the raw 64-bit value
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Returns the number of squares in the bitboard
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the bitboard is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the bitboard contains `sq`
    pub fn contains(self, sq: Square) -> bool {
        !(self & sq.into()).is_empty()
    }

    /// Returns `true` if `self` intersects `other`
    pub fn intersects(self, other: Bitboard) -> bool {
        !(self & other).is_empty()
    }

    /// Returns `true` if `self` does not intersect `other`
    pub fn is_disjoint(self, other: Bitboard) -> bool {
        (self & other).is_empty()
    }

    /// Adds a square to the bitboard if it is not already present
    pub fn insert(&mut self, sq: Square) {
        *self |= sq.into();
    }

    /// Removes a square from the bitboard if it is present
    pub fn remove(&mut self, sq: Square) {
        *self &= !Bitboard::from(sq);
    }

    /// Toggles a square in the bitboard
    pub fn toggle(&mut self, sq: Square) {
        *self ^= sq.into();
    }

    /// Removes the lowest square from the bitboard and returns it
    pub fn pop(&mut self) -> Option<Square> {
        if self.0 > 0 {
            // get the least significant bit
            let sq: Square = (self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE");
            // clear the least significant bit
            self.0 &= self.0 - 1;

            Some(sq)
        } else {
            None
        }
    }

    /// Returns the square that would be removed by a pop command
    pub fn peek(self) -> Option<Square> {
        if self.0 > 0 {
            Some((self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE"))
        } else {
            None
        }
    }

    /// Returns the only square in the bitboard, or `None` if it holds zero or several squares
    pub fn single(self) -> Option<Square> {
        if self.len() == 1 {
            self.peek()
        } else {
            None
        }
    }

    /// Returns a bitboard with all squares shifted by `x` files and `y` ranks.
    ///
    /// Squares shifted off any edge of the board are dropped; nothing wraps.
    ///
    /// ```rust
    /// # use cps::chess::Square;
    /// # use cps::chess::bitboard::Bitboard;
    /// #
    /// let pawns = Bitboard::from(Square::A2) | Square::H7.into();
    /// assert_eq!(pawns.shift_xy(1, 1), Bitboard::from(Square::B3));
    /// assert_eq!(pawns.shift_xy(-1, -1), Bitboard::from(Square::G6));
    /// ```
    pub fn shift_xy(self, x: i8, y: i8) -> Bitboard {
        let mut keep = 0u64;
        for f in 0..File::COUNT as i8 {
            if (0..File::COUNT as i8).contains(&(f + x)) {
                keep |= Bitboard::from(File::try_from(f as usize).expect("INFALLIBLE")).0;
            }
        }

        let bits = 8 * y as i32 + x as i32;
        let masked = self.0 & keep;

        if bits >= 0 {
            Bitboard(masked.checked_shl(bits as u32).unwrap_or(0))
        } else {
            Bitboard(masked.checked_shr(-bits as u32).unwrap_or(0))
        }
    }

    /// Returns a bitboard with all squares shifted by `y` ranks
    pub fn shift_y(self, y: i8) -> Bitboard {
        self.shift_xy(0, y)
    }

    /// Returns a bitboard with all squares shifted by `x` files
    pub fn shift_x(self, x: i8) -> Bitboard {
        self.shift_xy(x, 0)
    }
}

impl ops::Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl ops::BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl ops::BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl ops::BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Binary for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

impl From<u64> for Bitboard {
    fn from(val: u64) -> Bitboard {
        Bitboard(val)
    }
}

impl From<Bitboard> for u64 {
    fn from(bb: Bitboard) -> u64 {
        bb.0
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard(1 << sq as u64)
    }
}

impl From<File> for Bitboard {
    fn from(f: File) -> Bitboard {
        Bitboard(0x0101_0101_0101_0101 << f as u64)
    }
}

impl From<Rank> for Bitboard {
    fn from(r: Rank) -> Bitboard {
        Bitboard(0x0000_0000_0000_00ff << (8 * r as u64))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item=Square>>(iter: I) -> Self {
        let mut bd = Bitboard::new();

        for sq in iter {
            bd.insert(sq);
        }

        bd
    }
}

impl Extend<Square> for Bitboard {
    fn extend<I: IntoIterator<Item=Square>>(&mut self, iter: I) {
        for sq in iter {
            self.insert(sq);
        }
    }
}

/// Iterator over the squares of a `Bitboard`, from `A1` toward `H8`
#[derive(Debug, Copy, Clone)]
pub struct IntoIter(Bitboard);

impl Iterator for IntoIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl ExactSizeIterator for IntoIter { }

impl FusedIterator for IntoIter { }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitboard() {
        // test new() method and Default trait
        assert_eq!(Bitboard::new(), Bitboard(0));
        assert_eq!(Bitboard::new(), Default::default());

        // test len() and is_empty() methods
        assert_eq!(Bitboard::new().len(), 0);
        assert!(Bitboard::new().is_empty());
        assert_eq!(Bitboard(0xffffffffffffffff).len(), 64);
        assert!(!Bitboard(0xffffffffffffffff).is_empty());

        // test contains() method
        assert!(Bitboard::from(Square::A1).contains(Square::A1));
        assert!(Bitboard::from(Square::H8).contains(Square::H8));
        assert!(!Bitboard::from(Square::A1).contains(Square::H8));

        // test formatting
        assert_eq!(format!("{}", Bitboard::from(0x0123456789abcdef)), "123456789abcdef");
        assert_eq!(format!("{:016x}", Bitboard::from(0x0123456789abcdef)), "0123456789abcdef");
        assert_eq!(format!("{:X}", Bitboard::from(0x0123456789ABCDEF)), "123456789ABCDEF");
    }

    #[test]
    fn squares_map_to_expected_bits() {
        assert_eq!(Bitboard::from(Square::A1).bits(), 1);
        assert_eq!(Bitboard::from(Square::H1).bits(), 0x80);
        assert_eq!(Bitboard::from(Square::H8).bits(), 0x8000_0000_0000_0000);
        assert_eq!(Bitboard::from(Rank::R2).bits(), 0x0000_0000_0000_ff00);
        assert_eq!(Bitboard::from(File::A).bits(), 0x0101_0101_0101_0101);
    }

    #[test]
    fn insert_remove_and_toggle() {
        let mut bb = Bitboard::new();
        bb.insert(Square::E4);
        bb.insert(Square::E4);
        assert_eq!(bb.len(), 1);
        bb.toggle(Square::D5);
        assert!(bb.contains(Square::D5));
        bb.toggle(Square::D5);
        assert!(!bb.contains(Square::D5));
        bb.remove(Square::E4);
        assert!(bb.is_empty());
    }

    #[test]
    fn single_requires_exactly_one_square() {
        assert_eq!(Bitboard::new().single(), None);
        assert_eq!(Bitboard::from(Square::C3).single(), Some(Square::C3));
        assert_eq!((Bitboard::from(Square::C3) | Square::C4.into()).single(), None);
    }

    #[test]
    fn shifts_do_not_wrap() {
        assert_eq!(Bitboard::from(Square::H4).shift_x(1), Bitboard::new());
        assert_eq!(Bitboard::from(Square::A4).shift_x(-1), Bitboard::new());
        assert_eq!(Bitboard::from(Square::E8).shift_y(1), Bitboard::new());
        assert_eq!(Bitboard::from(Square::E1).shift_y(-1), Bitboard::new());
        assert_eq!(Bitboard::from(Square::E2).shift_y(2), Bitboard::from(Square::E4));
        assert_eq!(Bitboard::from(Square::G1).shift_xy(-1, 2), Bitboard::from(Square::F3));
    }

    #[test]
    fn iterates_in_square_order() {
        let bb: Bitboard = vec![ Square::H8, Square::A1, Square::E4 ].into_iter().collect();
        let squares: Vec<_> = bb.into_iter().collect();
        assert_eq!(squares, vec![ Square::A1, Square::E4, Square::H8 ]);
    }
}
