//! Contains structures related to the `Position`.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use super::*;

use bitboard::*;

use Color::*;

mod apply;
mod builder;
mod fen;
pub use builder::PositionBuilder;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Index of one of the eight bitboards a `Position` is made of.
///
/// The first two are color planes (every piece of that color), the other six are piece-type
/// planes (every piece of that type, of either color).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Plane {
    White = 0,
    Black = 1,
    Pawn = 2,
    Knight = 3,
    Bishop = 4,
    Rook = 5,
    Queen = 6,
    King = 7,
}

impl Plane {
    /// The number of planes
    pub const COUNT: usize = Plane::King as usize + 1;
}

impl From<Color> for Plane {
    fn from(c: Color) -> Plane {
        match c {
            White => Plane::White,
            Black => Plane::Black,
        }
    }
}

impl From<Piece> for Plane {
    fn from(p: Piece) -> Plane {
        match p {
            Piece::Pawn => Plane::Pawn,
            Piece::Knight => Plane::Knight,
            Piece::Bishop => Plane::Bishop,
            Piece::Rook => Plane::Rook,
            Piece::Queen => Plane::Queen,
            Piece::King => Plane::King,
        }
    }
}

const PIECES: [Piece; Piece::COUNT] = [
    Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King,
];

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The four castling rights, one per side of the board for each color.
///
/// Once a right is gone it never comes back; there is no way to grant one on an existing value,
/// only to build a new value with it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    king_side: [bool; Color::COUNT],
    queen_side: [bool; Color::COUNT],
}

impl CastlingRights {
    /// All four rights, as in the starting position
    pub fn all() -> Self {
        CastlingRights {
            king_side: [true; Color::COUNT],
            queen_side: [true; Color::COUNT],
        }
    }

    /// No rights at all
    pub fn none() -> Self {
        Default::default()
    }

    /// Builds a set of rights from the four flags, in `KQkq` order
    pub fn new(white_king: bool, white_queen: bool, black_king: bool, black_queen: bool) -> Self {
        CastlingRights {
            king_side: [white_king, black_king],
            queen_side: [white_queen, black_queen],
        }
    }

    /// Returns `true` if `c` may still castle king-side
    pub fn king_side(self, c: Color) -> bool {
        self.king_side[c as usize]
    }

    /// Returns `true` if `c` may still castle queen-side
    pub fn queen_side(self, c: Color) -> bool {
        self.queen_side[c as usize]
    }

    /// Returns `true` if any right remains
    pub fn any(self) -> bool {
        self.king_side.iter().chain(self.queen_side.iter()).any(|&r| r)
    }

    /// Returns these rights with both of `c`'s rights revoked
    pub fn revoke(mut self, c: Color) -> Self {
        self.king_side[c as usize] = false;
        self.queen_side[c as usize] = false;
        self
    }

    /// Returns these rights with the right tied to the rook on `corner` revoked. Squares other
    /// than `c`'s two home corners leave the rights unchanged.
    pub fn revoke_corner(mut self, c: Color, corner: Square) -> Self {
        if corner.rank() == c.home_rank() {
            match corner.file() {
                File::A => self.queen_side[c as usize] = false,
                File::H => self.king_side[c as usize] = false,
                _ => {},
            }
        }
        self
    }
}

impl fmt::Display for CastlingRights {
    /// Formats the rights as a subset of `KQkq`, or `-` if there are none.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();

        for &c in &[White, Black] {
            if self.king_side(c) {
                s.push(Piece::King.symbol(c));
            }
            if self.queen_side(c) {
                s.push(Piece::Queen.symbol(c));
            }
        }
        if s.is_empty() {
            s.push('-');
        }

        s.fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Everything about a position that is not piece placement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Flags {
    /// The side to move
    pub turn: Color,
    /// Remaining castling rights
    pub castling: CastlingRights,
    /// The square passed over by a pawn that just advanced two squares. It is only ever set for
    /// the one ply right after that advance.
    pub en_passant: Option<Square>,
}

impl Flags {
    /// `White` to move, all castling rights, no en-passant target
    pub fn start() -> Self {
        Flags {
            turn: White,
            castling: CastlingRights::all(),
            en_passant: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A snapshot of the board: eight bitboard planes plus the side to move, castling rights and
/// en-passant target.
///
/// A `Position` never changes once built. [`apply`](#method.apply) returns the successor as a new
/// value and leaves `self` as it was.
///
/// # Instantiation
///  -  [`new`](#method.new) returns the standard starting position.
///  -  [`from_planes`](#method.from_planes) validates eight planes and a set of flags.
///  -  [`from_fen_str`](#method.from_fen_str) (along with `str::parse`) reads
///     [Forsyth-Edwards Notation (FEN)](https://en.wikipedia.org/wiki/Forsyth%E2%80%93Edwards_Notation).
///  -  A [`PositionBuilder`](struct.PositionBuilder.html).
///  -  As the result of [`apply`](#method.apply).
///
/// ```rust
/// use cps::chess::{Position, Piece, Color, Square};
///
/// let pos = Position::new().apply("e4")?.apply("e5")?.apply("Nf3")?;
/// assert_eq!(pos.piece_at(Square::F3), Some((Color::White, Piece::Knight)));
/// assert_eq!(pos.turn(), Color::Black);
/// # Ok::<(), cps::chess::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    planes: [Bitboard; Plane::COUNT],
    flags: Flags,
}

impl Position {
    /// Returns the standard starting Position.
    pub fn new() -> Position {
        Position {
            planes: [
                // white
                Bitboard::from(0x0000_0000_0000_ffffu64),
                // black
                Bitboard::from(0xffff_0000_0000_0000u64),
                // pawns
                Bitboard::from(0x00ff_0000_0000_ff00u64),
                // knights
                Bitboard::from(0x4200_0000_0000_0042u64),
                // bishops
                Bitboard::from(0x2400_0000_0000_0024u64),
                // rooks
                Bitboard::from(0x8100_0000_0000_0081u64),
                // queens
                Bitboard::from(0x0800_0000_0000_0008u64),
                // kings
                Bitboard::from(0x1000_0000_0000_0010u64),
            ],
            flags: Flags::start(),
        }
    }

    /// Builds a position from its eight planes and flags, checking that:
    ///
    ///  -  no square is in both color planes,
    ///  -  no square is in two piece-type planes,
    ///  -  every square in a color plane is in a piece-type plane, and the reverse,
    ///  -  an en-passant target, if any, is on the rank a pawn just passed over.
    pub fn from_planes(planes: [Bitboard; Plane::COUNT], flags: Flags) -> Result<Position> {
        let white = planes[Plane::White as usize];
        let black = planes[Plane::Black as usize];
        if white.intersects(black) {
            return Err(Error::InvalidPlanes);
        }

        let mut typed = Bitboard::new();
        for plane in &planes[Plane::Pawn as usize..] {
            if typed.intersects(*plane) {
                return Err(Error::InvalidPlanes);
            }
            typed |= *plane;
        }
        if typed != white | black {
            return Err(Error::InvalidPlanes);
        }

        if let Some(ep_square) = flags.en_passant {
            let ep_rank = if flags.turn == White { Rank::R6 } else { Rank::R3 };
            if ep_square.rank() != ep_rank || (white | black).contains(ep_square) {
                return Err(Error::InvalidPlanes);
            }
        }

        Ok(Position { planes, flags })
    }

    /// Returns one plane
    pub fn plane(&self, plane: Plane) -> Bitboard {
        self.planes[plane as usize]
    }

    /// Returns all eight planes, indexed by `Plane`
    pub fn planes(&self) -> [Bitboard; Plane::COUNT] {
        self.planes
    }

    /// Returns the flags
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Returns the side to move
    pub fn turn(&self) -> Color {
        self.flags.turn
    }

    /// Returns the remaining castling rights
    pub fn castling_rights(&self) -> CastlingRights {
        self.flags.castling
    }

    /// Returns the square a pawn can capture en passant on this ply, if any
    pub fn en_passant_square(&self) -> Option<Square> {
        self.flags.en_passant
    }

    /// Returns all occupied squares
    pub fn occupied(&self) -> Bitboard {
        self.plane(Plane::White) | self.plane(Plane::Black)
    }

    /// Returns the squares occupied by `c`
    pub fn occupied_by(&self, c: Color) -> Bitboard {
        self.plane(c.into())
    }

    /// Returns the squares occupied by pieces of color `c` and type `p`
    pub fn occupied_by_piece(&self, c: Color, p: Piece) -> Bitboard {
        self.plane(c.into()) & self.plane(p.into())
    }

    /// Returns the color and type of the piece on `sq`, if any
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let color = if self.plane(Plane::White).contains(sq) {
            White
        } else if self.plane(Plane::Black).contains(sq) {
            Black
        } else {
            return None;
        };

        PIECES.iter()
            .find(|&&p| self.plane(p.into()).contains(sq))
            .map(|&p| (color, p))
    }
}

impl Default for Position {
    /// Returns the standard starting position
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    /// Draws the board with rank 8 at the top, uppercase letters for `White` and lowercase for
    /// `Black`, followed by the side to move, castling rights and en-passant target.
    ///
    /// ```text
    ///     a b c d e f g h
    /// 8 | r n b q k b n r
    /// 7 | p p p p p p p p
    /// 6 | . . . . . . . .
    /// 5 | . . . . . . . .
    /// 4 | . . . . P . . .
    /// 3 | . . . . . . . .
    /// 2 | P P P P . P P P
    /// 1 | R N B Q K B N R
    /// turn: black
    /// castling: KQkq
    /// en passant: e3
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::from("    a b c d e f g h\n");

        for r in (0..Rank::COUNT).rev() {
            let rank = Rank::try_from(r).expect("INFALLIBLE");
            s += &format!("{} |", rank);

            for fl in 0..File::COUNT {
                let sq = Square::from_coord(File::try_from(fl).expect("INFALLIBLE"), rank);
                s.push(' ');
                s.push(match self.piece_at(sq) {
                    Some((color, piece)) => piece.symbol(color),
                    None => '.',
                });
            }
            s.push('\n');
        }

        s += &format!("turn: {:#}\n", self.flags.turn);
        s += &format!("castling: {}\n", self.flags.castling);
        match self.flags.en_passant {
            Some(sq) => s += &format!("en passant: {}", sq),
            None => s += "en passant: -",
        }

        s.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_returns_the_standard_starting_position() {
        let pos = Position::new();

        assert_eq!(pos.turn(), White);
        assert_eq!(pos.castling_rights(), CastlingRights::all());
        assert_eq!(pos.en_passant_square(), None);
        assert_eq!(pos.occupied().len(), 32);
        assert_eq!(pos.piece_at(Square::E1), Some((White, Piece::King)));
        assert_eq!(pos.piece_at(Square::D8), Some((Black, Piece::Queen)));
        assert_eq!(pos.piece_at(Square::B1), Some((White, Piece::Knight)));
        assert_eq!(pos.piece_at(Square::H7), Some((Black, Piece::Pawn)));
        assert_eq!(pos.piece_at(Square::E4), None);
        assert_eq!(pos.occupied_by_piece(White, Piece::Pawn), Bitboard::from(Rank::R2));
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn from_planes_accepts_the_start_position() -> Result<()> {
        let start = Position::new();
        let pos = Position::from_planes(start.planes(), start.flags())?;

        assert_eq!(pos, start);

        Ok(())
    }

    #[test]
    fn from_planes_rejects_overlapping_colors() {
        let mut planes = Position::new().planes();
        planes[Plane::Black as usize].insert(Square::E1);

        assert_eq!(Position::from_planes(planes, Flags::start()), Err(Error::InvalidPlanes));
    }

    #[test]
    fn from_planes_rejects_overlapping_piece_types() {
        let mut planes = Position::new().planes();
        planes[Plane::Queen as usize].insert(Square::E1);

        assert_eq!(Position::from_planes(planes, Flags::start()), Err(Error::InvalidPlanes));
    }

    #[test]
    fn from_planes_rejects_half_occupied_squares() {
        let mut planes = Position::new().planes();
        planes[Plane::White as usize].insert(Square::E4);
        assert_eq!(Position::from_planes(planes, Flags::start()), Err(Error::InvalidPlanes));

        let mut planes = Position::new().planes();
        planes[Plane::Knight as usize].insert(Square::E4);
        assert_eq!(Position::from_planes(planes, Flags::start()), Err(Error::InvalidPlanes));
    }

    #[test]
    fn from_planes_rejects_misplaced_en_passant_target() {
        let flags = Flags { en_passant: Some(Square::E3), ..Flags::start() };
        assert_eq!(
            Position::from_planes(Position::new().planes(), flags),
            Err(Error::InvalidPlanes)
        );
    }

    #[test]
    fn castling_rights_display_and_revoke() {
        assert_eq!(CastlingRights::all().to_string(), "KQkq");
        assert_eq!(CastlingRights::none().to_string(), "-");
        assert_eq!(CastlingRights::all().revoke(White).to_string(), "kq");
        assert_eq!(CastlingRights::all().revoke_corner(Black, Square::H8).to_string(), "KQq");
        assert_eq!(CastlingRights::all().revoke_corner(Black, Square::H1), CastlingRights::all());
        assert_eq!(CastlingRights::all().revoke_corner(White, Square::E1), CastlingRights::all());
        assert_eq!(CastlingRights::new(false, true, true, false).to_string(), "Qk");
        assert!(!CastlingRights::none().any());
    }

    #[test]
    fn display_draws_the_start_position() {
        let expected = "    a b c d e f g h\n\
                        8 | r n b q k b n r\n\
                        7 | p p p p p p p p\n\
                        6 | . . . . . . . .\n\
                        5 | . . . . . . . .\n\
                        4 | . . . . . . . .\n\
                        3 | . . . . . . . .\n\
                        2 | P P P P P P P P\n\
                        1 | R N B Q K B N R\n\
                        turn: white\n\
                        castling: KQkq\n\
                        en passant: -";

        assert_eq!(Position::new().to_string(), expected);
    }

    #[test]
    fn display_shows_en_passant_target() -> Result<()> {
        let text = Position::new().apply("e4")?.to_string();

        assert!(text.ends_with("turn: black\ncastling: KQkq\nen passant: e3"));

        Ok(())
    }

    /// Reads the grid back out of the rendering, rank 8 first.
    fn parse_grid(text: &str) -> Vec<Option<(Color, Piece)>> {
        let mut squares = vec![ None; Square::COUNT ];

        for (row, line) in text.lines().skip(1).take(Rank::COUNT).enumerate() {
            let rank = Rank::COUNT - 1 - row;
            let cells = line.splitn(2, '|').nth(1).unwrap().split_whitespace();
            for (file, cell) in cells.enumerate() {
                let c = cell.chars().next().unwrap();
                if c != '.' {
                    let color = if c.is_uppercase() { White } else { Black };
                    let piece: Piece = cell.parse().unwrap();
                    squares[rank * 8 + file] = Some((color, piece));
                }
            }
        }

        squares
    }

    #[test]
    fn rendered_grid_matches_planes() -> Result<()> {
        let positions = vec![
            Position::new(),
            Position::new().apply("d4")?.apply("Nf6")?.apply("c4")?.apply("e6")?,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -".parse()?,
        ];

        for pos in positions {
            let grid = parse_grid(&pos.to_string());
            for i in 0..Square::COUNT {
                let sq = Square::try_from(i)?;
                assert_eq!(grid[i], pos.piece_at(sq), "{}", sq);
                assert_eq!(grid[i].is_some(), pos.occupied().contains(sq));
            }
        }

        Ok(())
    }
}
