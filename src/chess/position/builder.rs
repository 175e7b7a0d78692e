//! Contains a builder for `Position`
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A builder for `Position`, filled in one square at a time.
///
/// ```rust
/// use cps::chess::{PositionBuilder, Color, Piece, Square};
///
/// let pos = PositionBuilder::new()
///     .piece(Color::White, Piece::King, Square::E1)
///     .piece(Color::Black, Piece::King, Square::E8)
///     .turn(Color::Black)
///     .validate()?;
/// assert_eq!(pos.occupied().len(), 2);
/// # Ok::<(), cps::chess::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PositionBuilder {
    board: Vec<Option<(Color, Piece)>>,
    turn: Color,
    castle_king_side: [bool; Color::COUNT],
    castle_queen_side: [bool; Color::COUNT],
    ep_square: Option<Square>,
}

impl PositionBuilder {
    /// Creates a new, empty `PositionBuilder` with `White` to move and no castling rights
    pub fn new() -> Self {
        PositionBuilder {
            board: vec![None; Square::COUNT],
            turn: White,
            castle_king_side: [false; Color::COUNT],
            castle_queen_side: [false; Color::COUNT],
            ep_square: None,
        }
    }

    /// Sets the piece at `square`
    pub fn piece(&mut self, color: Color, piece: Piece, square: Square) -> &mut Self {
        self.board[square as usize] = Some((color, piece));
        self
    }

    /// Clears the piece at `square`
    pub fn clear(&mut self, square: Square) -> &mut Self {
        self.board[square as usize] = None;
        self
    }

    /// Sets the turn to `color`
    pub fn turn(&mut self, color: Color) -> &mut Self {
        self.turn = color;
        self
    }

    /// Sets king side castling rights for `color`
    pub fn can_castle_king_side(&mut self, color: Color, available: bool) -> &mut Self {
        self.castle_king_side[color as usize] = available;
        self
    }

    /// Sets queen side castling rights for `color`
    pub fn can_castle_queen_side(&mut self, color: Color, available: bool) -> &mut Self {
        self.castle_queen_side[color as usize] = available;
        self
    }

    /// Sets or clears the en-passant square
    pub fn en_passant_square(&mut self, square: Option<Square>) -> &mut Self {
        self.ep_square = square;
        self
    }

    /// Packs the board into planes and returns a `Position`, with the same checks as
    /// [`Position::from_planes`](struct.Position.html#method.from_planes).
    pub fn validate(&self) -> Result<Position> {
        let mut planes = [Bitboard::new(); Plane::COUNT];

        for (i, piece) in self.board.iter().enumerate() {
            let sq = Square::try_from(i).expect("INFALLIBLE");

            if let Some((color, piece)) = piece {
                planes[Plane::from(*color) as usize].insert(sq);
                planes[Plane::from(*piece) as usize].insert(sq);
            }
        }

        let flags = Flags {
            turn: self.turn,
            castling: CastlingRights::new(
                self.castle_king_side[White as usize],
                self.castle_queen_side[White as usize],
                self.castle_king_side[Black as usize],
                self.castle_queen_side[Black as usize],
            ),
            en_passant: self.ep_square,
        };

        Position::from_planes(planes, flags)
    }
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Position> for PositionBuilder {
    /// Starts a builder from an existing position
    fn from(pos: &Position) -> Self {
        let mut builder = PositionBuilder::new();

        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).expect("INFALLIBLE");
            builder.board[i] = pos.piece_at(sq);
        }
        for &c in &[White, Black] {
            builder.castle_king_side[c as usize] = pos.castling_rights().king_side(c);
            builder.castle_queen_side[c as usize] = pos.castling_rights().queen_side(c);
        }
        builder.turn = pos.turn();
        builder.ep_square = pos.en_passant_square();

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_gives_empty_board() -> Result<()> {
        let pos = PositionBuilder::new().validate()?;

        assert!(pos.occupied().is_empty());
        assert_eq!(pos.turn(), White);
        assert_eq!(pos.castling_rights(), CastlingRights::none());

        Ok(())
    }

    #[test]
    fn round_trips_the_start_position() -> Result<()> {
        let start = Position::new();

        assert_eq!(PositionBuilder::from(&start).validate()?, start);

        Ok(())
    }

    #[test]
    fn clear_and_rights() -> Result<()> {
        let pos = PositionBuilder::from(&Position::new())
            .clear(Square::F1)
            .clear(Square::G1)
            .can_castle_queen_side(White, false)
            .can_castle_king_side(Black, false)
            .validate()?;

        assert_eq!(pos.piece_at(Square::F1), None);
        assert_eq!(pos.castling_rights().to_string(), "Kq");
        assert_eq!(pos.apply("O-O")?.piece_at(Square::G1), Some((White, Piece::King)));

        Ok(())
    }

    #[test]
    fn en_passant_target_must_fit_the_turn() {
        let mut builder = PositionBuilder::new();
        builder
            .piece(White, Piece::King, Square::E1)
            .piece(Black, Piece::King, Square::E8)
            .piece(Black, Piece::Pawn, Square::D5)
            .en_passant_square(Some(Square::D6));
        assert!(builder.validate().is_ok());

        builder.turn(Black);
        assert_eq!(builder.validate(), Err(Error::InvalidPlanes));
    }
}
