//! Reads and writes positions in Forsyth-Edwards Notation
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;

impl Position {
    /// Parse a position from a FEN string.
    ///
    /// The board, turn, castling and en-passant fields are required. The half-move clock and move
    /// number may follow, but are only checked for being numbers; a `Position` keeps no clocks.
    pub fn from_fen_str(s: &str) -> Result<Position> {
        let mut builder = PositionBuilder::new();
        let mut fields = s.split_whitespace();

        // parse the board
        let board = fields.next().ok_or(Error::ParseError)?;
        let mut r = Rank::COUNT - 1;
        let mut f = 0;
        for c in board.chars() {
            match c {
                '1' ..= '8' => {
                    f += c.to_digit(10).expect("INFALLIBLE") as usize;
                    if f > File::COUNT {
                        return Err(Error::ParseError);
                    }
                },
                '/' => {
                    if f == File::COUNT && r > 0 {
                        r -= 1;
                        f = 0;
                    } else {
                        return Err(Error::ParseError);
                    }
                },
                _ => {
                    if f >= File::COUNT {
                        return Err(Error::ParseError);
                    }
                    let sq = Square::from_coord(File::try_from(f)?, Rank::try_from(r)?);
                    let color = if c.is_uppercase() { White } else { Black };
                    let piece: Piece = c.to_string().parse()?;

                    builder.piece(color, piece, sq);
                    f += 1;
                },
            }
        }
        if r > 0 || f < File::COUNT {
            return Err(Error::ParseError);
        }

        // parse the turn
        builder.turn(fields.next().ok_or(Error::ParseError)?.parse()?);

        // parse the castling flags
        match fields.next() {
            Some("-") => {},
            Some(castling_flags) => {
                for c in castling_flags.chars() {
                    match c {
                        'K' => builder.can_castle_king_side(White, true),
                        'Q' => builder.can_castle_queen_side(White, true),
                        'k' => builder.can_castle_king_side(Black, true),
                        'q' => builder.can_castle_queen_side(Black, true),
                        _ => return Err(Error::ParseError),
                    };
                }
            },
            None => return Err(Error::ParseError),
        }

        // parse en passant square
        match fields.next() {
            Some("-") => {},
            Some(ep_square) => { builder.en_passant_square(Some(ep_square.parse()?)); },
            None => return Err(Error::ParseError),
        }

        // half move clock and move number, if present
        for clock in fields.take(2) {
            clock.parse::<u32>().map_err(|_| Error::ParseError)?;
        }

        builder.validate()
    }

    /// Converts the position to a FEN string of four fields: board, turn, castling rights and
    /// en-passant square.
    pub fn to_fen_str(&self) -> String {
        // the board
        let mut board = String::new();

        for r in (0..Rank::COUNT).rev() {
            let rank = Rank::try_from(r).expect("INFALLIBLE");
            let mut count = 0;
            for f in 0..File::COUNT {
                let sq = Square::from_coord(File::try_from(f).expect("INFALLIBLE"), rank);
                if let Some((c, p)) = self.piece_at(sq) {
                    if count > 0 {
                        board += &count.to_string();
                        count = 0;
                    }
                    board.push(p.symbol(c));
                } else {
                    count += 1;
                }
            }
            if count > 0 {
                board += &count.to_string();
            }
            if r > 0 {
                board += "/";
            }
        }

        // en passant square
        let ep_square = match self.flags.en_passant {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!("{} {} {} {}", board, self.flags.turn, self.flags.castling, ep_square)
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Parse a position from a FEN string
    fn from_str(s: &str) -> Result<Self> {
        Position::from_fen_str(s)
    }
}
