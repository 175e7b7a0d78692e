//! Contains the move descriptor and its parser
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use lazy_static::lazy_static;
use regex::Regex;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which side of the board a castling move goes to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Castling {
    /// `O-O`
    KingSide,
    /// `O-O-O`
    QueenSide,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move as written in Standard Algebraic Notation, decoded into its parts but not yet tied to
/// any position.
///
/// Fields the notation leaves out stay unset. Working out the exact origin square from the hints
/// is left to [`Position::apply_move`](struct.Position.html#method.apply_move).
///
/// ```rust
/// use cps::chess::{MoveDescriptor, Piece, File, Square};
///
/// let mv: MoveDescriptor = "Nbd7".parse()?;
/// assert_eq!(mv.piece(), Piece::Knight);
/// assert_eq!(mv.origin_file(), Some(File::B));
/// assert_eq!(mv.origin_rank(), None);
/// assert_eq!(mv.destination(), Some(Square::D7));
/// assert!(!mv.is_capture());
/// # Ok::<(), cps::chess::Error>(())
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MoveDescriptor {
    piece: Option<Piece>,
    orig_file: Option<File>,
    orig_rank: Option<Rank>,
    capture: bool,
    dest: Option<Square>,
    prom_pc: Option<Piece>,
    castling: Option<Castling>,
}

lazy_static! {
    static ref SAN_MOVE: Regex = Regex::new(
        r"^([NBRQK])?([a-h])?([1-8])?(x)?([a-h][1-8])(?:=?([NBRQ]))?$"
    ).expect("INFALLIBLE");
    static ref ANNOTATION: Regex = Regex::new(r"[+#!?]+$").expect("INFALLIBLE");
}

impl MoveDescriptor {
    /// Creates a castling move
    pub fn castle(side: Castling) -> Self {
        MoveDescriptor {
            piece: Some(Piece::King),
            castling: Some(side),
            ..Default::default()
        }
    }

    /// Returns the piece hint as written, or `None` for a pawn move or castling
    pub fn piece_hint(&self) -> Option<Piece> {
        if self.castling.is_some() {
            None
        } else {
            self.piece
        }
    }

    /// Returns the moving piece, `Pawn` when the notation names none
    pub fn piece(&self) -> Piece {
        self.piece.unwrap_or(Piece::Pawn)
    }

    /// Returns the origin file hint, if given
    pub fn origin_file(&self) -> Option<File> {
        self.orig_file
    }

    /// Returns the origin rank hint, if given
    pub fn origin_rank(&self) -> Option<Rank> {
        self.orig_rank
    }

    /// Returns `true` if the move is marked as a capture
    pub fn is_capture(&self) -> bool {
        self.capture
    }

    /// Returns the destination square. Castling moves have none.
    pub fn destination(&self) -> Option<Square> {
        self.dest
    }

    /// Returns the piece a pawn promotes to, if given
    pub fn promotion(&self) -> Option<Piece> {
        self.prom_pc
    }

    /// Returns the castling side, if this is a castling move
    pub fn castling(&self) -> Option<Castling> {
        self.castling
    }

    /// Returns `true` for `O-O` and `O-O-O`
    pub fn is_castle(&self) -> bool {
        self.castling.is_some()
    }

    /// Returns `true` for `O-O-O`
    pub fn is_long_castle(&self) -> bool {
        self.castling == Some(Castling::QueenSide)
    }
}

impl FromStr for MoveDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<MoveDescriptor> {
        let s = ANNOTATION.replace(s.trim(), "");

        match &*s {
            "O-O" | "0-0" => return Ok(MoveDescriptor::castle(Castling::KingSide)),
            "O-O-O" | "0-0-0" => return Ok(MoveDescriptor::castle(Castling::QueenSide)),
            _ => {},
        }

        let caps = SAN_MOVE.captures(&s).ok_or(Error::MalformedMove)?;
        let field = |i: usize| caps.get(i).map(|m| m.as_str());

        let mv = MoveDescriptor {
            piece: field(1).map(str::parse).transpose()?,
            orig_file: field(2).map(str::parse).transpose()?,
            orig_rank: field(3).map(str::parse).transpose()?,
            capture: field(4).is_some(),
            dest: field(5).map(str::parse).transpose()?,
            prom_pc: field(6).map(str::parse).transpose()?,
            castling: None,
        };

        // only a pawn reaching the last rank may name a promotion
        if let (Some(_), Some(dest)) = (mv.prom_pc, mv.dest) {
            if mv.piece.is_some() || (dest.rank() != Rank::R1 && dest.rank() != Rank::R8) {
                return Err(Error::MalformedMove);
            }
        }

        Ok(mv)
    }
}

impl fmt::Display for MoveDescriptor {
    /// Writes the move back in Standard Algebraic Notation, with `=` before any promotion piece.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();

        match self.castling {
            Some(Castling::KingSide) => s += "O-O",
            Some(Castling::QueenSide) => s += "O-O-O",
            None => {
                if let Some(piece) = self.piece {
                    s += &piece.to_string();
                }
                if let Some(file) = self.orig_file {
                    s += &file.to_string();
                }
                if let Some(rank) = self.orig_rank {
                    s += &rank.to_string();
                }
                if self.capture {
                    s += "x";
                }
                if let Some(dest) = self.dest {
                    s += &dest.to_string();
                }
                if let Some(prom_pc) = self.prom_pc {
                    s += "=";
                    s += &prom_pc.to_string();
                }
            },
        }

        s.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pawn_push() -> Result<()> {
        let mv: MoveDescriptor = "e4".parse()?;
        assert_eq!(mv.piece_hint(), None);
        assert_eq!(mv.piece(), Piece::Pawn);
        assert_eq!(mv.origin_file(), None);
        assert_eq!(mv.origin_rank(), None);
        assert_eq!(mv.destination(), Some(Square::E4));
        assert!(!mv.is_capture());
        assert!(!mv.is_castle());

        Ok(())
    }

    #[test]
    fn knight_move_with_check() -> Result<()> {
        let mv: MoveDescriptor = "Nf3+".parse()?;
        assert_eq!(mv.piece_hint(), Some(Piece::Knight));
        assert_eq!(mv.destination(), Some(Square::F3));

        Ok(())
    }

    #[test]
    fn pawn_capture_has_origin_file() -> Result<()> {
        let mv: MoveDescriptor = "exd5".parse()?;
        assert_eq!(mv.piece(), Piece::Pawn);
        assert_eq!(mv.origin_file(), Some(File::E));
        assert!(mv.is_capture());
        assert_eq!(mv.destination(), Some(Square::D5));

        Ok(())
    }

    #[test]
    fn full_origin_hint() -> Result<()> {
        let mv: MoveDescriptor = "Qh4xe1#".parse()?;
        assert_eq!(mv.piece(), Piece::Queen);
        assert_eq!(mv.origin_file(), Some(File::H));
        assert_eq!(mv.origin_rank(), Some(Rank::R4));
        assert!(mv.is_capture());
        assert_eq!(mv.destination(), Some(Square::E1));

        let mv: MoveDescriptor = "R1a3".parse()?;
        assert_eq!(mv.origin_file(), None);
        assert_eq!(mv.origin_rank(), Some(Rank::R1));

        Ok(())
    }

    #[test]
    fn promotions_with_and_without_separator() -> Result<()> {
        let mv: MoveDescriptor = "e8=Q".parse()?;
        assert_eq!(mv.promotion(), Some(Piece::Queen));
        assert_eq!(mv.destination(), Some(Square::E8));

        let mv: MoveDescriptor = "bxa1N".parse()?;
        assert_eq!(mv.promotion(), Some(Piece::Knight));
        assert_eq!(mv.origin_file(), Some(File::B));
        assert!(mv.is_capture());

        Ok(())
    }

    #[test]
    fn castling_tokens() -> Result<()> {
        let mv: MoveDescriptor = "O-O".parse()?;
        assert!(mv.is_castle());
        assert!(!mv.is_long_castle());
        assert_eq!(mv.destination(), None);
        assert_eq!(mv.piece_hint(), None);

        let mv: MoveDescriptor = "O-O-O+".parse()?;
        assert!(mv.is_long_castle());

        let mv: MoveDescriptor = "0-0-0".parse()?;
        assert_eq!(mv.castling(), Some(Castling::QueenSide));

        Ok(())
    }

    #[test]
    fn malformed_tokens() {
        for token in &[ "", "Zz9", "e9", "i4", "Nf", "O-O-O-O", "o-o", "OO", "e4e5e6", "Ke8=Q",
                        "e5=Q", "e8=K", "Px" ] {
            assert_eq!(token.parse::<MoveDescriptor>(), Err(Error::MalformedMove), "{}", token);
        }
    }

    #[test]
    fn display_writes_canonical_san() -> Result<()> {
        for (token, canonical) in &[
            ("e4", "e4"), ("Nbd7", "Nbd7"), ("exd5", "exd5"), ("e8Q", "e8=Q"),
            ("O-O+", "O-O"), ("0-0-0", "O-O-O"), ("Qh4xe1#", "Qh4xe1"),
        ] {
            assert_eq!(token.parse::<MoveDescriptor>()?.to_string(), *canonical);
        }

        Ok(())
    }
}
