//! The state transition: applying one move to a `Position`.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;
use crate::chess::moves::{MoveDescriptor, Castling};
use Piece::*;

impl Position {
    /// Parses `mv` as Standard Algebraic Notation and applies it.
    ///
    /// The move is trusted to be legal in this position; only enough is checked to keep the planes
    /// consistent and to pick out which piece moved.
    pub fn apply(&self, mv: &str) -> Result<Position> {
        self.apply_move(&mv.parse()?)
    }

    /// Returns the position after `mv`, leaving `self` untouched.
    ///
    /// # Errors
    ///  -  `NoPieceFound` if no piece of the side to move matches the hints and can reach the
    ///     destination, or the king and rook are not in place for castling.
    ///  -  `IllegalOriginAmbiguous` if more than one piece still matches.
    ///  -  `InvalidPlanes` if the destination holds a piece of the side to move.
    pub fn apply_move(&self, mv: &MoveDescriptor) -> Result<Position> {
        let us = self.turn();
        let them = !us;
        let mut planes = self.planes;
        // en passant never survives more than one ply
        let mut flags = Flags {
            turn: them,
            castling: self.flags.castling,
            en_passant: None,
        };

        if let Some(side) = mv.castling() {
            let rank = us.home_rank();
            let (king_dest, rook_orig, rook_dest) = match side {
                Castling::KingSide => (File::G, File::H, File::F),
                Castling::QueenSide => (File::C, File::A, File::D),
            };
            let king_orig = Square::from_coord(File::E, rank);
            let rook_orig = Square::from_coord(rook_orig, rank);

            if !self.occupied_by_piece(us, King).contains(king_orig)
                || !self.occupied_by_piece(us, Rook).contains(rook_orig) {
                return Err(Error::NoPieceFound);
            }

            let king_mask = Bitboard::from(king_orig) ^ Square::from_coord(king_dest, rank).into();
            let rook_mask = Bitboard::from(rook_orig) ^ Square::from_coord(rook_dest, rank).into();

            planes[Plane::King as usize] ^= king_mask;
            planes[Plane::Rook as usize] ^= rook_mask;
            planes[Plane::from(us) as usize] ^= king_mask ^ rook_mask;
            flags.castling = flags.castling.revoke(us);

            return Position::from_planes(planes, flags);
        }

        let piece = mv.piece();
        let dest = mv.destination().ok_or(Error::MalformedMove)?;
        if self.occupied_by(us).contains(dest) {
            return Err(Error::InvalidPlanes);
        }
        let orig = self.find_origin(mv, dest)?;

        // remove the captured piece, which sits behind `dest` for an en-passant capture
        let capture_sq = if self.occupied_by(them).contains(dest) {
            Some(dest)
        } else if piece == Pawn && mv.is_capture() && self.flags.en_passant == Some(dest) {
            Some(Square::from_coord(dest.file(), orig.rank()))
        } else {
            None
        };

        if let Some(capture_sq) = capture_sq {
            if let Some((_, captured)) = self.piece_at(capture_sq) {
                planes[Plane::from(them) as usize].remove(capture_sq);
                planes[Plane::from(captured) as usize].remove(capture_sq);

                if captured == Rook {
                    flags.castling = flags.castling.revoke_corner(them, capture_sq);
                }
            }
        }

        // move the piece, swapping in the promotion piece on the last rank
        let placed = if piece == Pawn && (dest.rank() == Rank::R1 || dest.rank() == Rank::R8) {
            mv.promotion().unwrap_or(Queen)
        } else {
            piece
        };

        planes[Plane::from(us) as usize].remove(orig);
        planes[Plane::from(us) as usize].insert(dest);
        planes[Plane::from(piece) as usize].remove(orig);
        planes[Plane::from(placed) as usize].insert(dest);

        if piece == Pawn {
            let rank_diff = dest.rank() as i8 - orig.rank() as i8;
            if rank_diff == 2 * us.forward() {
                flags.en_passant = orig.offset(0, us.forward());
            }
        }

        match piece {
            King => flags.castling = flags.castling.revoke(us),
            Rook => flags.castling = flags.castling.revoke_corner(us, orig),
            _ => {},
        }

        Position::from_planes(planes, flags)
    }

    /// Finds the one square the moving piece can come from.
    ///
    /// Candidates are the side to move's pieces of the right type, narrowed by any origin hints,
    /// then by which of them can reach `dest`. If that still leaves several, pieces pinned to
    /// their own king are dropped, since notation never disambiguates against those.
    fn find_origin(&self, mv: &MoveDescriptor, dest: Square) -> Result<Square> {
        let us = self.turn();
        let piece = mv.piece();
        let occ = self.occupied();

        let mut candidates = self.occupied_by_piece(us, piece);
        if let Some(file) = mv.origin_file() {
            candidates &= file.into();
        }
        if let Some(rank) = mv.origin_rank() {
            candidates &= rank.into();
        }

        let reach = match piece {
            Pawn => {
                if mv.is_capture() || self.occupied_by(!us).contains(dest) {
                    pawn_attacks_to(dest, us)
                } else {
                    pawn_pushes_to(dest, us, occ)
                }
            },
            Knight => knight_attacks(dest),
            Bishop => bishop_attacks(dest, occ),
            Rook => rook_attacks(dest, occ),
            Queen => queen_attacks(dest, occ),
            King => king_attacks(dest),
        };
        let candidates = candidates & reach;

        match candidates.len() {
            0 => Err(Error::NoPieceFound),
            1 => Ok(candidates.peek().expect("INFALLIBLE")),
            _ => {
                candidates
                    .into_iter()
                    .filter(|&orig| !self.exposes_king(orig, dest))
                    .collect::<Bitboard>()
                    .single()
                    .ok_or(Error::IllegalOriginAmbiguous)
            },
        }
    }

    /// Returns `true` if moving the piece on `orig` to `dest` would leave its own king open to an
    /// enemy bishop, rook or queen.
    fn exposes_king(&self, orig: Square, dest: Square) -> bool {
        let us = self.turn();
        let king = match self.occupied_by_piece(us, King).single() {
            Some(king) => king,
            None => return false,
        };

        let occ = (self.occupied() & !Bitboard::from(orig)) | dest.into();
        let enemies = self.occupied_by(!us) & !Bitboard::from(dest);
        let queens = self.plane(Plane::Queen);
        let diagonal = enemies & (self.plane(Plane::Bishop) | queens);
        let orthogonal = enemies & (self.plane(Plane::Rook) | queens);

        bishop_attacks(king, occ).intersects(diagonal)
            || rook_attacks(king, occ).intersects(orthogonal)
    }
}
