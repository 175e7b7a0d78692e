//! Defines the error types needed by the chess module
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by methods in the `chess` module
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Move token does not match the move grammar
    MalformedMove,
    /// No piece of the moving side matches the move
    NoPieceFound,
    /// More than one piece of the moving side matches the move
    IllegalOriginAmbiguous,
    /// Planes or flags break the board invariants
    InvalidPlanes,
    /// Cannot parse string
    ParseError,
    /// Failed to convert an integer to an another type
    TryFromIntError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            MalformedMove => "malformed move",
            NoPieceFound => "no piece found",
            IllegalOriginAmbiguous => "ambiguous move origin",
            InvalidPlanes => "inconsistent board planes",
            ParseError => "cannot parse string",
            TryFromIntError => "integer out of range",
        }.fmt(f)
    }
}

impl std::error::Error for Error { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Result type used by methods in the `chess` module
pub type Result<T> = std::result::Result<T, Error>;
