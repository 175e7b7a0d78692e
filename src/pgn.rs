//! Tools for reading PGN files and replaying their games.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::fs;
use std::io;
use std::io::{Read, BufRead, BufReader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;
use log::{debug, trace, warn};
use regex::Regex;
use crate::chess::{self, Position};

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"\{[^}]*\}|;[^\n]*|\$\d+").expect("INFALLIBLE");
    static ref MOVE_NUMBER: Regex = Regex::new(r"^\d+\.+").expect("INFALLIBLE");
    static ref RESULT: Regex = Regex::new(r"^(1-0|0-1|1/2-1/2|\*)$").expect("INFALLIBLE");
}

/// Reads game records one at a time from `reader`.
///
/// Tag lines come first, then a blank line, then the move text, which ends at the next blank line.
/// A tag line directly after move text also starts a new record.
pub fn read_games<R: Read>(reader: R) -> ReadGames<R> {
    ReadGames { reader: BufReader::new(reader), buffer: String::new(), count: 0 }
}

/// Iterator returned by [`read_games`](fn.read_games.html)
#[derive(Debug)]
pub struct ReadGames<R: Read> {
    reader: BufReader<R>,
    buffer: String,
    count: usize,
}

impl<R: Read> ReadGames<R> {
    fn record(&mut self, tags: Vec<String>, move_text: String) -> GameRecord {
        self.count += 1;
        GameRecord { index: self.count, tags, move_text }
    }
}

impl<R: Read> Iterator for ReadGames<R> {
    type Item = io::Result<GameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut tags = Vec::new();
        let mut move_text = String::new();
        let mut in_moves = false;

        loop {
            let s = self.buffer.trim();

            if s.starts_with('[') && !in_moves {
                tags.push(s.to_owned());
            } else if s.starts_with('[') {
                // leave the tag in the buffer for the next record
                let record = self.record(tags, move_text);
                return Some(Ok(record));
            } else if !s.is_empty() {
                move_text += s;
                move_text += "\n";
                in_moves = true;
            } else if !move_text.is_empty() {
                self.buffer.clear();
                let record = self.record(tags, move_text);
                return Some(Ok(record));
            } else if !tags.is_empty() {
                in_moves = true;
            }

            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => {
                    if tags.is_empty() && move_text.is_empty() {
                        return None;
                    } else {
                        let record = self.record(tags, move_text);
                        return Some(Ok(record));
                    }
                },
                Err(error) => return Some(Err(error)),
                _ => {},
            }
        }
    }
}

/// One game as read from a PGN file: its raw tag lines and move text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    index: usize,
    tags: Vec<String>,
    move_text: String,
}

impl GameRecord {
    /// Returns the position of this record in its file, starting at 1
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the tag lines as read, brackets included
    pub fn tag_text(&self) -> &Vec<String> {
        &self.tags
    }

    /// Parses the tag lines into a map from tag name to value.
    pub fn tags(&self) -> Result<HashMap<String, String>, PgnParseError> {
        let mut tags = HashMap::new();
        for tag in &self.tags {
            let split: Vec<_> = tag
                .trim_start_matches('[')
                .trim_end_matches(']')
                .trim()
                .trim_end_matches('"')
                .splitn(2, " \"")
                .collect();

            if split.len() == 2 {
                tags.insert(split[0].to_owned(), split[1].to_owned());
            } else {
                return Err(PgnParseError);
            }
        }

        Ok(tags)
    }

    /// Returns the move text, one line per line of input
    pub fn move_text(&self) -> &str {
        &self.move_text
    }

    /// Returns the move tokens in game order.
    ///
    /// Move numbers, the game result, comments, variations and numeric annotation glyphs are
    /// dropped.
    ///
    /// ```rust
    /// use cps::pgn::read_games;
    ///
    /// let text = "[Event \"?\"]\n\n1. e4 {best by test} e5 2. Nf3 (2. f4) $1 Nc6 1/2-1/2\n";
    /// let game = read_games(text.as_bytes()).next().unwrap()?;
    /// assert_eq!(game.tokens(), vec!["e4", "e5", "Nf3", "Nc6"]);
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn tokens(&self) -> Vec<String> {
        // comments go first; a parenthesis inside one is just text
        let text = COMMENT.replace_all(&self.move_text, " ");

        strip_variations(&text)
            .split_whitespace()
            .map(|word| MOVE_NUMBER.replace(word, "").into_owned())
            .filter(|word| !word.is_empty() && !RESULT.is_match(word))
            .collect()
    }

    /// Applies every move to the starting position and returns the final position.
    ///
    /// Stops at the first move that cannot be applied.
    pub fn replay(&self) -> Result<Position, ReplayError> {
        self.replay_plies().map(|(pos, _)| pos)
    }

    /// Same as [`replay`](#method.replay), but also returns the number of plies applied.
    pub fn replay_plies(&self) -> Result<(Position, usize), ReplayError> {
        debug!("game {}: {}", self.index, self.tags.join(" "));

        let tokens = self.tokens();
        let mut pos = Position::new();
        for (i, token) in tokens.iter().enumerate() {
            pos = pos.apply(token).map_err(|error| {
                let err = ReplayError {
                    game: self.index,
                    ply: i + 1,
                    token: token.clone(),
                    error,
                };
                warn!("game {}: {}", self.index, err);
                err
            })?;
            trace!("game {} ply {}: {}", self.index, i + 1, token);
        }

        Ok((pos, tokens.len()))
    }
}

/// Removes parenthesized variations, which may nest
fn strip_variations(s: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                out.push(' ');
            },
            _ if depth == 0 => out.push(c),
            _ => {},
        }
    }

    out
}

/// Lists the game files named by `paths`.
///
/// Files are taken as given. Directories are scanned one level deep for files whose extension is
/// in `extensions`, ignoring case. The result is sorted within each directory.
pub fn scan_paths<P: AsRef<Path>>(paths: &[P], extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in fs::read_dir(path)? {
                let entry = entry?.path();
                let matches = entry
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
                    .unwrap_or(false);

                if entry.is_file() && matches {
                    found.push(entry);
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(path.to_owned());
        }
    }

    Ok(files)
}

/// A tag line that is not of the form `[Name "Value"]`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PgnParseError;

impl fmt::Display for PgnParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "PGN parse error".fmt(f)
    }
}

impl std::error::Error for PgnParseError { }

/// A move in a game record that could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayError {
    /// Index of the game in its file, starting at 1
    pub game: usize,
    /// Number of the failing ply, starting at 1
    pub ply: usize,
    /// The move token as written
    pub token: String,
    /// Why it failed
    pub error: chess::Error,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ply {} ({}): {}", self.ply, self.token, self.error)
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
