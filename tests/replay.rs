//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fs;
use cps::chess::{Color, Error, Piece, Position, Square};
use cps::pgn::{read_games, scan_paths};

const GAMES: &str = r#"[Event "Paris"]
[Site "Paris FRA"]
[Date "1858.??.??"]
[White "Paul Morphy"]
[Black "Duke Karl / Count Isouard"]
[Result "1-0"]

1. e4 e5 2. Nf3 d6 3. d4 Bg4 {This is a weak move already.} 4. dxe5 Bxf3
5. Qxf3 dxe5 6. Bc4 Nf6 7. Qb3 Qe7 8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5
11. Bxb5+ Nbd7 12. O-O-O Rd8 13. Rxd7 Rxd7 14. Rd1 Qe6 15. Bxd7+ Nxd7
16. Qb8+ Nxb8 17. Rd8# 1-0

[Event "En passant and promotion"]
[Result "*"]

1. e4 d5 2. e5 f5 3. exf6 Nc6 4. fxg7 Nf6 5. gxh8=Q Kf7 6. Qxf8+ Kxf8 *

[Event "Broken"]
[Result "*"]

1. e4 e5 2. Ke3 Nc6 *
"#;

#[test]
fn opera_game() -> Result<(), Box<dyn std::error::Error>> {
    let game = read_games(GAMES.as_bytes()).next().ok_or("no game")??;

    assert_eq!(game.tags()?["White"], "Paul Morphy");
    assert_eq!(game.tokens().len(), 33);

    let pos = game.replay()?;
    assert_eq!(pos.to_fen_str(), "1n1Rkb1r/p4ppp/4q3/4p1B1/4P3/8/PPP2PPP/2K5 b k -");
    assert_eq!(pos.piece_at(Square::C1), Some((Color::White, Piece::King)));
    assert_eq!(pos.occupied_by(Color::White).len(), 10);
    assert_eq!(pos.occupied_by(Color::Black).len(), 10);

    Ok(())
}

#[test]
fn en_passant_and_promotion_game() -> Result<(), Box<dyn std::error::Error>> {
    let game = read_games(GAMES.as_bytes()).nth(1).ok_or("no game")??;
    let pos = game.replay()?;

    assert_eq!(pos.to_fen_str(), "r1bq1k2/ppp1p2p/2n2n2/3p4/8/8/PPPP1PPP/RNBQKBNR w KQ -");

    Ok(())
}

#[test]
fn replay_step_by_step_matches_whole_game() -> Result<(), Box<dyn std::error::Error>> {
    let game = read_games(GAMES.as_bytes()).nth(1).ok_or("no game")??;

    let mut pos = Position::new();
    let mut history = vec![pos.clone()];
    for token in game.tokens() {
        pos = pos.apply(&token)?;
        history.push(pos.clone());
    }

    assert_eq!(pos, game.replay()?);
    // after 2... f5 the pawn can be taken en passant, and only then
    assert_eq!(history[4].en_passant_square(), Some(Square::F6));
    assert_eq!(history[5].en_passant_square(), None);
    assert_eq!(history[5].piece_at(Square::F5), None);
    // gxh8=Q takes the rook that could castle king-side
    assert!(history[8].castling_rights().king_side(Color::Black));
    assert!(!history[9].castling_rights().king_side(Color::Black));
    assert_eq!(history[9].piece_at(Square::H8), Some((Color::White, Piece::Queen)));

    Ok(())
}

#[test]
fn broken_game_stops_at_the_bad_move() -> Result<(), Box<dyn std::error::Error>> {
    let game = read_games(GAMES.as_bytes()).nth(2).ok_or("no game")??;
    let err = game.replay().unwrap_err();

    assert_eq!(err.game, 3);
    assert_eq!(err.ply, 3);
    assert_eq!(err.token, "Ke3");
    assert_eq!(err.error, Error::NoPieceFound);

    Ok(())
}

#[test]
fn scan_paths_filters_directories_by_extension() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join(format!("cps-scan-{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("b.pgn"), GAMES)?;
    fs::write(dir.join("a.PGN"), GAMES)?;
    fs::write(dir.join("notes.txt"), "not a game")?;

    let extensions = vec!["pgn".to_owned()];
    let files = scan_paths(&[&dir], &extensions)?;
    assert_eq!(files, vec![dir.join("a.PGN"), dir.join("b.pgn")]);

    let notes = dir.join("notes.txt");
    assert_eq!(scan_paths(&[&notes], &extensions)?, vec![notes.clone()]);

    let mut games = 0;
    for path in &files {
        games += read_games(fs::File::open(path)?).count();
    }
    assert_eq!(games, 6);

    fs::remove_dir_all(&dir)?;

    Ok(())
}
