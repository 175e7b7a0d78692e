//! The `cps` command-line tool.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]
#![warn(clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::fs::File;
use std::path::{Path, PathBuf};
use clap::{App, Arg, ArgMatches, SubCommand, AppSettings, crate_version};
use log::{error, info};
use simplelog::{WriteLogger, LevelFilter};
use chrono::Local;
use cps::chess::Position;
use cps::config::{Config, ConfigError};
use cps::pgn::{read_games, scan_paths, ReplayError};

fn main() -> Result<(), Error> {
    let matches =
        App::new("cps")
            .version(crate_version!())
            .author("Mike Leany")
            .about("Applies chess moves in Standard Algebraic Notation to a bitboard position.")
            .setting(AppSettings::SubcommandRequired)
            .arg(Arg::with_name("config")
                .long("config")
                .short("c")
                .global(true)
                .value_name("FILE")
                .takes_value(true)
                .help("Reads settings from FILE instead of ~/.cps/config.yaml"))
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .global(true)
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .global(true)
                .value_name("LOG_FILE")
                .takes_value(true)
                .help("Sets the log file if logging is turned on [default: cps.log]"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .takes_value(true)
                .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
                .help("Sets the log level if logging is turned on [default: info]"))
            .subcommand(SubCommand::with_name("show")
                .about("Applies moves to a position and prints the board")
                .arg(Arg::with_name("fen")
                    .long("fen")
                    .short("f")
                    .value_name("FEN_STRING")
                    .takes_value(true)
                    .help("Starts from a position in Forsyth-Edwards Notation (FEN)"))
                .arg(Arg::with_name("each")
                    .long("each")
                    .short("e")
                    .help("Prints the board after every move"))
                .arg(Arg::with_name("moves")
                    .value_name("MOVES")
                    .multiple(true)
                    .help("Moves in Standard Algebraic Notation, in game order")))
            .subcommand(SubCommand::with_name("replay")
                .about("Replays every game in the given PGN files and directories")
                .arg(Arg::with_name("paths")
                    .value_name("PATHS")
                    .multiple(true)
                    .help("Files or directories to read [default: data_dir from the config]")))
            .get_matches();

    let config = Config::load(matches.value_of_os("config").map(Path::new))?;
    init_logger(&matches, &config)?;

    match matches.subcommand() {
        ("show", Some(matches)) => show(matches),
        ("replay", Some(matches)) => replay(matches, &config),
        _ => unreachable!(),
    }
}

fn init_logger(matches: &ArgMatches<'_>, config: &Config) -> Result<(), Error> {
    let log_file = matches
        .value_of_os("log-file")
        .map(PathBuf::from)
        .or_else(|| config.log_file.clone())
        .unwrap_or_else(|| PathBuf::from("cps.log"));
    let log_level = match matches.value_of("log-level").or_else(|| config.log_level.as_deref()) {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") | None => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some(level) => return Err(Error(format!("{}: invalid log level", level))),
    };

    let _logger = if matches.is_present("log") {
        WriteLogger::init(
            log_level,
            simplelog::Config::default(),
            File::create(&log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, simplelog::Config::default(), std::io::sink())
    };

    Ok(())
}

fn show(matches: &ArgMatches<'_>) -> Result<(), Error> {
    let mut pos = match matches.value_of("fen") {
        Some(fen) => fen.parse::<Position>().map_err(|err| Error(format!("{}: {}", fen, err)))?,
        None => Position::new(),
    };
    let each = matches.is_present("each");

    if each {
        println!("{}\n", pos);
    }
    for (i, mv) in matches.values_of("moves").into_iter().flatten().enumerate() {
        pos = pos.apply(mv).map_err(|err| Error(format!("ply {} ({}): {}", i + 1, mv, err)))?;
        info!("{}: {}", mv, pos.to_fen_str());
        if each {
            println!("{}\n{}\n", mv, pos);
        }
    }
    if !each {
        println!("{}", pos);
    }

    Ok(())
}

fn replay(matches: &ArgMatches<'_>, config: &Config) -> Result<(), Error> {
    let paths: Vec<PathBuf> = match matches.values_of_os("paths") {
        Some(paths) => paths.map(PathBuf::from).collect(),
        None => vec![config.data_dir.clone()],
    };
    let files = scan_paths(&paths, &config.extensions)?;

    let start = Local::now();
    let (mut games, mut plies, mut failed) = (0, 0, 0);

    for path in files {
        info!("reading {}", path.display());
        let file = File::open(&path).map_err(|err| Error(format!("{}: {}", path.display(), err)))?;

        for game in read_games(file) {
            let game = game?;
            games += 1;

            match game.replay_plies() {
                Ok((_, count)) => plies += count,
                Err(err) => {
                    plies += err.ply - 1;
                    failed += 1;
                    error!("{}: game {}: {}", path.display(), err.game, err);
                    eprintln!("{}: game {}: {}", path.display(), err.game, err);
                    if config.stop_on_error {
                        return Err(err.into());
                    }
                },
            }
        }
    }

    let elapsed = Local::now() - start;
    let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
    info!("{} games, {} plies, {} failed in {:.3}s", games, plies, failed, seconds);
    println!("{} games, {} plies, {} failed in {:.3}s", games, plies, failed, seconds);

    Ok(())
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error(err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error(err.to_string())
    }
}

impl From<ReplayError> for Error {
    fn from(err: ReplayError) -> Self {
        Error(format!("game {}, {}", err.game, err))
    }
}
