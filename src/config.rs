//! CLI configuration, built from `clap`'s v2 `App`/`Arg` builder: a
//! positional program path plus `-d`/`--debug`, `-b`/`--binary` and
//! `--dump` flags.

use clap::{App, Arg};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub program: PathBuf,
    /// `-d`/`--debug`: start in single-step debug mode.
    pub debug: bool,
    /// `--dump`: write `dump.bin` after the run.
    pub dump: bool,
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Config
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = App::new("packvm")
            .about("Packed-instruction register VM: fetch/decode/execute core with a debugger")
            .arg(
                Arg::with_name("debug")
                    .short("d")
                    .long("debug")
                    .help("starts in single-step debug mode"),
            )
            .arg(
                Arg::with_name("binary")
                    .short("b")
                    .long("binary")
                    .help("PROGRAM is a binary file (the only supported input form)"),
            )
            .arg(
                Arg::with_name("dump")
                    .long("dump")
                    .help("writes dump.bin (round-trip of text/data) after the run"),
            )
            .arg(
                Arg::with_name("PROGRAM")
                    .help("binary program file (see the loader's documented format)")
                    .required(true)
                    .index(1),
            )
            .get_matches_from(args);

        Config {
            program: PathBuf::from(matches.value_of("PROGRAM").expect("required by clap")),
            debug: matches.is_present("debug"),
            dump: matches.is_present("dump"),
        }
    }
}
