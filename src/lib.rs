//! Crate root: wires configuration, the program loader, and the simulation
//! loop together behind a single `Machine`. The CLI binary (`src/main.rs`)
//! is a thin shell that turns a `RunError` into a diagnostic and an exit
//! code; everything fallible here returns a `Result` instead of the
//! original's `exit()`-from-anywhere sink.

pub mod config;
pub mod debugger;
pub mod error;
pub mod exec;
pub mod inspect;
pub mod instruction;
pub mod loader;
pub mod machine;
pub mod sim;

pub use config::Config;
pub use error::{ErrorKind, RunError, VmError};
pub use machine::Machine;

/// Loads the program named by `config.program`, runs it to completion (or
/// a fatal error), then optionally writes `dump.bin`.
pub fn run(config: &Config) -> Result<(), RunError> {
    let mut machine = loader::read_program(&config.program)?;

    sim::run(&mut machine, config.debug)?;

    if config.dump {
        loader::dump_program(&machine, std::path::Path::new("dump.bin"))?;
    }

    Ok(())
}
