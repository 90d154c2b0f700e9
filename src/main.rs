use packvm::Config;
use std::process;

fn main() {
    env_logger::init();

    let config = Config::from_args(std::env::args());

    if let Err(err) = packvm::run(&config) {
        eprintln!("packvm: {}", err);
        process::exit(err.exit_code());
    }
}
