use clap::Parser;
use marketscout::cli::{run, Cli};
use marketscout::logging::init_logging;

fn main() -> std::process::ExitCode {
    // a missing .env is normal
    let _ = dotenvy::dotenv();
    init_logging();
    run(Cli::parse())
}
