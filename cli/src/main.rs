mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, convert};
use terminal::{logging, print};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = commands.to_config();
    print::banner(cfg.no_banner);

    let outcome = convert::convert(&cfg).await;
    ExitCode::from(outcome.exit_code())
}
