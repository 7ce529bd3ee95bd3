use clap::Parser;
use env_logger::Env;
use log::error;

use blazarctl::cli::{split_values_specs, write_log_line, ControlCommand};

#[tokio::main]
async fn main() {
    let (args, values_specs) = split_values_specs(std::env::args().collect());
    let command = ControlCommand::parse_from(args);
    let debug = command.debug;

    env_logger::Builder::new()
        .filter_level(command.log_level())
        .format(|buf, record| write_log_line(buf, record))
        .parse_env(Env::default())
        .init();

    if let Err(err) = command.run(values_specs).await {
        if debug {
            error!("{:?}", err);
        } else {
            error!("{}", err);
        }
        std::process::exit(1);
    }
}
