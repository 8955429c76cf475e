use std::process::ExitCode;

use pwa_icongen::{Config, logger};

fn main() -> ExitCode {
    logger::init();
    match pwa_icongen::run(&Config::default()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error("icon generation aborted", &e);
            ExitCode::FAILURE
        }
    }
}
