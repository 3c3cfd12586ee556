use std::process::ExitCode;

use log::{error, info};
use pki_fixtures::fixture::{self, FixtureConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match fixture::generate(&FixtureConfig::default()) {
        Ok(set) => {
            info!("done, {} files written", set.files.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("ERROR:{err}");
            ExitCode::FAILURE
        }
    }
}
