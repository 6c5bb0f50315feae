use clap::Parser;
use std::process::ExitCode;
use turbo_drf::cli::{run_cli, Cli};
use turbo_drf::error::ScaffoldError;
use turbo_drf::logging::{init_logging, LogConfig};

/// Exit status for a rejected option set
const EXIT_VALIDATION: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env().with_verbosity(cli.verbose);
    if let Err(err) = init_logging(&log_config) {
        eprintln!("warning: {err:#}");
    }

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {err:#}");
            let rejected = err
                .downcast_ref::<ScaffoldError>()
                .is_some_and(ScaffoldError::is_validation);
            if rejected {
                ExitCode::from(EXIT_VALIDATION)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
