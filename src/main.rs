use env_logger::Env;
use slimbridge::{
    cli::{get_args, run, write_payload},
    constants::{exit_codes, DEFAULT_LOG_FILTER, LOG_ENV},
};

fn main() {
    env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV, DEFAULT_LOG_FILTER)).init();

    let args = get_args();
    let payload = run(&args);

    if let Err(err) = write_payload(std::io::stdout().lock(), &payload) {
        eprintln!("Failed to write output: {err}");
        std::process::exit(exit_codes::FAILURE);
    }
    std::process::exit(exit_codes::SUCCESS);
}
