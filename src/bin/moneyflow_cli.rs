use std::process::ExitCode;

fn main() -> ExitCode {
    moneyflow_core::init();
    match moneyflow_core::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("moneyflow_cli: {err}");
            ExitCode::FAILURE
        }
    }
}
