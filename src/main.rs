use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = concord_fit::app::run() {
        eprintln!("cfit: {err}");
        return ExitCode::from(err.exit_code());
    }
    ExitCode::SUCCESS
}
