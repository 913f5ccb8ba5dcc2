use std::process::ExitCode;

fn main() -> ExitCode {
    ExitCode::from(crash_severity::api::cli::run())
}
