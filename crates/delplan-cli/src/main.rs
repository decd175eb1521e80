use std::process::ExitCode;

fn main() -> ExitCode {
    delplan_cli::run()
}
