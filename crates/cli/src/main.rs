use std::process::ExitCode;

fn main() -> ExitCode {
    autoflow_cli::run()
}
