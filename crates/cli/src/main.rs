use std::process::ExitCode;

fn main() -> ExitCode {
    gemhook_cli::run()
}
