use std::process::ExitCode;

fn main() -> ExitCode {
    jusku_cli::run()
}
