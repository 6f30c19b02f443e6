use std::process::ExitCode;

fn main() -> ExitCode {
    salesrec_cli::run()
}
