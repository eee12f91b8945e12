use std::process::ExitCode;

fn main() -> ExitCode {
    docsense_lib::run()
}
