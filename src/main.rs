use std::process::ExitCode;

fn main() -> ExitCode {
    extension_bindgen::cli::start_cli()
}
