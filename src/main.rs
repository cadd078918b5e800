use std::process::ExitCode;

fn main() -> ExitCode {
    match bol_validate::run() {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
