mod cli;
mod commands;
mod error;
mod infra;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("application error: {}", error::report(&err));
        std::process::exit(1);
    }
}
