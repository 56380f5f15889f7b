//! bangs command-line entry point.

fn main() {
    if let Err(e) = bangs::cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
