use colored::Colorize;
use std::process;

fn main() {
    if let Err(err) = vitrine::cli::run() {
        eprintln!("{} {}", "error:".bright_red().bold(), err);
        process::exit(1);
    }
}
