use colored::Colorize;

mod cli;

fn main() {
    if let Err(e) = cli::commands::run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
