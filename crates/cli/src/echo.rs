use owo_colors::OwoColorize;

use crate::VERSION;

const HEADER_WIDTH: usize = 48;
const DIVIDER_WIDTH: usize = 50;

/// Print the boxed banner shown by the interactive menu
pub fn print_banner() {
    let title = format!("Chatscribe  v{}", VERSION);
    let border = "═".repeat(HEADER_WIDTH);
    let pad = HEADER_WIDTH.saturating_sub(title.chars().count());
    let left = pad / 2;

    println!("\n{}", format!("╔{}╗", border).bright_magenta().bold());
    println!(
        "{}",
        format!("║{}{}{}║", " ".repeat(left), title, " ".repeat(pad - left))
            .bright_magenta()
            .bold()
    );
    println!("{}\n", format!("╚{}╝", border).bright_magenta().bold());
}

/// Print a thin divider between prompts
pub fn print_divider() {
    println!("{}", "─".repeat(DIVIDER_WIDTH).dimmed());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✔".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".cyan(), message.bright_cyan());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✖".red(), message.bright_red());
}

/// Print an indented detail line
pub fn print_detail(label: &str, value: &str) {
    println!("    {} {}", format!("{}:", label).dimmed(), value.dimmed());
}

/// Print a numbered menu entry
pub fn print_choice(key: &str, label: &str, hint: &str) {
    println!("  {}  {:<11} {}", key.cyan(), label, format!("({})", hint).dimmed());
}
