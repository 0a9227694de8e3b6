use colored::*;

pub fn print_header(title: &str) {
    let version = format!("v{}", env!("CARGO_PKG_VERSION")).black().bold();
    println!("  {} {}", title.yellow().bold(), version);
}

/// One line per required environment variable.
pub fn print_credential(name: &str, is_set: bool) {
    if is_set {
        println!("  {} {}", "✓".green().bold(), name.green());
    } else {
        println!("  {} {} {}", "✗".red().bold(), name.red(), "is not set".red());
    }
}

/// A resolved setting as `name: value`.
pub fn print_setting(name: &str, value: &str) {
    println!("  {} {}: {}", "•".cyan(), name.bold(), value);
}
