//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(gateway_url: &str, session_id: &str) {
    println!();
    println!("  {} {}", "*", style("AI Assistant").cyan().bold());
    println!();
    println!(
        "  {}  {}",
        style("Gateway:").bold(),
        style(gateway_url).dim()
    );
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(session_id).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
