//! Welcome banner display for chat sessions.

use console::style;

/// Print the banner at the start of a chat session.
pub fn print_welcome_banner(api_url: &str, organization: Option<&str>) {
    println!();
    println!("  {}", style("Pulumi Copilot").magenta().bold());
    println!("  {}", style("Ask about your cloud infrastructure").dim());
    println!();
    println!("  {}  {}", style("API:").bold(), style(api_url).dim());
    println!(
        "  {}  {}",
        style("Org:").bold(),
        style(organization.unwrap_or("chosen on first question")).dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
