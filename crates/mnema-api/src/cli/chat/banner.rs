//! Welcome banner for the chat session.

use console::style;

/// Print the session banner: server, seeded context size, and the
/// command hint.
pub fn print_welcome_banner(server_url: &str, context_nodes: usize) {
    println!();
    println!(
        "  {} {} v{}",
        style("◈").cyan().bold(),
        style("Mnema").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "  {}",
        style(format!("connected to {server_url}")).dim()
    );
    if context_nodes > 0 {
        println!(
            "  {}",
            style(format!(
                "{context_nodes} recent graph node{} in context",
                if context_nodes == 1 { "" } else { "s" }
            ))
            .dim()
        );
    }
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit.").dim()
    );
    println!();
}
