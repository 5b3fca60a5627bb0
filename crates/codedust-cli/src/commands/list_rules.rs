//! List rules command implementation.

use codedust_core::RuleCode;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<8} {:<32} {:<13} Description",
        "Code", "Name", "Category"
    );
    println!("{}", "-".repeat(100));

    for code in RuleCode::ALL {
        println!(
            "{:<8} {:<32} {:<13} {}",
            code.as_str(),
            code.name(),
            code.category().to_string(),
            code.description()
        );
    }

    println!("\nAll rules are enabled by default. Disable one per extension, e.g.:");
    println!("  [py]");
    println!("  CD0201 = disable");
}
