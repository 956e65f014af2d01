//! Services command handler

use anyhow::Result;
use colored::*;
use servitor_domains::Catalog;

/// List all catalog services
pub fn list_services() -> Result<()> {
    println!(
        "{}",
        format!("{} service(s) available:", Catalog::ALL.len()).bold()
    );
    println!();
    for service in Catalog::ALL {
        println!("  {} {}", "▸".cyan(), service.name().bold());
        println!("    {}", service.description().dimmed());
    }

    Ok(())
}
