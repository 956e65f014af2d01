//! Domains command handler
//!
//! Lists the records held in the registry file.

use anyhow::Result;
use colored::*;
use servitor_domains::{Domain, Registry};

use crate::config::Config;

/// List all registered domains
pub fn list_domains(config: &Config) -> Result<()> {
    let domains = config.open_registry()?.list();

    if domains.is_empty() {
        println!("{}", "No domains registered.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} registered domain(s):", domains.len()).bold()
        );
        println!();
        for domain in domains {
            print_domain_summary(&domain);
        }
    }

    Ok(())
}

/// Print a domain summary
fn print_domain_summary(domain: &Domain) {
    println!("  {} {}", "▸".cyan(), domain.fqdn.bold());
    println!("    Owner:        {}", domain.owner);
    println!(
        "    Registered:   {}",
        domain
            .registered_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!(
        "    Expires:      {}",
        domain
            .expires_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}
