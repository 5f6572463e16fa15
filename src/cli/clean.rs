use std::io::Write;

use crate::cli::CleanArgs;
use crate::manager::CacheManager;
use crate::sync::invalidation::invalidation_keys;
use anyhow::{Context, Result};

pub async fn execute(manager: &CacheManager, args: &CleanArgs) -> Result<()> {
    let keys = invalidation_keys(&args.identity, args.fields.iter().map(String::as_str));

    if args.confirm {
        println!(
            "Preparing to clean identity '{}' in namespace '{}':",
            args.identity, args.namespace
        );
        for key in &keys {
            println!("  - {}", key);
        }
        print!("\nDo you want to continue? [y/N]: ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if input.trim().to_lowercase() != "y" {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let removed = manager
        .store()
        .delete(&args.namespace, &keys)
        .await
        .with_context(|| format!("Failed to clean identity '{}'", args.identity))?;

    println!(
        "\n✅ Removed {} of {} keys for identity: {}",
        removed,
        keys.len(),
        args.identity
    );

    Ok(())
}
