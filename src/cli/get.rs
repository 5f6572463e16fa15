use crate::cli::GetArgs;
use crate::manager::CacheManager;
use anyhow::{Context, Result};

pub async fn execute(manager: &CacheManager, args: &GetArgs) -> Result<()> {
    let values = manager
        .store()
        .multi_get(&args.namespace, &args.keys)
        .await
        .with_context(|| format!("Failed to read from namespace '{}'", args.namespace))?;

    for (key, value) in args.keys.iter().zip(values) {
        match value {
            Some(raw) => println!("{} = {}", key, raw),
            None => println!("{} = (nil)", key),
        }
    }

    Ok(())
}
