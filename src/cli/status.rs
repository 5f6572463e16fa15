use crate::cli::StatusArgs;
use crate::config::Config;
use crate::manager::CacheManager;
use crate::utils::redaction::{redact_connection_string, redact_value};
use anyhow::{anyhow, Result};
use secrecy::ExposeSecret;

/// 连接并探测存储，连接失败与探测失败都视为不可达
async fn check_reachability(config: &Config) -> String {
    let manager = match CacheManager::init(config.clone()).await {
        Ok(manager) => manager,
        Err(e) => return format!("❌ UNREACHABLE ({})", e),
    };
    match manager.store().ping().await {
        Ok(()) => "✅ REACHABLE".to_string(),
        Err(e) => format!("❌ UNREACHABLE ({})", e),
    }
}

pub async fn execute(config: Config, args: &StatusArgs) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    let store = &config.store;

    println!("=== Live Attribute Store Status ===\n");
    println!("Mode:       {:?}", store.mode);
    println!(
        "Target:     {}",
        redact_connection_string(store.connection_string.expose_secret())
    );
    println!("Status:     {}", check_reachability(&config).await);

    if args.verbose {
        println!("Prefix:     {:?}", config.global.namespace_prefix);
        println!("Connect:    {}ms", store.connection_timeout_ms);
        println!("Command:    {}ms", store.command_timeout_ms);
        println!("TLS:        {}", store.enable_tls);
        if let Some(password) = &store.password {
            println!("Password:   {}", redact_value(password.expose_secret(), 0));
        }
        if let Some(sentinel) = &store.sentinel {
            println!(
                "Sentinel:   {} via {}",
                sentinel.master_name,
                sentinel.nodes.join(",")
            );
        }
        if let Some(cluster) = &store.cluster {
            println!("Cluster:    {}", cluster.nodes.join(","));
        }
    }

    Ok(())
}
