use anyhow::Context;
use clap::Parser;
use registry_store::core::{ConfigProvider, RegistrySource};
use registry_store::utils::{logger, validation::Validate};
use registry_store::{
    CdnValidatorSource, CliConfig, GithubRegistry, LocalRegistry, RegistryStore, TomlConfig,
};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting registry-store CLI");

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    std::process::exit(1);
                }
            };
            run(&config, &cli).await
        }
        None => run(&cli, &cli).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ Registry load failed: {:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(2);
    }

    Ok(())
}

async fn run<C: ConfigProvider + Validate>(config: &C, cli: &CliConfig) -> anyhow::Result<()> {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let validators = CdnValidatorSource::new(config)?;

    match config.registry_dir() {
        Some(dir) => {
            tracing::info!("📂 Using local registry at {}", dir);
            report(RegistryStore::new(LocalRegistry::new(dir), validators), cli).await
        }
        None => {
            tracing::info!(
                "🌐 Using GitHub registry {}/{}@{}",
                config.registry_owner(),
                config.registry_repo(),
                config.registry_branch()
            );
            let registry = GithubRegistry::new(config)?;
            report(RegistryStore::new(registry, validators), cli).await
        }
    }
}

async fn report<R: RegistrySource>(
    store: RegistryStore<R, CdnValidatorSource>,
    cli: &CliConfig,
) -> anyhow::Result<()> {
    let summary = store.load().await.context("loading registry data")?;

    let Some(chain) = &cli.chain else {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("✅ Registry loaded");
            println!("   Chains:         {}", summary.chains);
            println!("   Routes:         {}", summary.routes);
            println!("   Warp routes:    {}", summary.warp_routes);
            println!("   Validator sets: {}", summary.validator_chains);
        }
        return Ok(());
    };

    let Some(metadata) = store.get_chain(chain) else {
        anyhow::bail!("unknown chain '{}'", chain);
    };
    let addresses = store.get_addresses(chain);
    let validators = store.get_validators(chain);
    let threshold = store.get_threshold(chain);
    let warp_routes = store.get_warp_routes(chain);

    if cli.json {
        let output = json!({
            "chain": metadata,
            "addresses": addresses,
            "validators": validators,
            "threshold": threshold,
            "warpRoutes": warp_routes.warp_routes,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "⛓️  {} (chain id {}, {})",
        metadata.display_name.as_deref().unwrap_or(&metadata.name),
        metadata.chain_id,
        metadata.protocol
    );
    if let Some(domain_id) = metadata.domain_id {
        println!("   Domain id: {}", domain_id);
    }

    match addresses {
        Some(addresses) => {
            println!("📜 Addresses:");
            for (name, address) in addresses {
                println!("   {:<32} {}", name, address);
            }
        }
        None => println!("📜 Addresses: none"),
    }

    match validators {
        Some(validators) => {
            let threshold = threshold.map_or_else(|| "?".to_string(), |t| t.to_string());
            println!("🛡️  Validators ({} of {}):", threshold, validators.len());
            for validator in validators {
                println!(
                    "   {} {}",
                    validator.address,
                    validator.alias.as_deref().unwrap_or("")
                );
            }
        }
        None => println!("🛡️  Validators: none"),
    }

    println!("🔀 Warp routes: {}", warp_routes.warp_routes_array.len());
    for (id, config) in &warp_routes.warp_routes_array {
        let chains: Vec<&str> = config.tokens.iter().map(|t| t.chain_name.as_str()).collect();
        println!("   {:<40} {}", id, chains.join(" <-> "));
    }

    Ok(())
}
