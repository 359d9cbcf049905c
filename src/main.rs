use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::sync::Arc;

use ginx_notify::application::config::AppConfig;
use ginx_notify::application::dispatcher::EventDispatcher;
use ginx_notify::application::heartbeat::HeartbeatScheduler;
use ginx_notify::core::error::NotifyError;
use ginx_notify::core::notifier::NotifierRegistry;
use ginx_notify::infrastructure::cookies::ChromiumCookieEncoder;
use ginx_notify::infrastructure::notification::NotifierTransport;
use ginx_notify::infrastructure::repository::FileNotifierRegistry;
use ginx_notify::infrastructure::status::ProcessStatus;
use ginx_notify::interfaces::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load or create configuration
    let created = !cli.config.exists();
    let config = if created {
        AppConfig::init_default(&cli.config)?
    } else {
        AppConfig::load(&cli.config)?
    };

    // Initialize logging, RUST_LOG wins over the configured level
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", &config.log_level);
    }
    env_logger::init();

    if created {
        info!("Created default configuration at {:?}", cli.config);
    }

    let registry: Arc<dyn NotifierRegistry> = Arc::new(FileNotifierRegistry::new(&cli.config));
    let dispatcher = Arc::new(EventDispatcher::new(
        Box::new(NotifierTransport::new()?),
        Box::new(ProcessStatus::new()),
        Box::new(ChromiumCookieEncoder),
    ));

    match cli.command {
        Commands::List => {
            let notifiers = registry.find_all().await?;

            if notifiers.is_empty() {
                println!("No notifiers configured.");
            } else {
                println!("Found {} notifiers:", notifiers.len());
                for notifier in notifiers {
                    println!("Name: {}", notifier.name);
                    println!("Method: {}", notifier.method);
                    println!("Target: {}", notifier.target);
                    println!("Event: {}", notifier.on_event);
                    println!("Enabled: {}", if notifier.enabled { "Yes" } else { "No" });
                    println!("---");
                }
            }
        }
        Commands::Test { name } => {
            let notifier = registry
                .find_by_name(&name)
                .await?
                .ok_or_else(|| NotifyError::NotifierNotFound(name.clone()))?;

            dispatcher.notify_test(&notifier).await?;

            println!("Test notification sent through {}.", name);
        }
        Commands::Enable { name } => {
            set_enabled(registry.as_ref(), &name, true).await?;
            println!("Notifier {} enabled.", name);
        }
        Commands::Disable { name } => {
            set_enabled(registry.as_ref(), &name, false).await?;
            println!("Notifier {} disabled.", name);
        }
        Commands::Run => {
            let scheduler = HeartbeatScheduler::new(Arc::clone(&registry), dispatcher);
            let handles = scheduler.startup().await?;

            if handles.is_empty() {
                warn!("No enabled heartbeat notifiers, nothing to run");
                return Ok(());
            }

            info!("Running {} heartbeat notifiers, press Ctrl-C to stop", handles.len());
            tokio::signal::ctrl_c().await?;

            for handle in handles {
                handle.abort();
            }
            info!("Shutting down");
        }
    }

    Ok(())
}

async fn set_enabled(registry: &dyn NotifierRegistry, name: &str, enabled: bool) -> Result<()> {
    let mut notifier = registry
        .find_by_name(name)
        .await?
        .ok_or_else(|| NotifyError::NotifierNotFound(name.to_string()))?;

    notifier.enabled = enabled;
    registry.update(&notifier).await
}
