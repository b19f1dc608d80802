mod cli;

use showreel::{
    config,
    media::{default_strategies, MediaKind, MediaRoot, MediaStore},
    server,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting Showreel media server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "showreel=debug,tower_http=debug".to_string()
        } else {
            "showreel=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Resolve => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(resolve_root(cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("showreel {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn resolve_root(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let root = MediaRoot::resolve(&default_strategies(&config.media.configured_roots()));

    println!("Candidates:");
    for candidate in root.candidates() {
        let status = if candidate.exists { "✓" } else { "✗" };
        println!("  {} {}", status, candidate.path.display());
    }

    println!();
    if root.is_found() {
        println!("Public root: {}", root.root().display());
    } else {
        println!(
            "Public root: {} (not found, media will be empty)",
            root.root().display()
        );
    }

    let store = MediaStore::new(root);
    for kind in MediaKind::ALL {
        let files = store.list(kind).await?;
        println!(
            "  {}: {} file(s) in {}",
            kind.subdir(),
            files.len(),
            store.root().dir(kind).display()
        );
        for name in files {
            println!("    {}", name);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Serve site: {}", config.server.serve_site);
            println!("  Configured roots: {}", config.media.configured_roots().len());
            println!("  Stream chunk size: {}", config.media.stream_chunk_size);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
