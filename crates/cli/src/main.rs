use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};
use uniproxy_domain::{CliOverrides, Config, QueryProtocol, RecordType};
use uniproxy_infrastructure::dns::resolver_for;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "uniproxy")]
#[command(version)]
#[command(about = "uniproxy - forward HTTP proxy with its own DNS client")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Proxy port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// DNS server used for upstream hosts (udp://IP:PORT or tcp://IP:PORT)
    #[arg(long, value_name = "URL")]
    dns_server: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log every request and response head
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the proxy until interrupted (default)
    Serve,

    /// Query the configured DNS server and print the decoded reply
    Lookup {
        name: String,

        /// Record type mnemonic
        #[arg(short = 't', long = "type", default_value = "A")]
        record_type: String,

        /// Use TCP regardless of the configured protocol
        #[arg(long)]
        tcp: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind.clone(),
        dns_server: cli.dns_server.clone(),
        log_level: cli.log_level.clone(),
        verbose: cli.verbose,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Lookup {
            name,
            record_type,
            tcp,
        } => lookup(&config, &name, &record_type, tcp).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting uniproxy v{}", env!("CARGO_PKG_VERSION"));

    let services = di::ProxyServices::new(&config)?;
    let listener = server::bind_listener(&config.server.listen_addr())?;

    let proxy = Arc::clone(&services.server);
    tokio::select! {
        _ = proxy.serve(listener) => {
            error!("Proxy server stopped accepting connections");
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn lookup(config: &Config, name: &str, record_type: &str, tcp: bool) -> anyhow::Result<()> {
    let record_type: RecordType = record_type
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown record type '{}'", record_type))?;

    let mut endpoint = config.dns.endpoint()?;
    if tcp {
        endpoint = endpoint.with_protocol(QueryProtocol::Tcp);
    }

    let reply = resolver_for(&endpoint, config.dns.query_timeout())
        .execute(name, record_type)
        .await?;

    println!(";; server {}", endpoint);
    print!("{}", reply);
    Ok(())
}
