use clap::{Parser, Subcommand};
use ferrous_lookup_application::ports::{Lookuper, Resolver};
use ferrous_lookup_application::RequestContext;
use ferrous_lookup_domain::CliOverrides;
use ferrous_lookup_infrastructure::dns::DnsClient;
use ferrous_lookup_infrastructure::network::PolicyDialer;
use ferrous_lookup_infrastructure::system::VuContext;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

mod bootstrap;

#[derive(Parser)]
#[command(name = "ferrous-lookup")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous Lookup - DNS queries against an explicit nameserver")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Query timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Refuse connections to this hostname (`*.example.com` for subdomains)
    #[arg(long = "block-hostname", value_name = "PATTERN", global = true)]
    block_hostnames: Vec<String>,

    /// Refuse connections to addresses in this CIDR range
    #[arg(long = "blacklist-ip", value_name = "CIDR", global = true)]
    blacklist_ips: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Query a nameserver directly
    Resolve {
        /// Name to query
        name: String,

        /// Record type (A or AAAA)
        #[arg(short = 't', long = "type", default_value = "A")]
        record_type: String,

        /// Nameserver address: ip, ip:port, [ipv6] or [ipv6]:port
        #[arg(short = 'n', long, default_value = "8.8.8.8:53")]
        nameserver: String,
    },

    /// Resolve a hostname with the system resolver
    Lookup {
        /// Hostname to look up
        hostname: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        timeout_secs: cli.timeout,
        log_level: cli.log_level.clone(),
        block_hostnames: cli.block_hostnames.clone(),
        blacklist_ips: cli.blacklist_ips.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    debug!("Starting Ferrous Lookup v{}", env!("CARGO_PKG_VERSION"));

    let dialer = Arc::new(PolicyDialer::from_config(&config.network)?);
    let execution = Arc::new(VuContext::with_dialer(dialer));
    let client = DnsClient::from_config(execution, &config.client);

    let cancellation = CancellationToken::new();
    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });
    let ctx = RequestContext::new().with_cancellation(cancellation);

    let result = match &cli.command {
        Command::Resolve {
            name,
            record_type,
            nameserver,
        } => client.resolve(&ctx, name, record_type, nameserver).await,
        Command::Lookup { hostname } => client.lookup(&ctx, hostname).await,
    };

    match result {
        Ok(addresses) => {
            for address in addresses {
                println!("{}", address);
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, kind = e.name(), "Query failed");
            anyhow::bail!("{}: {}", e.name(), e)
        }
    }
}
