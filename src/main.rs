use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sitegate::{
    config::Config,
    context::RequestContext,
    domain::{CreateDomainInput, StringUuid},
    hostname::normalize_hostname,
    migration,
    repository::{domain::DomainRepositoryImpl, DomainRepository},
    server::{self, AppState},
    telemetry,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "sitegate",
    about = "Host-to-site resolution for multi-tenant publishing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database if needed and apply migrations
    Migrate,
    /// Show which tenant and site a hostname resolves to
    Resolve {
        /// Hostname as it would appear in a Host header
        host: String,
    },
    /// Connect a hostname to a site
    Connect {
        /// Site id
        site_id: uuid::Uuid,
        /// Hostname to connect; normalized before storing
        hostname: String,
        /// Mark as the site's primary domain
        #[arg(long)]
        primary: bool,
        /// Mark as verified
        #[arg(long)]
        verified: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let prometheus_handle = telemetry::init(&config.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!(
                environment = ?config.resolution.environment,
                "Starting Sitegate on {}",
                config.http_addr()
            );
            server::run(config, prometheus_handle).await
        }
        Command::Migrate => migration::run_migrations(&config).await,
        Command::Resolve { host } => resolve(config, &host).await,
        Command::Connect {
            site_id,
            hostname,
            primary,
            verified,
        } => connect(config, StringUuid::from(site_id), &hostname, primary, verified).await,
    }
}

async fn resolve(config: Config, host: &str) -> Result<()> {
    let pool = server::connect_pool(&config).await?;
    let state = AppState::new(config, pool.clone());

    let resolution = state
        .resolver
        .resolve_request(host, &state.config.resolution)
        .await?;

    let Some(resolution) = resolution else {
        println!("Domain Not Connected: {}", host);
        return Ok(());
    };

    let domains = DomainRepositoryImpl::new(pool)
        .list_by_site(resolution.site.id)
        .await?;
    let hostname = normalize_hostname(host).unwrap_or_default();
    let summary = RequestContext::new(resolution, hostname).summary();

    println!("{}", serde_json::to_string_pretty(&summary)?);
    for domain in domains {
        let marker = if domain.primary { " (primary)" } else { "" };
        println!("  {}{}", domain.hostname, marker);
    }
    Ok(())
}

async fn connect(
    config: Config,
    site_id: StringUuid,
    hostname: &str,
    primary: bool,
    verified: bool,
) -> Result<()> {
    let pool = server::connect_pool(&config).await?;
    let repo = DomainRepositoryImpl::new(pool);

    let input = CreateDomainInput::new(site_id, hostname)
        .primary(primary)
        .verified(verified);

    let domain = repo
        .create(&input)
        .await
        .with_context(|| format!("Failed to connect {}", hostname))?;
    println!("Connected {} to site {}", domain.hostname, domain.site_id);
    Ok(())
}
