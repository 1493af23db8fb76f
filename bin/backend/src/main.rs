//! Match coordinator backend.
//!
//! Serves the chat bridge on BIND_ADDR (e.g. 0.0.0.0:8888) and sweeps
//! for matches whose scheduled time has come.
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "backend", about = "Tournament match coordinator")]
struct Args {
    /// Keep matches in memory instead of Postgres.
    #[arg(long)]
    memory: bool,
    /// Overrides BIND_ADDR.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    duel_core::log();
    duel_core::kys();
    let mut settings = duel_hosting::Settings::from_env()?;
    if let Some(bind) = args.bind {
        settings.bind = bind;
    }
    match (args.memory, settings.db_url.is_some()) {
        (true, _) => settings.db_url = None,
        (false, true) => {}
        (false, false) => anyhow::bail!("DB_URL must be set (or pass --memory)"),
    }
    log::info!("admins: {}", settings.admins.len());
    duel_hosting::run(settings).await
}
