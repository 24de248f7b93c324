use anyhow::Context;
use sitemap_ping::{
    bootstrap,
    cli::{self, Invocation},
    Config, HttpTransport, Pinger,
};
use std::{io, process::ExitCode};
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    bootstrap::init();

    let code = run().await.unwrap_or_else(|err| {
        cli::report_unexpected(&err, &mut io::stderr()).unwrap_or(cli::FAILURE)
    });

    ExitCode::from(code)
}

async fn run() -> anyhow::Result<u8> {
    let mut out = io::stdout();
    let mut err = io::stderr();

    let (url, target) = match cli::parse(std::env::args_os(), &mut out, &mut err)? {
        Invocation::Exit(code) => return Ok(code),
        Invocation::Ping { url, target } => (url, target),
    };

    // config is only needed once there is something to ping
    let pinger = setup()?;
    let code = cli::ping(&pinger, &url, target, &mut out, &mut err).await?;
    Ok(code)
}

fn setup() -> anyhow::Result<Pinger<HttpTransport>> {
    let config = Config::from_env().context("Fail to load configuration")?;
    debug!(?config, "loaded configuration");
    let transport = HttpTransport::new().context("Fail to init http client")?;
    Ok(Pinger::new(transport, config))
}
