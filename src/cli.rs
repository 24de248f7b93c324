use crate::{
    client::Transport,
    errors::PingError,
    pinger::Pinger,
    types::{PingResult, Service},
};
use clap::{CommandFactory, Parser};
use std::{ffi::OsString, io, io::Write};
use tracing::debug;

pub const BIN_NAME: &str = "sitemap-ping";
pub const SUCCESS: u8 = 0;
pub const FAILURE: u8 = 1;

const AFTER_HELP: &str = "\
EXAMPLES:
  sitemap-ping https://example.com/sitemap.xml
  sitemap-ping https://example.com/sitemap.xml --google
  sitemap-ping https://example.com/sitemap.xml --bing
  sitemap-ping https://example.com/sitemap.xml --all

SUPPORTED FORMATS:
  - .xml files (standard XML sitemaps)
  - .xml.gz files (compressed sitemaps)
  - Sitemap index files";

#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(
    name = BIN_NAME,
    about = "Submit XML sitemaps to search engines",
    disable_help_flag = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// URL of the sitemap to submit
    #[arg(value_name = "SITEMAP_URL")]
    pub url: Option<String>,

    /// Ping only Google
    #[arg(long)]
    pub google: bool,

    /// Ping only Bing
    #[arg(long)]
    pub bing: bool,

    /// Ping both Google and Bing (default)
    #[arg(long)]
    pub all: bool,

    /// Show this help message
    #[arg(short, long)]
    pub help: bool,

    /// Show version information
    #[arg(short, long)]
    pub version: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Only(Service),
    All,
}

impl Cli {
    /// A single service only when its flag is the only one given.
    pub fn target(&self) -> Target {
        match (self.google, self.bing, self.all) {
            (true, false, false) => Target::Only(Service::Google),
            (false, true, false) => Target::Only(Service::Bing),
            _ => Target::All,
        }
    }
}

/// What is left to do once the arguments are handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Exit(u8),
    Ping { url: String, target: Target },
}

/// Parse `args` (program name first). Help, version and usage errors are
/// answered here, so they never need a configured pinger.
pub fn parse<I, A>(args: I, out: &mut impl Write, err: &mut impl Write) -> io::Result<Invocation>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => cli.resolve(out, err),
        Err(parse_err) => {
            write!(err, "{}", parse_err.render())?;
            writeln!(err, "Run \"{BIN_NAME} --help\" for more information")?;
            Ok(Invocation::Exit(FAILURE))
        }
    }
}

impl Cli {
    fn resolve(self, out: &mut impl Write, err: &mut impl Write) -> io::Result<Invocation> {
        if self.help {
            writeln!(out, "{}", Cli::command().render_help())?;
            return Ok(Invocation::Exit(SUCCESS));
        }

        if self.version {
            writeln!(out, "{BIN_NAME} version {}", env!("CARGO_PKG_VERSION"))?;
            return Ok(Invocation::Exit(SUCCESS));
        }

        let target = self.target();
        let Some(url) = self.url else {
            writeln!(err, "Error: Sitemap URL is required\n")?;
            writeln!(err, "Usage: {BIN_NAME} <sitemap-url> [options]")?;
            writeln!(err, "Run \"{BIN_NAME} --help\" for more information")?;
            return Ok(Invocation::Exit(FAILURE));
        };

        Ok(Invocation::Ping { url, target })
    }
}

/// Parse `args` and ping. Returns the process exit code.
pub async fn run<I, A, T>(
    args: I,
    pinger: &Pinger<T>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<u8>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
    T: Transport,
{
    match parse(args, out, err)? {
        Invocation::Exit(code) => Ok(code),
        Invocation::Ping { url, target } => ping(pinger, &url, target, out, err).await,
    }
}

pub async fn ping<T: Transport>(
    pinger: &Pinger<T>,
    url: &str,
    target: Target,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<u8> {
    debug!(?target, url, "resolved ping target");
    match target {
        Target::All => ping_all(pinger, url, out, err).await,
        Target::Only(service) => ping_one(pinger, service, url, out, err).await,
    }
}

/// One line with the whole cause chain, never a backtrace.
pub fn report_unexpected(error: &anyhow::Error, err: &mut impl Write) -> io::Result<u8> {
    writeln!(err, "Unexpected Error: {error:#}")?;
    Ok(FAILURE)
}

async fn ping_all<T: Transport>(
    pinger: &Pinger<T>,
    url: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<u8> {
    writeln!(out, "Pinging search engines with sitemap: {url}\n")?;

    let result = match pinger.ping_all(url).await {
        Ok(result) => result,
        Err(validation) => return report_error(&PingError::from(validation), err),
    };

    for ping in result.results() {
        if ping.succeeded() {
            write_success(ping, out)?;
        } else {
            writeln!(
                err,
                "✗ {}: Failed - {}",
                ping.service(),
                ping.error_message().unwrap_or_default()
            )?;
        }
    }

    if !result.all_succeeded() {
        writeln!(err, "\nSome pings failed. Check the errors above.")?;
        return Ok(FAILURE);
    }

    writeln!(out, "\nAll pings completed successfully!")?;
    Ok(SUCCESS)
}

async fn ping_one<T: Transport>(
    pinger: &Pinger<T>,
    service: Service,
    url: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<u8> {
    writeln!(out, "Pinging {service} with sitemap: {url}\n")?;

    match pinger.ping_service(service, url).await {
        Ok(ping) => {
            write_success(&ping, out)?;
            writeln!(out, "\nPing completed successfully!")?;
            Ok(SUCCESS)
        }
        Err(error) => report_error(&error, err),
    }
}

fn write_success(ping: &PingResult, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "✓ {}: Successfully pinged ({})",
        ping.service(),
        ping.status_code().unwrap_or_default()
    )
}

fn report_error(error: &PingError, err: &mut impl Write) -> io::Result<u8> {
    match error {
        PingError::Validation(validation) => {
            writeln!(err, "Validation Error: {validation}")?;
            writeln!(err, "\nPlease provide a valid HTTP/HTTPS sitemap URL")?;
        }
        PingError::Network(network) => {
            writeln!(err, "Network Error: {network}")?;
            if let Some(status_code) = network.status_code() {
                writeln!(err, "Status Code: {status_code}")?;
            }
        }
    }
    Ok(FAILURE)
}
