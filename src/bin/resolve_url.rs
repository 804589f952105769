//! Resolve URLs from the command line and print one JSON object per line.
//!
//! Usage: `resolve_url [--timeout <secs>] [--user-agent <ua>] [--day-first] [URL...]`
//!
//! With no URL arguments, URLs are read from stdin, one per line.
//! Set `RUST_LOG=rs_linkmeta=debug` to see why a field came out empty.

use std::env;
use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

use rs_linkmeta::{MetadataResolver, Options, SlashDateOrder};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(Options, Vec<String>), String> {
    let mut options = Options::default();
    let mut urls = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--timeout" => {
                let secs: u64 = args
                    .next()
                    .ok_or("--timeout needs a value")?
                    .parse()
                    .map_err(|_| "--timeout expects whole seconds")?;
                options.timeout = Duration::from_secs(secs);
            }
            "--user-agent" => {
                options.user_agent = args.next().ok_or("--user-agent needs a value")?;
            }
            "--day-first" => options.slash_date_order = SlashDateOrder::DayFirst,
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            _ => urls.push(arg),
        }
    }

    Ok((options, urls))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let (options, mut urls) = match parse_args(env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("Usage: resolve_url [--timeout <secs>] [--user-agent <ua>] [--day-first] [URL...]");
            std::process::exit(2);
        }
    };

    if urls.is_empty() {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if !line.is_empty() && !line.starts_with('#') {
                urls.push(line.to_string());
            }
        }
    }

    let resolver = MetadataResolver::with_options(options)?;
    let mut out = BufWriter::new(io::stdout().lock());

    for url in &urls {
        let meta = resolver.resolve(url).await;
        writeln!(out, "{}", serde_json::to_string(&meta)?)?;
        out.flush()?;
    }

    Ok(())
}
