//! open-dragonfly CLI: one-shot configuration of VGN/VXE Dragonfly dongles.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use open_dragonfly_core::apply::{self, ApplyStatus};
use open_dragonfly_core::settings::{ConfigRequest, Debounce, MotionSync};
use open_dragonfly_core::{device, frames, pids, safety, DRAGONFLY_VID};

#[derive(Parser)]
#[command(
    name = "open-dragonfly",
    version,
    about = "Change polling rate, debounce, and MotionSync on VGN/VXE Dragonfly dongles"
)]
struct Cli {
    /// Polling rate in Hz (125, 250, 500, 1000, 2000, 4000).
    #[arg(short, long)]
    polling_rate: Option<u16>,

    /// Debounce delay in ms (0, 1, 2, 4, 8, 15, 20).
    #[arg(short, long)]
    debounce: Option<u8>,

    /// Product id of the dongle as hex (default: f505, the 4K dongle).
    #[arg(long)]
    product_id: Option<String>,

    /// Toggle MotionSync.
    #[arg(long, value_name = "on|off")]
    toggle_ms: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.polling_rate.is_none() && cli.debounce.is_none() && cli.toggle_ms.is_none() {
        // Nothing to change; print usage and bail out before any device
        // lookup happens.
        Cli::command().print_help()?;
        std::process::exit(2);
    }

    let product_id = match &cli.product_id {
        Some(hex) => parse_product_id(hex)?,
        None => pids::DONGLE_4K,
    };
    let request = build_request(&cli, product_id)?;

    if request.debounce == Some(Debounce::Ms0) {
        eprintln!("warning: {}", frames::DEBOUNCE_ZERO_WARNING);
    }

    let mut dongle = device::open_dongle(DRAGONFLY_VID, product_id)?;
    let outcomes = apply::apply(&mut dongle, &request)?;

    for outcome in &outcomes {
        match outcome.status {
            ApplyStatus::Confirmed => println!("{} set", outcome.setting),
            ApplyStatus::Unconfirmed { transferred } => println!(
                "{}: device reported {} bytes transferred; result unconfirmed",
                outcome.setting, transferred
            ),
        }
    }

    Ok(())
}

/// Validate the raw option values into a typed request.
fn build_request(cli: &Cli, product_id: u16) -> Result<ConfigRequest> {
    let mut request = ConfigRequest::default();

    if let Some(hz) = cli.polling_rate {
        request.polling_rate = Some(safety::validate_polling_rate(hz, product_id)?);
    }
    if let Some(ms) = cli.debounce {
        request.debounce = Some(safety::validate_debounce(ms)?);
    }
    if let Some(name) = &cli.toggle_ms {
        let state = MotionSync::from_name(name).ok_or_else(|| {
            anyhow::anyhow!("unknown MotionSync value '{name}' (expected on or off)")
        })?;
        request.motion_sync = Some(state);
    }

    Ok(request)
}

/// Parse a hex product id, with or without a 0x prefix.
fn parse_product_id(hex: &str) -> Result<u16> {
    let digits = hex.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16)
        .map_err(|e| anyhow::anyhow!("invalid product id '{hex}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use open_dragonfly_core::settings::PollingRate;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("open-dragonfly").chain(args.iter().copied()))
    }

    #[test]
    fn parse_product_id_accepts_bare_and_prefixed_hex() {
        assert_eq!(parse_product_id("f505").unwrap(), 0xF505);
        assert_eq!(parse_product_id("0xF58A").unwrap(), 0xF58A);
        assert!(parse_product_id("xyz").is_err());
        assert!(parse_product_id("").is_err());
    }

    #[test]
    fn build_request_validates_each_option() {
        let parsed = cli(&["-p", "1000", "-d", "8", "--toggle-ms", "on"]);
        let request = build_request(&parsed, pids::DONGLE_4K).unwrap();
        assert_eq!(request.polling_rate, Some(PollingRate::Hz1000));
        assert_eq!(request.debounce, Some(Debounce::Ms8));
        assert_eq!(request.motion_sync, Some(MotionSync::On));
    }

    #[test]
    fn build_request_rejects_rate_over_1k_cap() {
        let parsed = cli(&["-p", "2000"]);
        assert!(build_request(&parsed, pids::DONGLE_1K).is_err());
        assert!(build_request(&parsed, pids::DONGLE_4K).is_ok());
    }

    #[test]
    fn build_request_rejects_unknown_values() {
        assert!(build_request(&cli(&["-p", "300"]), pids::DONGLE_4K).is_err());
        assert!(build_request(&cli(&["-d", "7"]), pids::DONGLE_4K).is_err());
        assert!(build_request(&cli(&["--toggle-ms", "maybe"]), pids::DONGLE_4K).is_err());
    }
}
