//! CLI argument parsing

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::Parser;
use std::path::PathBuf;
use synthprog_core::image::DEFAULT_IMAGE_DIR;
use synthprog_core::target::{Board, Device};

/// Parse a probe serial number (decimal, or hex with 0x prefix)
fn parse_snr(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex serial number: {}", e))
    } else {
        s.parse::<u32>()
            .map_err(|e| format!("Invalid serial number: {}", e))
    }
}

/// Generate dynamic help text for the tool argument
fn tool_help() -> String {
    format!(
        "Programming tool to use [available: {}]",
        crate::tools::tool_names_short()
    )
}

/// Parser for `--device`, backed by the core device names
fn device_parser() -> impl TypedValueParser<Value = Device> {
    let names = PossibleValuesParser::new(Device::ALL.map(|d| d.name()));
    names.try_map(|s| s.parse::<Device>())
}

/// Parser for `--board`, backed by the core board names
fn board_parser() -> impl TypedValueParser<Value = Board> {
    let names = PossibleValuesParser::new(Board::ALL.map(|b| b.name()));
    names.try_map(|s| s.parse::<Board>())
}

#[derive(Parser, Debug)]
#[command(name = "synthprog")]
#[command(
    author,
    version,
    about = "Programs the nRF5340 as synth or headset from precompiled binaries",
    long_about = "Programs the nRF5340 as synth or headset from precompiled binaries. \
The headset is supposed to be programmed on the nRF5340 Audio DK while the synth \
may be programmed on either the nRF5340 DK or the nRF5340 Audio DK."
)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Which device to program, either the synth or one of the headset devices
    #[arg(
        short,
        long,
        value_parser = device_parser(),
        required_unless_present_any = ["list_probes", "list_tools"]
    )]
    pub device: Option<Device>,

    /// Which type of development kit to program (required for the synth)
    #[arg(
        short,
        long,
        value_parser = board_parser(),
        required_if_eq("device", "synth")
    )]
    pub board: Option<Board>,

    /// Serial number of the probe (inferred or prompted if omitted)
    #[arg(short, long, value_parser = parse_snr)]
    pub snr: Option<u32>,

    /// Programming tool, optionally with options (e.g. nrfjprog:path=/opt/nrfjprog)
    #[arg(short, long, default_value = "nrfjprog", help = tool_help())]
    pub tool: String,

    /// Directory containing the prebuilt images
    #[arg(long, default_value = DEFAULT_IMAGE_DIR)]
    pub images: PathBuf,

    /// List the serial numbers of connected probes and exit
    #[arg(long)]
    pub list_probes: bool,

    /// List the available programming tools and exit
    #[arg(long)]
    pub list_tools: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_synth_requires_board() {
        assert!(Cli::try_parse_from(["synthprog", "-d", "synth"]).is_err());
        let cli = Cli::try_parse_from([
            "synthprog",
            "--device",
            "synth",
            "--board",
            "nrf5340_audio_dk",
        ])
        .unwrap();
        assert_eq!(cli.device, Some(Device::Synth));
        assert_eq!(cli.board, Some(Board::Nrf5340AudioDk));
        assert_eq!(cli.snr, None);
        assert_eq!(cli.tool, "nrfjprog");
        assert_eq!(cli.images, PathBuf::from("bin"));
    }

    #[test]
    fn test_headset_without_board() {
        let cli = Cli::try_parse_from(["synthprog", "-d", "left", "-s", "960012345"]).unwrap();
        assert_eq!(cli.device, Some(Device::Left));
        assert_eq!(cli.board, None);
        assert_eq!(cli.snr, Some(960012345));
    }

    #[test]
    fn test_device_required() {
        assert!(Cli::try_parse_from(["synthprog"]).is_err());
        assert!(Cli::try_parse_from(["synthprog", "-d", "center"]).is_err());
        assert!(Cli::try_parse_from(["synthprog", "--list-probes"]).is_ok());
        assert!(Cli::try_parse_from(["synthprog", "--list-tools"]).is_ok());
    }

    #[test]
    fn test_parse_snr() {
        assert_eq!(parse_snr("960012345"), Ok(960012345));
        assert_eq!(parse_snr("0x10"), Ok(16));
        assert!(parse_snr("abc").is_err());
        assert!(parse_snr("-1").is_err());
    }

    #[test]
    fn test_core_names_accepted() {
        for device in Device::ALL {
            let args = ["synthprog", "-d", device.name(), "-b", "nrf5340_dk"];
            let cli = Cli::try_parse_from(args).unwrap();
            assert_eq!(cli.device, Some(device));
        }
        for board in Board::ALL {
            let args = ["synthprog", "-d", "synth", "-b", board.name()];
            let cli = Cli::try_parse_from(args).unwrap();
            assert_eq!(cli.board, Some(board));
        }
        assert!(Cli::try_parse_from(["synthprog", "-d", "synth", "-b", "nrf52_dk"]).is_err());
    }
}
