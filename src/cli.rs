use clap::Parser;
use log::LevelFilter;
use usbio::{literal, logging, OutputFormat, PortPin, Protocol};

const EXAMPLES: &str = "\
Examples:
  $ sudo usbio 0xabcd
  0xABCD
  $ sudo usbio -f bin
  0b1010101111001101
  $ sudo usbio -p 1
  0
  $ sudo usbio -i 0x55AA
  0x55AA
  $ sudo usbio
  0xAA55
  $ sudo usbio -f 'port={:#06x}'
  port=0xaa55";

/// Control Morphy USB-IO and compatible devices
///
/// Reads the 16-bit port state of the selected board and prints it. When a
/// new port value is given it is written first; with -p only that pin is
/// changed and the other 15 keep their current level.
#[derive(Debug, Parser)]
#[command(
    name = "usbio",
    about,
    disable_version_flag = true,
    allow_negative_numbers = true,
    after_help = EXAMPLES
)]
pub(crate) struct Cli {
    /// USB vendor id to look for
    #[arg(short = 'V', long = "vid", value_name = "VID", default_value = "0x0BFE", value_parser = u16_literal)]
    pub(crate) vid: u16,
    /// USB product id to look for
    #[arg(short = 'P', long = "pid", value_name = "PID", default_value = "0x1003", value_parser = u16_literal)]
    pub(crate) pid: u16,
    /// Use the N-th device found
    #[arg(short = 'n', long = "nth", value_name = "N", default_value = "0", value_parser = index_literal)]
    pub(crate) nth: usize,
    /// Operate only on pin N (keep other pins as-is); -1 for the whole port
    #[arg(short = 'p', long = "pin", value_name = "N", default_value = "-1", value_parser = pin_selector)]
    pub(crate) pin: i64,
    /// Output format: hex, bin, or a template such as '{:016b}'
    #[arg(short = 'f', long = "format", value_name = "FORMAT", default_value = "hex", value_parser = output_format)]
    pub(crate) format: OutputFormat,
    /// Inverted logic mode
    #[arg(short = 'i', long = "invert")]
    pub(crate) invert: bool,
    /// Log level (CRITICAL, ERROR, WARNING, INFO, DEBUG, TRACE)
    #[arg(
        short = 'D',
        long = "debug",
        value_name = "LOGLEVEL",
        num_args = 0..=1,
        default_value = logging::DEFAULT_LEVEL_NAME,
        default_missing_value = logging::BARE_FLAG_LEVEL_NAME,
        value_parser = log_level
    )]
    pub(crate) debug: LevelFilter,
    /// Report layout spoken by the device: split or four-byte
    #[arg(short = 'm', long = "protocol", value_name = "PROTOCOL", default_value = "split", value_parser = protocol)]
    pub(crate) protocol: Protocol,
    /// Delay after each report, in milliseconds
    #[arg(long = "settle-ms", value_name = "MS", default_value_t = 300)]
    pub(crate) settle_ms: u64,
    /// List matching devices and exit
    #[arg(short = 'l', long = "list")]
    pub(crate) list: bool,
    /// New port value (0x, 0o, 0b or decimal); omit to only read
    #[arg(value_name = "NEW_PORT_VALUE", value_parser = port_literal)]
    pub(crate) value: Option<i64>,
}

fn u16_literal(value: &str) -> Result<u16, String> {
    literal::parse_u16_literal(value).map_err(|e| e.to_string())
}

fn index_literal(value: &str) -> Result<usize, String> {
    literal::parse_index_literal(value).map_err(|e| e.to_string())
}

fn port_literal(value: &str) -> Result<i64, String> {
    literal::parse_port_literal(value).map_err(|e| e.to_string())
}

fn pin_selector(value: &str) -> Result<i64, String> {
    let selector = literal::parse_literal(value).map_err(|e| e.to_string())?;
    PortPin::from_selector(selector).map_err(|e| e.to_string())?;
    Ok(selector)
}

fn output_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(value).map_err(|e| e.to_string())
}

fn log_level(value: &str) -> Result<LevelFilter, String> {
    logging::level_filter(value).map_err(|e| e.to_string())
}

fn protocol(value: &str) -> Result<Protocol, String> {
    value.parse::<Protocol>().map_err(|e| e.to_string())
}
