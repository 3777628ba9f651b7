//! Command-line options
//!
//! Arguments are parsed by hand into [`Options`]; the disk count stays a raw
//! string until [`parse_disk_count`] so that prompting on stdin and literal
//! arguments share one validation path.

use crate::machine::constants::{DEFAULT_SOURCE, DEFAULT_TARGET, DEFAULT_TEMP};
use crate::machine::engine::validate_disk_count;
use crate::machine::errors::MachineError;
use crate::memory::stack::StorageKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub disks: Option<String>,
    pub storage: StorageKind,
    pub source: i32,
    pub temp: i32,
    pub target: i32,
    pub tui: bool,
    pub verbose: bool,
    pub help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            disks: None,
            storage: StorageKind::Pool,
            source: DEFAULT_SOURCE,
            temp: DEFAULT_TEMP,
            target: DEFAULT_TARGET,
            tui: false,
            verbose: false,
            help: false,
        }
    }
}

pub fn usage(program_name: &str) -> String {
    format!(
        "Usage: {name} [DISKS] [options]\n\
         \n\
         Options:\n  \
           --storage <fixed|pool|linked|bytes>  frame storage backing (default: pool)\n  \
           --source <N> --temp <N> --target <N>  peg labels (default: 1 2 3)\n  \
           --tui                                step through the run interactively\n  \
           -v, --verbose                        debug logging on stderr\n  \
           -h, --help                           show this message\n\
         \n\
         Without DISKS the disk count is read from standard input.\n\
         \n\
         Examples:\n  \
           {name} 4\n  \
           {name} 5 --storage bytes\n  \
           {name} 3 --tui",
        name = program_name
    )
}

fn peg_value(flag: &str, value: Option<&String>) -> Result<i32, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} expects an integer, got '{}'", flag, value))
}

/// Parse arguments, excluding the program name
pub fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "--tui" => options.tui = true,
            "-v" | "--verbose" => options.verbose = true,
            "--storage" => {
                let value = iter.next().ok_or("--storage needs a value")?;
                options.storage = value.parse()?;
            }
            "--source" => options.source = peg_value(arg, iter.next())?,
            "--temp" => options.temp = peg_value(arg, iter.next())?,
            "--target" => options.target = peg_value(arg, iter.next())?,
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option '{}'", flag));
            }
            value => {
                if options.disks.is_some() {
                    return Err(format!("unexpected argument '{}'", value));
                }
                options.disks = Some(value.to_string());
            }
        }
    }

    if options.source == options.temp
        || options.source == options.target
        || options.temp == options.target
    {
        return Err("peg labels must be distinct".to_string());
    }

    Ok(options)
}

/// Parse and validate a disk count from a literal argument or an input line
pub fn parse_disk_count(raw: &str) -> Result<u32, MachineError> {
    let trimmed = raw.trim();
    let disk_count: i64 = trimmed.parse().map_err(|_| MachineError::InvalidArgument {
        message: format!("'{}' is not a disk count", trimmed),
    })?;
    validate_disk_count(disk_count)
}
