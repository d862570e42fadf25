use chip8_dasm::{OddByte, Program, Syntax};

use std::io::{stdout, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chip8-dasm", version, about = "Disassemble a Chip8 ROM, one instruction per line.")]
struct Args {
    /// Path to the ROM to disassemble
    rom: PathBuf,

    /// Even address the ROM is loaded at (hexadecimal, `0x` prefix optional)
    #[arg(long, value_name = "ADDR", default_value = "0x200", value_parser = parse_address)]
    base: u16,

    /// Mnemonic syntax: `compat` reproduces the historical output, `normalized` pads operands consistently
    #[arg(long, value_enum, default_value_t = Syntax::Compat)]
    syntax: Syntax,

    /// What to do with the last byte of an odd-length ROM: `ignore` it or `pad` it with a zero byte
    #[arg(long, value_enum, default_value_t = OddByte::Ignore)]
    odd_byte: OddByte,

    /// Maximum number of threads decoding the ROM
    #[arg(long, short, value_name = "N", default_value_t = NonZeroUsize::MIN)]
    jobs: NonZeroUsize,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    let address = u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address \"{s}\": {e}"))?;
    if address % 2 != 0 {
        return Err(format!("address {address:#x} is odd, instructions start on even offsets"));
    }

    Ok(address)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> anyhow::Result<()> {
    let program = Program::open(&args.rom, args.base, args.odd_byte)
        .context("Couldn't open file!")?;

    let lines = program.listing_parallel(args.jobs, args.syntax)?;

    let mut out = BufWriter::new(stdout().lock());
    for line in &lines {
        writeln!(out, "{line}").context("write listing")?;
    }
    out.flush().context("write listing")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_hexadecimal() {
        assert_eq!(parse_address("0x200"), Ok(0x200));
        assert_eq!(parse_address("200"), Ok(0x200));
        assert!(parse_address("0x10000").is_err());
        assert!(parse_address("0x201").is_err());
        assert_eq!(parse_address("0XFFFE"), Ok(0xFFFE));
        assert!(parse_address("zz").is_err());
    }

    #[test]
    fn default_arguments() {
        let args = Args::try_parse_from(["chip8-dasm", "rom.ch8"]).unwrap();
        assert_eq!(args.base, Program::DEFAULT_BASE);
        assert_eq!(args.syntax, Syntax::Compat);
        assert_eq!(args.odd_byte, OddByte::Ignore);
        assert_eq!(args.jobs.get(), 1);
    }

    #[test]
    fn all_options() {
        let args = Args::try_parse_from([
            "chip8-dasm", "--base", "600", "--syntax", "normalized", "--odd-byte", "pad", "-j", "4", "rom.ch8",
        ]).unwrap();
        assert_eq!(args.base, 0x600);
        assert_eq!(args.syntax, Syntax::Normalized);
        assert_eq!(args.odd_byte, OddByte::Pad);
        assert_eq!(args.jobs.get(), 4);
    }

    #[test]
    fn invalid_values_are_usage_errors() {
        for argv in [
            ["chip8-dasm", "--jobs", "0", "rom.ch8"],
            ["chip8-dasm", "--base", "0x201", "rom.ch8"],
            ["chip8-dasm", "--syntax", "intel", "rom.ch8"],
            ["chip8-dasm", "--odd-byte", "drop", "rom.ch8"],
        ] {
            let err = Args::try_parse_from(argv).unwrap_err();
            assert!(
                matches!(err.kind(), clap::error::ErrorKind::InvalidValue | clap::error::ErrorKind::ValueValidation),
                "{argv:?}: {:?}", err.kind(),
            );
            assert_eq!(err.exit_code(), 2, "{argv:?}");
        }
    }
}
