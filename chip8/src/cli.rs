use std::path::PathBuf;

use clap::{ArgAction, Parser};

use chip8_core::{CLOCK_SPEED, TIMER_SPEED};

/// Runs a Chip-8 program in a window
#[derive(Parser, Debug)]
#[command(name = "emu8", version, about)]
pub struct Args {
    /// Raw program image, loaded at 0x200
    pub rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = CLOCK_SPEED, value_parser = clap::value_parser!(u32).range(1..))]
    pub clock_hz: u32,

    /// Timer ticks (and redraw checks) per second
    #[arg(long, default_value_t = TIMER_SPEED, value_parser = clap::value_parser!(u32).range(1..))]
    pub timer_hz: u32,

    /// Size of a Chip-8 pixel on screen
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub scale: u32,

    /// Seed for the random number instruction, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log more; repeat for more detail (-vvv traces every instruction)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// The log filter implied by the number of `-v` flags
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["emu8", "roms/pong.ch8"].iter()).unwrap();
        assert_eq!(args.rom, PathBuf::from("roms/pong.ch8"));
        assert_eq!(args.clock_hz, 500);
        assert_eq!(args.timer_hz, 60);
        assert_eq!(args.scale, 10);
        assert_eq!(args.seed, None);
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from(
            [
                "emu8",
                "--clock-hz",
                "700",
                "--seed",
                "42",
                "-vv",
                "game.ch8",
            ]
            .iter(),
        )
        .unwrap();
        assert_eq!(args.clock_hz, 700);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_rejects_zero_rates() {
        assert!(Args::try_parse_from(["emu8", "--clock-hz", "0", "game.ch8"].iter()).is_err());
        assert!(Args::try_parse_from(["emu8", "--timer-hz", "0", "game.ch8"].iter()).is_err());
    }

    #[test]
    fn test_requires_rom() {
        assert!(Args::try_parse_from(["emu8"].iter()).is_err());
    }
}
