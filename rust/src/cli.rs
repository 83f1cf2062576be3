//! Command line interface for reading and changing the stage2 default entry.

// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::bootdefault::RawDefault;
use crate::stage2::{self, STAGE2_DEFAULT_PATH};
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Debug, Parser)]
#[clap(name = "grub-set-default")]
#[clap(rename_all = "kebab-case")]
/// Read or change the GRUB 0.97 default boot entry
pub struct Opt {
    /// Path to GRUB's stage 2 binary
    #[clap(long, global = true, default_value = STAGE2_DEFAULT_PATH)]
    #[clap(value_parser)]
    path: Utf8PathBuf,

    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, clap::Subcommand)]
#[clap(rename_all = "kebab-case")]
enum Cmd {
    /// Get the default boot entry
    Get,
    /// Set the default boot entry
    Set {
        /// Default boot entry value
        #[clap(value_parser = parse_entry_value)]
        value: u8,

        /// Set the default entry for once boot
        #[clap(long)]
        once: bool,
    },
}

/// Parse an integer literal the way a Python `int(s, 0)` would, also
/// taking a bare leading `0` as octal.
fn parse_int_literal(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, digits) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
        _ => (10, digits),
    };
    // from_str_radix takes its own sign; it may not appear after a prefix
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    let v = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -v } else { v })
}

/// Parse a boot entry in [0, 0xFF] from any integer literal base.
pub fn parse_entry_value(s: &str) -> Result<u8, String> {
    parse_int_literal(s)
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| format!("'{s}' is not a positive value <= 0xFF"))
}

impl Opt {
    /// Execute the parsed command, writing the report to `out`.
    ///
    /// For `set`, the report describes the new value and is written
    /// before the image is updated.
    pub fn run(self, out: &mut impl Write) -> Result<()> {
        let raw = stage2::read_raw(&self.path)?;
        match self.cmd {
            Cmd::Get => {
                tracing::debug!("get {}", self.path);
                write!(out, "{}", raw.decode())?;
            }
            Cmd::Set { value, once } => {
                let new: RawDefault = raw.encode(value, once);
                tracing::debug!(
                    "set {}: {:#010x} -> {:#010x} (once: {once})",
                    self.path,
                    raw.0,
                    new.0
                );
                write!(out, "{}", new.decode())?;
                out.flush()?;
                stage2::write_raw(&self.path, new)?;
            }
        }
        Ok(())
    }
}

/// Primary entrypoint; `argv` includes the program name.
pub fn main(argv: &[&str]) -> Result<i32> {
    let opt = Opt::parse_from(argv);
    let stdout = std::io::stdout();
    opt.run(&mut stdout.lock())?;
    Ok(0)
}
