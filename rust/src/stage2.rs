//! Access to the default-entry word inside a GRUB stage2 image.

// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::bootdefault::RawDefault;
use anyhow::{bail, Result};
use binread::BinReaderExt;
use camino::Utf8Path;
use fn_error_context::context;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};

/// Well-known location of the stage2 image.
pub const STAGE2_DEFAULT_PATH: &str = "/boot/grub/stage2";

/// Byte offset of the default-entry word: the second sector, 0xc bytes in.
pub const STAGE2_DEFAULT_OFFSET: u64 = 0x200 + 0xc;

const STAGE2_DEFAULT_END: u64 = STAGE2_DEFAULT_OFFSET + std::mem::size_of::<u32>() as u64;

// Position at the field, failing if the image does not contain all 4 bytes.
fn seek_to_default<S: Seek>(s: &mut S) -> Result<()> {
    let len = s.seek(SeekFrom::End(0))?;
    if len < STAGE2_DEFAULT_END {
        bail!(
            "Image is {len} bytes, too short to hold the default entry at offset {STAGE2_DEFAULT_OFFSET:#x}"
        );
    }
    s.seek(SeekFrom::Start(STAGE2_DEFAULT_OFFSET))?;
    Ok(())
}

/// Read the little-endian default word from a stage2 image.
pub fn read_raw_from<R: Read + Seek>(r: &mut R) -> Result<RawDefault> {
    seek_to_default(r)?;
    let raw: u32 = r.read_le()?;
    tracing::debug!("read raw default {raw:#010x}");
    Ok(RawDefault(raw))
}

/// Overwrite the default word in place; nothing else in the image is touched.
pub fn write_raw_to<W: Write + Seek>(w: &mut W, raw: RawDefault) -> Result<()> {
    seek_to_default(w)?;
    w.write_all(&raw.0.to_le_bytes())?;
    w.flush()?;
    tracing::debug!("wrote raw default {:#010x}", raw.0);
    Ok(())
}

#[context("Reading default entry from {}", path)]
pub fn read_raw(path: &Utf8Path) -> Result<RawDefault> {
    let mut f = File::open(path)?;
    read_raw_from(&mut f)
}

/// Update the default word of the image at `path`.  The file must exist;
/// it is neither created nor truncated.
#[context("Writing default entry to {}", path)]
pub fn write_raw(path: &Utf8Path, raw: RawDefault) -> Result<()> {
    crate::try_fail_point!("stage2::write-raw");
    let mut f = OpenOptions::new().read(true).write(true).open(path)?;
    write_raw_to(&mut f, raw)
}
