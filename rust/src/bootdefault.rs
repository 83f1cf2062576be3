//! Encoding of the GRUB 0.97 "saved default" word.
//!
//! The stage2 image carries a single 32-bit value describing which menu
//! entry boots by default.  The low byte holds the permanent entry; when
//! bit 16 is set, bits 8..15 hold an entry to boot exactly once, after
//! which GRUB falls back to the permanent one.

// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

/// Bit marking that a one-time entry is armed.
pub const STAGE2_ONCEONLY_ENTRY: u32 = 0x10000;

const ENTRY_MASK: u32 = 0xff;

/// The raw default-entry word as stored in stage2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawDefault(pub u32);

/// Semantic view of a [`RawDefault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedDefault {
    pub raw: RawDefault,
    /// The entry booted on normal boots.
    pub entry: u8,
    /// The one-time entry, present only when the once flag is set.
    ///
    /// Bits above 16 are not masked off; for values written by this
    /// tool this always fits in a byte.
    pub once_entry: Option<u32>,
}

impl DecodedDefault {
    pub fn boot_once(&self) -> bool {
        self.once_entry.is_some()
    }
}

impl RawDefault {
    /// Split the raw word into its fields.  Total over all inputs.
    pub fn decode(self) -> DecodedDefault {
        let raw = self.0;
        let once_entry =
            (raw & STAGE2_ONCEONLY_ENTRY != 0).then(|| (raw & !STAGE2_ONCEONLY_ENTRY) >> 8);
        DecodedDefault {
            raw: self,
            entry: (raw & ENTRY_MASK) as u8,
            once_entry,
        }
    }

    /// Compute the word to store when setting `entry`.
    ///
    /// With `once`, the permanent entry from `self` is kept and `entry`
    /// is installed as the one-time entry; anything above the low byte
    /// of `self` is dropped.  Without it, `entry` becomes the whole word.
    pub fn encode(self, entry: u8, once: bool) -> RawDefault {
        if once {
            RawDefault((self.0 & ENTRY_MASK) | (u32::from(entry) << 8) | STAGE2_ONCEONLY_ENTRY)
        } else {
            RawDefault(u32::from(entry))
        }
    }
}

impl fmt::Display for DecodedDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let boot_once = if self.boot_once() { "True" } else { "False" };
        writeln!(f, "Raw default value:    0x{:08x}", self.raw.0)?;
        writeln!(f, "Boot once only:       {boot_once}")?;
        if let Some(once_entry) = self.once_entry {
            writeln!(f, "Default entry (once): {once_entry}")?;
        }
        writeln!(f, "Default entry:        {}", self.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    // Rebuild the low 17 bits from the decoded fields.
    fn reassemble(d: &DecodedDefault) -> u32 {
        match d.once_entry {
            Some(once) => u32::from(d.entry) | ((once << 8) & 0xff00) | STAGE2_ONCEONLY_ENTRY,
            None => u32::from(d.entry),
        }
    }

    #[test]
    fn test_decode_plain() {
        let d = RawDefault(0x5).decode();
        assert_eq!(d.entry, 5);
        assert!(!d.boot_once());
        assert_eq!(d.once_entry, None);
    }

    #[test]
    fn test_decode_once() {
        let d = RawDefault(0x0001_0203).decode();
        assert!(d.boot_once());
        assert_eq!(d.once_entry, Some(2));
        assert_eq!(d.entry, 3);
    }

    #[test]
    fn test_decode_keeps_high_bits() {
        let d = RawDefault(0x0101_0304).decode();
        assert_eq!(d.entry, 4);
        assert_eq!(d.once_entry, Some(0x10003));
        // Without the once flag nothing but the low byte is looked at
        let d = RawDefault(0xffff_0009 & !STAGE2_ONCEONLY_ENTRY).decode();
        assert_eq!(d.entry, 9);
        assert_eq!(d.once_entry, None);
    }

    #[test]
    fn test_decode_reassemble() {
        let samples = [
            0u32,
            0xff,
            0x100,
            0x0001_0000,
            0x0001_ffff,
            0x0001_0203,
            0x00fe_ff01,
            0xdead_beef,
            0xffff_ffff,
        ];
        for raw in samples {
            let d = RawDefault(raw).decode();
            if d.boot_once() {
                assert_eq!(reassemble(&d), raw & 0x1ffff, "raw: {raw:#x}");
            } else {
                assert_eq!(reassemble(&d), raw & 0xff, "raw: {raw:#x}");
            }
        }
    }

    #[test]
    fn test_encode_permanent() {
        for old in [0u32, 0x0001_0907, 0xffff_ffff] {
            for n in [0u8, 3, 255] {
                assert_eq!(RawDefault(old).encode(n, false), RawDefault(n.into()));
            }
        }
    }

    #[test]
    fn test_encode_once() {
        assert_eq!(RawDefault(0x7).encode(9, true), RawDefault(0x0001_0907));
        for old in [0u32, 0x7, 0x0001_0203, 0xffff_ffff] {
            for n in [0u8, 1, 128, 255] {
                let new = RawDefault(old).encode(n, true);
                assert_eq!(new.0 & 0xff, old & 0xff);
                assert_ne!(new.0 & STAGE2_ONCEONLY_ENTRY, 0);
                assert_eq!(new.0 >> 17, 0);
                assert_eq!(new.decode().once_entry, Some(n.into()));
            }
        }
    }

    #[test]
    fn test_display() {
        similar_asserts::assert_eq!(
            RawDefault(0x5).decode().to_string(),
            indoc! { "
                Raw default value:    0x00000005
                Boot once only:       False
                Default entry:        5
"}
        );
        similar_asserts::assert_eq!(
            RawDefault(0x0001_0203).decode().to_string(),
            indoc! { "
                Raw default value:    0x00010203
                Boot once only:       True
                Default entry (once): 2
                Default entry:        3
"}
        );
    }
}
