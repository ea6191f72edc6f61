//! Octatrack `.ot` sample attribute files
//!
//! # Layout
//!
//! Fixed 0x340 bytes, multi-byte fields big-endian, everything not listed is zero:
//!
//! ```text
//! 0x000  "FORM"
//! 0x008  "DPS1"
//! 0x00C  "SMPA"
//! 0x017  tempo        u32  (bpm * 24)
//! 0x02B  constant     u16  (0x30)
//! 0x03A  slice table  64 x (start u32, end u32, loop u32)
//! 0x33A  slice count  u32
//! 0x33E  checksum     u16  ((0xFFFF - sum(bytes[..0x33E])) & 0xFFFF)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::{ExportError, ExportResult};

/// Total file size
pub const OT_SIZE: usize = 0x340;

/// Slice table start
pub const SLICE_TABLE_OFFSET: usize = 0x3A;

/// Bytes per slice entry (start, end, loop point)
pub const SLICE_ENTRY_SIZE: usize = 12;

/// Slice count field
pub const SLICE_COUNT_OFFSET: usize = 0x33A;

/// Checksum field (last two bytes)
pub const CHECKSUM_OFFSET: usize = OT_SIZE - 2;

/// Slice table capacity: entries that fit before the count field
pub const MAX_SLICES: usize = (SLICE_COUNT_OFFSET - SLICE_TABLE_OFFSET) / SLICE_ENTRY_SIZE;

const TEMPO_OFFSET: usize = 0x17;
const CONSTANT_OFFSET: usize = 0x2B;
const CONSTANT_VALUE: u16 = 0x30;
const TEMPO_SCALE: u32 = 24;

/// One slice, in sample frames of the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub start: u32,
    pub end: u32,
    pub loop_point: u32,
}

/// Checksum over everything before the checksum field
pub fn checksum(bytes: &[u8]) -> u16 {
    let end = bytes.len().min(CHECKSUM_OFFSET);
    let sum: u32 = bytes[..end].iter().map(|&b| b as u32).sum();
    (0xFFFFu32.wrapping_sub(sum) & 0xFFFF) as u16
}

/// Serialize a complete attribute file
pub fn encode(bpm: u32, slices: &[Slice]) -> ExportResult<[u8; OT_SIZE]> {
    if slices.len() > MAX_SLICES {
        return Err(ExportError::TooManySlices {
            count: slices.len(),
            max: MAX_SLICES,
        });
    }
    let tempo = bpm
        .checked_mul(TEMPO_SCALE)
        .ok_or(ExportError::TempoOutOfRange(bpm))?;

    let mut buf = [0u8; OT_SIZE];
    buf[0x00..0x04].copy_from_slice(b"FORM");
    buf[0x08..0x0C].copy_from_slice(b"DPS1");
    buf[0x0C..0x10].copy_from_slice(b"SMPA");
    put_u32(&mut buf, TEMPO_OFFSET, tempo);
    put_u16(&mut buf, CONSTANT_OFFSET, CONSTANT_VALUE);

    for (i, slice) in slices.iter().enumerate() {
        let at = SLICE_TABLE_OFFSET + i * SLICE_ENTRY_SIZE;
        put_u32(&mut buf, at, slice.start);
        put_u32(&mut buf, at + 4, slice.end);
        put_u32(&mut buf, at + 8, slice.loop_point);
    }
    put_u32(&mut buf, SLICE_COUNT_OFFSET, slices.len() as u32);

    let sum = checksum(&buf);
    put_u16(&mut buf, CHECKSUM_OFFSET, sum);
    Ok(buf)
}

/// Source path with its extension replaced by `.ot`
pub fn ot_path_for(source: &Path) -> PathBuf {
    source.with_extension("ot")
}

/// Encode and write next to `source`, returning the written path
pub fn write_ot(source: &Path, bpm: u32, slices: &[Slice]) -> ExportResult<PathBuf> {
    let bytes = encode(bpm, slices)?;
    let path = ot_path_for(source);
    fs::write(&path, bytes).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;
    log::info!("Wrote {:?} ({} slices, {} BPM)", path, slices.len(), bpm);
    Ok(path)
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_be_bytes());
}

fn put_u16(buf: &mut [u8], at: usize, value: u16) {
    buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_u32(buf: &[u8], at: usize) -> u32 {
        u32::from_be_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
    }

    fn read_u16(buf: &[u8], at: usize) -> u16 {
        u16::from_be_bytes([buf[at], buf[at + 1]])
    }

    #[test]
    fn test_header_fields_at_120_bpm() {
        let buf = encode(120, &[]).unwrap();
        assert_eq!(buf.len(), 0x340);
        assert_eq!(&buf[0..4], b"FORM");
        assert_eq!(&buf[8..12], b"DPS1");
        assert_eq!(&buf[12..16], b"SMPA");
        assert_eq!(read_u32(&buf, 0x17), 2880);
        assert_eq!(read_u16(&buf, 0x2B), 0x30);
        assert_eq!(read_u32(&buf, 0x33A), 0);
        // Bytes outside the fields stay zero
        assert!(buf[0x10..0x17].iter().all(|&b| b == 0));
        assert!(buf[0x3A..0x33A].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_checksum_round_trip() {
        let slices = [
            Slice { start: 0, end: 22050, loop_point: 0 },
            Slice { start: 22050, end: 44100, loop_point: 30000 },
        ];
        let buf = encode(174, &slices).unwrap();
        assert_eq!(read_u16(&buf, CHECKSUM_OFFSET), checksum(&buf));

        // Sum of payload plus checksum wraps to 0xFFFF
        let payload: u32 = buf[..CHECKSUM_OFFSET].iter().map(|&b| b as u32).sum();
        assert_eq!((payload + checksum(&buf) as u32) & 0xFFFF, 0xFFFF);
    }

    #[test]
    fn test_checksum_wraps_large_sums() {
        let bytes = [0xFFu8; OT_SIZE];
        let sum = (CHECKSUM_OFFSET as u32) * 0xFF;
        assert_eq!(checksum(&bytes), (0x1_0000 + 0xFFFF - (sum & 0xFFFF)) as u16);
    }

    #[test]
    fn test_slice_table_entries() {
        let slices: Vec<Slice> = (0..MAX_SLICES as u32)
            .map(|i| Slice { start: i * 100, end: i * 100 + 99, loop_point: i * 100 + 50 })
            .collect();
        let buf = encode(90, &slices).unwrap();

        assert_eq!(MAX_SLICES, 64);
        assert_eq!(read_u32(&buf, 0x33A), 64);
        let last = SLICE_TABLE_OFFSET + 63 * SLICE_ENTRY_SIZE;
        assert_eq!(read_u32(&buf, last), 6300);
        assert_eq!(read_u32(&buf, last + 4), 6399);
        assert_eq!(read_u32(&buf, last + 8), 6350);
    }

    #[test]
    fn test_slice_overflow_rejected() {
        let slices = vec![Slice { start: 0, end: 1, loop_point: 0 }; MAX_SLICES + 1];
        assert!(matches!(
            encode(120, &slices),
            Err(ExportError::TooManySlices { count: 65, max: 64 })
        ));
    }

    #[test]
    fn test_tempo_overflow_rejected() {
        assert!(matches!(
            encode(u32::MAX, &[]),
            Err(ExportError::TempoOutOfRange(_))
        ));
    }

    #[test]
    fn test_write_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("break.loop.wav");

        let written = write_ot(&source, 120, &[]).unwrap();
        assert_eq!(written, dir.path().join("break.loop.ot"));

        let bytes = std::fs::read(&written).unwrap();
        assert_eq!(bytes.len(), OT_SIZE);
        assert_eq!(read_u32(&bytes, 0x17), 2880);
    }
}
