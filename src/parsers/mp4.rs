//! MP4 declared-duration reader
//!
//! Reads the movie header (`moov/mvhd`) and converts its duration from timescale units
//! to whole seconds. Only box headers on the path to `mvhd` are visited; sample tables
//! and media data are skipped by seeking.

use std::io::{Read, Seek, SeekFrom};

use anyhow::{Context, Result, bail};
use byteorder::{BigEndian, ReadBytesExt};

const BOX_MOOV: [u8; 4] = *b"moov";
const BOX_MVHD: [u8; 4] = *b"mvhd";

/// Byte range of a box body within the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoxSpan {
    body_start: u64,
    end: u64,
}

/// Scan sibling boxes in `[start, end)` for the first box of type `wanted`
fn find_box<R: Read + Seek + ?Sized>(
    reader: &mut R,
    start: u64,
    end: u64,
    wanted: [u8; 4],
) -> Result<Option<BoxSpan>> {
    let mut pos = start;

    while end.saturating_sub(pos) >= 8 {
        reader.seek(SeekFrom::Start(pos)).context("Failed to seek to box header")?;
        let size32 = reader.read_u32::<BigEndian>().context("Failed to read box size")?;
        let mut box_type = [0u8; 4];
        reader.read_exact(&mut box_type).context("Failed to read box type")?;

        let (header_len, box_len) = match size32 {
            // Box extends to the end of its container
            0 => (8, end - pos),
            1 => {
                let size64 = reader.read_u64::<BigEndian>().context("Failed to read box largesize")?;
                (16, size64)
            }
            n => (8, u64::from(n)),
        };

        if box_len < header_len {
            bail!(
                "Box '{}' at offset {} declares size {} smaller than its header",
                String::from_utf8_lossy(&box_type),
                pos,
                box_len
            );
        }

        let Some(box_end) = pos.checked_add(box_len) else {
            bail!(
                "Box '{}' at offset {} declares size {} beyond any stream length",
                String::from_utf8_lossy(&box_type),
                pos,
                box_len
            );
        };
        if box_type == wanted {
            return Ok(Some(BoxSpan { body_start: pos + header_len, end: box_end.min(end) }));
        }
        if box_end > end {
            bail!(
                "Box '{}' at offset {} declares size {} past the end of its container",
                String::from_utf8_lossy(&box_type),
                pos,
                box_len
            );
        }
        pos = box_end;
    }

    Ok(None)
}

/// Declared movie duration in whole seconds
///
/// # Errors
///
/// Returns an error if the stream has no `moov/mvhd`, the header is truncated, the
/// timescale is zero, or the duration field holds the "indeterminate" all-ones value.
pub fn read_duration<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<u32> {
    let len = reader.seek(SeekFrom::End(0)).context("Failed to seek to end of stream")?;

    let moov = find_box(reader, 0, len, BOX_MOOV)?.context("No moov box found")?;
    let mvhd =
        find_box(reader, moov.body_start, moov.end, BOX_MVHD)?.context("No mvhd box in moov")?;

    reader.seek(SeekFrom::Start(mvhd.body_start)).context("Failed to seek to mvhd")?;
    let version = reader.read_u8().context("Failed to read mvhd version")?;
    reader.read_u24::<BigEndian>().context("Failed to read mvhd flags")?;

    let (timescale, duration) = match version {
        0 => {
            // creation_time, modification_time
            reader.seek(SeekFrom::Current(8)).context("Failed to skip mvhd times")?;
            let timescale = reader.read_u32::<BigEndian>().context("Failed to read timescale")?;
            let duration = reader.read_u32::<BigEndian>().context("Failed to read duration")?;
            if duration == u32::MAX {
                bail!("mvhd duration is indeterminate");
            }
            (timescale, u64::from(duration))
        }
        1 => {
            reader.seek(SeekFrom::Current(16)).context("Failed to skip mvhd times")?;
            let timescale = reader.read_u32::<BigEndian>().context("Failed to read timescale")?;
            let duration = reader.read_u64::<BigEndian>().context("Failed to read duration")?;
            if duration == u64::MAX {
                bail!("mvhd duration is indeterminate");
            }
            (timescale, duration)
        }
        v => bail!("Unsupported mvhd version {}", v),
    };

    if timescale == 0 {
        bail!("mvhd timescale is zero");
    }

    Ok(u32::try_from(duration / u64::from(timescale)).unwrap_or(u32::MAX))
}
