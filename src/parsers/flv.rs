//! FLV tail-walk duration reader
//!
//! An FLV body is a sequence of tags, each followed by a big-endian `u32` holding the
//! size of the tag it trails (11-byte header plus payload). Reading that trailer at the
//! end of the stream locates the last tag without scanning forward through the file.

use std::io::{Read, Seek, SeekFrom};

use anyhow::{Context, Result, bail};
use byteorder::{BigEndian, ReadBytesExt};

/// Size of an FLV tag header
pub const TAG_HEADER_LEN: u32 = 11;

/// Size of the `PreviousTagSize` field that trails every tag
const TRAILER_LEN: u64 = 4;

const TAG_AUDIO: u8 = 8;
const TAG_VIDEO: u8 = 9;
const TAG_SCRIPT: u8 = 18;

/// Fixed 11-byte header at the start of every FLV tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub tag_type: u8,
    pub data_size: u32,
    /// Milliseconds since the start of the recording (24 bits plus 8 extension bits)
    pub timestamp: u32,
    pub stream_id: u32,
}

impl TagHeader {
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        // Upper bits flag filtered (encrypted) payloads
        let tag_type = reader.read_u8().context("Failed to read tag type")? & 0x1f;
        if !matches!(tag_type, TAG_AUDIO | TAG_VIDEO | TAG_SCRIPT) {
            bail!("Unknown FLV tag type {}", tag_type);
        }

        let data_size = reader.read_u24::<BigEndian>().context("Failed to read tag data size")?;
        let timestamp_low = reader.read_u24::<BigEndian>().context("Failed to read tag timestamp")?;
        let timestamp_ext = reader.read_u8().context("Failed to read tag timestamp extension")?;
        let stream_id = reader.read_u24::<BigEndian>().context("Failed to read tag stream id")?;

        Ok(Self {
            tag_type,
            data_size,
            timestamp: (u32::from(timestamp_ext) << 24) | timestamp_low,
            stream_id,
        })
    }
}

/// Timestamp of the last tag in the stream, located through the trailing tag size
///
/// # Errors
///
/// Returns an error if the stream is shorter than a trailer, the trailer points before
/// the start of the stream, or the tag found there is not a well-formed tag whose size
/// matches the trailer.
pub fn read_last_tag_timestamp<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<u32> {
    let len = reader.seek(SeekFrom::End(0)).context("Failed to seek to end of stream")?;
    if len < TRAILER_LEN {
        bail!("Stream too short for an FLV tag trailer ({} bytes)", len);
    }

    reader.seek(SeekFrom::End(-(TRAILER_LEN as i64))).context("Failed to seek to tag trailer")?;
    let tag_size = reader.read_u32::<BigEndian>().context("Failed to read last tag size")?;

    let back = u64::from(tag_size) + TRAILER_LEN;
    if back > len {
        bail!("Last tag size {} points before the start of a {} byte stream", tag_size, len);
    }
    reader.seek(SeekFrom::End(-(back as i64))).context("Failed to seek to last tag")?;

    let header = TagHeader::read(reader)?;
    if header.data_size + TAG_HEADER_LEN != tag_size {
        bail!(
            "Last tag declares {} payload bytes but trailer records a {} byte tag",
            header.data_size,
            tag_size
        );
    }

    Ok(header.timestamp)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use super::*;

    /// FLV file header plus the leading `PreviousTagSize0`
    const FILE_HEADER: [u8; 13] = [b'F', b'L', b'V', 1, 5, 0, 0, 0, 9, 0, 0, 0, 0];

    fn push_tag(out: &mut Vec<u8>, tag_type: u8, timestamp: u32, payload: &[u8]) {
        let size = payload.len() as u32;
        out.push(tag_type);
        out.extend_from_slice(&size.to_be_bytes()[1..]);
        out.extend_from_slice(&(timestamp & 0x00ff_ffff).to_be_bytes()[1..]);
        out.push((timestamp >> 24) as u8);
        out.extend_from_slice(&[0, 0, 0]);
        out.extend_from_slice(payload);
        out.extend_from_slice(&(size + TAG_HEADER_LEN).to_be_bytes());
    }

    /// Build an FLV stream with one video tag per timestamp
    pub(crate) fn flv_stream(timestamps: &[u32]) -> Vec<u8> {
        let mut out = FILE_HEADER.to_vec();
        for (i, ts) in timestamps.iter().enumerate() {
            push_tag(&mut out, TAG_VIDEO, *ts, &vec![0x17; 16 + i]);
        }
        out
    }

    #[test]
    fn test_reads_last_tag_timestamp() {
        let mut cursor = Cursor::new(flv_stream(&[0, 33, 66, 61_000]));
        assert_eq!(read_last_tag_timestamp(&mut cursor).unwrap(), 61_000);
    }

    #[test]
    fn test_reads_extended_timestamp() {
        let ts = 0x0123_4567;
        let mut cursor = Cursor::new(flv_stream(&[0, ts]));
        assert_eq!(read_last_tag_timestamp(&mut cursor).unwrap(), ts);
    }

    #[test]
    fn test_last_tag_may_be_audio_or_script() {
        let mut stream = flv_stream(&[0, 40]);
        push_tag(&mut stream, TAG_AUDIO, 45, &[0xaf, 0x01, 0x00]);
        assert_eq!(read_last_tag_timestamp(&mut Cursor::new(stream.clone())).unwrap(), 45);

        push_tag(&mut stream, TAG_SCRIPT | 0x20, 50, b"onMetaData");
        assert_eq!(read_last_tag_timestamp(&mut Cursor::new(stream)).unwrap(), 50);
    }

    #[test]
    fn test_empty_stream_is_an_error() {
        let mut cursor = Cursor::new(Vec::new());
        let err = read_last_tag_timestamp(&mut cursor).unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn test_header_only_stream_is_an_error() {
        let mut cursor = Cursor::new(FILE_HEADER.to_vec());
        assert!(read_last_tag_timestamp(&mut cursor).is_err());
    }

    #[test]
    fn test_trailer_pointing_before_start_is_an_error() {
        // Trailer claims a tag far larger than the stream
        let mut stream = vec![9, 0, 0, 1];
        stream.extend_from_slice(&0xffff_fff0u32.to_be_bytes());
        let mut cursor = Cursor::new(stream);

        let err = read_last_tag_timestamp(&mut cursor).unwrap_err();
        assert!(err.to_string().contains("points before the start"));
    }

    #[test]
    fn test_truncated_last_tag_is_an_error() {
        let mut stream = flv_stream(&[0, 500]);
        // Drop payload bytes of the last tag but keep its trailer
        let trailer = stream.split_off(stream.len() - 4);
        stream.truncate(stream.len() - 6);
        stream.extend_from_slice(&trailer);

        assert!(read_last_tag_timestamp(&mut Cursor::new(stream)).is_err());
    }

    #[test]
    fn test_garbage_is_an_error() {
        let mut cursor = Cursor::new(b"this is not a flash video file at all".to_vec());
        assert!(read_last_tag_timestamp(&mut cursor).is_err());
    }

    #[test]
    fn test_tag_header_fields() {
        let mut stream = Vec::new();
        push_tag(&mut stream, TAG_AUDIO, 0x0a0b_0c0d, &[1, 2, 3, 4, 5]);

        let header = TagHeader::read(&mut Cursor::new(stream)).unwrap();
        assert_eq!(
            header,
            TagHeader { tag_type: TAG_AUDIO, data_size: 5, timestamp: 0x0a0b_0c0d, stream_id: 0 }
        );
    }
}
