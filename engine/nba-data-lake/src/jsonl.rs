//! Line-delimited JSON encoding of player records
//!
//! Each record becomes one line. Lines use the spaced, ASCII-only layout the
//! lake has always stored (`{"PlayerID": 1, "Team": "X"}`), so objects written
//! by this tool and by earlier loaders are byte-compatible.

use crate::error::Result;
use crate::models::PlayerRecord;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// `": "` after keys, `", "` between members, non-ASCII as `\uXXXX`
#[derive(Debug, Default, Clone, Copy)]
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                // astral characters come out as a surrogate pair
                for unit in ch.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Encode a single record as one JSON line (without the newline)
pub fn encode_record(record: &PlayerRecord) -> Result<String> {
    let mut buf = Vec::with_capacity(256);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    record.serialize(&mut serializer)?;

    // the formatter only ever emits ASCII
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Encode records as newline-joined JSON objects
///
/// No trailing newline; an empty slice yields an empty string.
pub fn to_line_delimited_json(records: &[PlayerRecord]) -> Result<String> {
    let lines = records.iter().map(encode_record).collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}
