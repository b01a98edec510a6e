//! Line-delimited JSON codec
//!
//! One request is one line:
//! ```text
//! {"method": "get_bucket", "bucket": "users"}\n
//! ```
//! JSON string escaping guarantees the body never contains a raw newline,
//! so the trailing `\n` is the only one in the message.

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io;

use crate::catalog::RequestDescriptor;
use crate::common::config::Separators;
use crate::common::Result;

/// Message delimiter
pub const DELIMITER: u8 = b'\n';

/// Formatter that puts a space after `,` and `:`
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
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
}

/// Serialize a descriptor to its JSON body, without the delimiter
pub fn encode_body(descriptor: &RequestDescriptor, separators: Separators) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(128);
    match separators {
        Separators::Spaced => {
            let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
            descriptor.serialize(&mut ser)?;
        }
        Separators::Compact => serde_json::to_writer(&mut buf, descriptor)?,
    }
    Ok(buf)
}

/// Serialize a descriptor into a complete wire message
pub fn encode(descriptor: &RequestDescriptor, separators: Separators) -> Result<Vec<u8>> {
    let mut message = encode_body(descriptor, separators)?;
    message.push(DELIMITER);
    Ok(message)
}

/// Strip the delimiter from a wire message
pub fn body(message: &[u8]) -> &[u8] {
    message.strip_suffix(&[DELIMITER]).unwrap_or(message)
}

/// Decode received bytes for display
///
/// A bounded read can cut a multibyte character in half, so invalid
/// sequences are replaced rather than rejected.
pub fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
