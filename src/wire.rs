//! Wire primitives for the replication protocol
//!
//! Fixed-width integers are big-endian on the wire. Strings are a u32
//! byte-length prefix followed by UTF-8 bytes. Booleans are a single byte,
//! zero meaning false. Reading past the available bytes is a framing
//! violation fatal to the connection, never a recoverable per-request
//! failure. Writes go into a growable buffer and cannot fail.

use crate::{Error, Result};
use bytes::{Buf, BufMut};

pub(crate) fn ensure_remaining(input: &dyn Buf, needed: usize, what: &str) -> Result<()> {
    let available = input.remaining();
    if available < needed {
        return Err(Error::framing(format!(
            "truncated frame reading {what}: need {needed} byte(s), have {available}"
        )));
    }
    Ok(())
}

/// Read a single byte.
pub fn read_u8(input: &mut dyn Buf) -> Result<u8> {
    ensure_remaining(input, 1, "byte")?;
    Ok(input.get_u8())
}

/// Read a one-byte boolean. Zero is false, anything else is true.
pub fn read_bool(input: &mut dyn Buf) -> Result<bool> {
    Ok(read_u8(input)? != 0)
}

/// Read a big-endian unsigned 32-bit integer.
pub fn read_u32(input: &mut dyn Buf) -> Result<u32> {
    ensure_remaining(input, 4, "u32")?;
    Ok(input.get_u32())
}

/// Read a big-endian signed 32-bit integer.
pub fn read_i32(input: &mut dyn Buf) -> Result<i32> {
    ensure_remaining(input, 4, "i32")?;
    Ok(input.get_i32())
}

/// Read a big-endian unsigned 64-bit integer.
pub fn read_u64(input: &mut dyn Buf) -> Result<u64> {
    ensure_remaining(input, 8, "u64")?;
    Ok(input.get_u64())
}

/// Read a big-endian signed 64-bit integer.
pub fn read_i64(input: &mut dyn Buf) -> Result<i64> {
    ensure_remaining(input, 8, "i64")?;
    Ok(input.get_i64())
}

/// Read a length-prefixed UTF-8 string.
pub fn read_string(input: &mut dyn Buf) -> Result<String> {
    let len = read_u32(input)? as usize;
    ensure_remaining(input, len, "string bytes")?;
    let mut bytes = vec![0u8; len];
    input.copy_to_slice(&mut bytes);
    String::from_utf8(bytes)
        .map_err(|e| Error::framing(format!("string payload is not valid UTF-8: {e}")))
}

/// Write a single byte.
pub fn write_u8(out: &mut dyn BufMut, value: u8) {
    out.put_u8(value);
}

/// Write a one-byte boolean.
pub fn write_bool(out: &mut dyn BufMut, value: bool) {
    out.put_u8(value as u8);
}

/// Write a big-endian unsigned 32-bit integer.
pub fn write_u32(out: &mut dyn BufMut, value: u32) {
    out.put_u32(value);
}

/// Write a big-endian signed 32-bit integer.
pub fn write_i32(out: &mut dyn BufMut, value: i32) {
    out.put_i32(value);
}

/// Write a big-endian unsigned 64-bit integer.
pub fn write_u64(out: &mut dyn BufMut, value: u64) {
    out.put_u64(value);
}

/// Write a big-endian signed 64-bit integer.
pub fn write_i64(out: &mut dyn BufMut, value: i64) {
    out.put_i64(value);
}

/// Write a length-prefixed UTF-8 string.
pub fn write_string(out: &mut dyn BufMut, value: &str) {
    out.put_u32(value.len() as u32);
    out.put_slice(value.as_bytes());
}
