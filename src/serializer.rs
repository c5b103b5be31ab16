//! Result encoder set
//!
//! One encoder per result shape. Scalar encoders (void, integer, long) are
//! shared across every opcode returning that shape; the structured results
//! (id allocation, lock, handshake) have bespoke encoders. The matching
//! reference decoders live here too for the slave side of the wire.

use crate::types::{HandshakeResult, IdAllocation, IdRange, LockRefusal, LockResult};
use crate::{Error, Result, wire};
use bytes::{Buf, BufMut};

/// The closed set of result shapes a catalog entry can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// No result bytes
    Void,
    /// 4-byte integer result
    Integer(i32),
    /// 8-byte long result
    Long(i64),
    /// ALLOCATE_IDS result
    IdAllocation(IdAllocation),
    /// Lock acquisition result
    Lock(LockResult),
    /// HANDSHAKE result
    Handshake(HandshakeResult),
}

/// Serializes one [`Payload`] shape into the outbound buffer.
///
/// Every encoder is paired with its catalog entries at table-construction
/// time; a mismatched payload is an internal invariant violation.
pub type PayloadEncoder = fn(&Payload, &mut dyn BufMut) -> Result<()>;

fn mismatch(expected: &str, got: &Payload) -> Error {
    Error::internal(format!("{expected} encoder fed a {got:?} payload"))
}

/// Encode a void result: no bytes.
pub fn encode_void(payload: &Payload, _out: &mut dyn BufMut) -> Result<()> {
    match payload {
        Payload::Void => Ok(()),
        other => Err(mismatch("void", other)),
    }
}

/// Encode a 4-byte integer result.
pub fn encode_integer(payload: &Payload, out: &mut dyn BufMut) -> Result<()> {
    match payload {
        Payload::Integer(value) => {
            wire::write_i32(out, *value);
            Ok(())
        }
        other => Err(mismatch("integer", other)),
    }
}

/// Encode an 8-byte long result.
pub fn encode_long(payload: &Payload, out: &mut dyn BufMut) -> Result<()> {
    match payload {
        Payload::Long(value) => {
            wire::write_i64(out, *value);
            Ok(())
        }
        other => Err(mismatch("long", other)),
    }
}

/// Encode an id allocation: defrag id count, each defrag id, range start,
/// range length, highest id in use, defrag count.
pub fn encode_id_allocation(payload: &Payload, out: &mut dyn BufMut) -> Result<()> {
    let Payload::IdAllocation(allocation) = payload else {
        return Err(mismatch("id allocation", payload));
    };
    let range = &allocation.id_range;
    wire::write_u32(out, range.defrag_ids.len() as u32);
    for id in &range.defrag_ids {
        wire::write_u64(out, *id);
    }
    wire::write_u64(out, range.range_start);
    wire::write_u32(out, range.range_length);
    wire::write_u64(out, allocation.highest_id_in_use);
    wire::write_u64(out, allocation.defrag_count);
    Ok(())
}

/// Encode a lock result: a status byte, then a reason byte on failure.
pub fn encode_lock(payload: &Payload, out: &mut dyn BufMut) -> Result<()> {
    let Payload::Lock(result) = payload else {
        return Err(mismatch("lock", payload));
    };
    match result {
        LockResult::Acquired => wire::write_u8(out, 1),
        LockResult::NotAcquired(refusal) => {
            wire::write_u8(out, 0);
            wire::write_u8(out, *refusal as u8);
        }
    }
    Ok(())
}

/// Encode a handshake result: author (4 bytes), checksum (8), epoch (8).
pub fn encode_handshake(payload: &Payload, out: &mut dyn BufMut) -> Result<()> {
    let Payload::Handshake(result) = payload else {
        return Err(mismatch("handshake", payload));
    };
    wire::write_i32(out, result.author);
    wire::write_u64(out, result.checksum);
    wire::write_u64(out, result.epoch);
    Ok(())
}

/// Decode an id allocation written by [`encode_id_allocation`].
pub fn decode_id_allocation(input: &mut dyn Buf) -> Result<IdAllocation> {
    let defrag_len = wire::read_u32(input)? as usize;
    let mut defrag_ids = Vec::with_capacity(defrag_len.min(1024));
    for _ in 0..defrag_len {
        defrag_ids.push(wire::read_u64(input)?);
    }
    let range_start = wire::read_u64(input)?;
    let range_length = wire::read_u32(input)?;
    let highest_id_in_use = wire::read_u64(input)?;
    let defrag_count = wire::read_u64(input)?;
    Ok(IdAllocation {
        id_range: IdRange {
            defrag_ids,
            range_start,
            range_length,
        },
        highest_id_in_use,
        defrag_count,
    })
}

/// Decode a lock result written by [`encode_lock`].
pub fn decode_lock_result(input: &mut dyn Buf) -> Result<LockResult> {
    match wire::read_u8(input)? {
        1 => Ok(LockResult::Acquired),
        0 => Ok(LockResult::NotAcquired(LockRefusal::try_from(
            wire::read_u8(input)?,
        )?)),
        other => Err(Error::framing(format!("unknown lock status byte: {other}"))),
    }
}

/// Decode a handshake result written by [`encode_handshake`].
pub fn decode_handshake(input: &mut dyn Buf) -> Result<HandshakeResult> {
    Ok(HandshakeResult {
        author: wire::read_i32(input)?,
        checksum: wire::read_u64(input)?,
        epoch: wire::read_u64(input)?,
    })
}
