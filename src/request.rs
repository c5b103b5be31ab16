//! Request dispatch contract
//!
//! Every catalog entry is one [`RequestType`] record: a caller that decodes
//! the remaining frame bytes and invokes the master, the encoder for its
//! result shape, and a lock flag the transport uses to apply lock-specific
//! queueing policy without inspecting opcode identity. Entries hold no
//! per-request state, so one process-wide table serves every connection.

use crate::catalog::RequestKind;
use crate::master::Master;
use crate::response::Response;
use crate::serializer::{Payload, PayloadEncoder};
use crate::types::{LockResult, RequestContext};
use crate::{Result, wire};
use bytes::{Buf, BufMut};

/// Decodes arguments from the inbound frame and invokes the master-side
/// operation. The outbound buffer is handed through so COPY_STORE can
/// stream its payload directly; every other caller leaves it untouched.
pub type Caller =
    fn(&dyn Master, &RequestContext, &mut dyn Buf, &mut dyn BufMut) -> Result<Response<Payload>>;

/// One immutable catalog entry. The full set of entries, in declaration
/// order, is the frozen wire contract for a protocol generation.
pub struct RequestType {
    kind: RequestKind,
    caller: Caller,
    encoder: PayloadEncoder,
    is_lock: bool,
}

impl RequestType {
    pub(crate) const fn new(
        kind: RequestKind,
        caller: Caller,
        encoder: PayloadEncoder,
        is_lock: bool,
    ) -> Self {
        Self {
            kind,
            caller,
            encoder,
            is_lock,
        }
    }

    /// Symbolic name of this entry.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Wire opcode, equal to the entry's position in the catalog.
    pub fn opcode(&self) -> u8 {
        self.kind as u8
    }

    /// True exactly for the lock acquisition opcodes.
    pub fn is_lock(&self) -> bool {
        self.is_lock
    }
}

/// Serve one request: decode per the entry's caller, invoke the master,
/// then write the response envelope followed by the encoded result.
///
/// Decode completes before the domain call, and the result is fully
/// computed before encoding begins; COPY_STORE alone streams its store
/// payload into `output` during the call, ahead of the envelope.
pub fn dispatch(
    request_type: &RequestType,
    master: &dyn Master,
    context: &RequestContext,
    input: &mut dyn Buf,
    output: &mut dyn BufMut,
) -> Result<()> {
    tracing::debug!("dispatching {} request", request_type.kind().name());
    let response = match (request_type.caller)(master, context, input, output) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("{} request failed: {}", request_type.kind().name(), e);
            return Err(e);
        }
    };
    wire::write_u64(output, response.last_committed_tx());
    (request_type.encoder)(response.payload(), output)
}

/// Decode the shared lock argument shape: a u32 id count followed by that
/// many u64 resource ids, in order.
pub(crate) fn read_lock_ids(input: &mut dyn Buf) -> Result<Vec<u64>> {
    let count = wire::read_u32(input)? as usize;
    let needed = count
        .checked_mul(8)
        .ok_or_else(|| crate::Error::framing(format!("lock id count overflows: {count}")))?;
    wire::ensure_remaining(input, needed, "lock resource ids")?;
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(wire::read_u64(input)?);
    }
    Ok(ids)
}

/// Dispatcher template shared by every lock opcode: decode the id array
/// fully, then delegate to the operation-specific lock callback.
pub(crate) fn acquire_lock_call(
    master: &dyn Master,
    context: &RequestContext,
    input: &mut dyn Buf,
    callback: impl FnOnce(&dyn Master, &RequestContext, &[u64]) -> Result<Response<LockResult>>,
) -> Result<Response<Payload>> {
    let ids = read_lock_ids(input)?;
    Ok(callback(master, context, &ids)?.map(Payload::Lock))
}
