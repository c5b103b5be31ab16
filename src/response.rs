//! Response envelope
//!
//! Every reply carries, besides its payload, the master's latest committed
//! transaction id so the slave can keep its local view of applied state
//! current even when the payload itself is void. The envelope is serialized
//! by [`dispatch`](crate::request::dispatch) in one fixed,
//! opcode-independent layout: an 8-byte big-endian transaction id written
//! immediately before the result bytes.

/// A domain result of type `T` plus the bookkeeping that accompanies every
/// reply. Created once per request, consumed once by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    payload: T,
    last_committed_tx: u64,
}

impl<T> Response<T> {
    /// Wrap a domain result together with the master's latest committed
    /// transaction id.
    pub fn new(payload: T, last_committed_tx: u64) -> Self {
        Self {
            payload,
            last_committed_tx,
        }
    }

    /// The domain result.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// The master's latest committed transaction id.
    pub fn last_committed_tx(&self) -> u64 {
        self.last_committed_tx
    }

    /// Transform the payload, keeping the envelope metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            payload: f(self.payload),
            last_committed_tx: self.last_committed_tx,
        }
    }
}
