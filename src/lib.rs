//! Arbor HA - Master/Slave Replication RPC Protocol
//!
//! This crate implements the wire contract slaves use to talk to an Arbor
//! master: a fixed, versioned catalog of request types, each binding a
//! single-byte wire opcode to an argument decoder, a master-side operation
//! invocation, and a result encoder. Slaves use it to request identifier
//! ranges, acquire distributed locks, pull and commit transactions,
//! perform the connection handshake, and copy the entire store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            Transport (external)              │
//! │   connection lifecycle, framing, timeouts    │
//! └──────────────┬───────────────────────────────┘
//!                │ opcode byte + argument bytes
//! ┌──────────────┴───────────────────────────────┐
//! │           Catalog  (lookup by opcode)        │
//! │   ordinal-stable, append-only, process-wide  │
//! └──────────────┬───────────────────────────────┘
//!                │
//! ┌──────────────┴───────────────────────────────┐
//! │          Dispatch (per RequestType)          │
//! │    decode args → Master call → encode        │
//! └──────────────┬───────────────────────────────┘
//!                │
//! ┌──────────────┴───────────────────────────────┐
//! │           Master (external domain)           │
//! │  id allocator, lock manager, tx machinery    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Wire format
//!
//! A request frame is one opcode byte followed by opcode-specific argument
//! bytes. A reply is the response envelope (8-byte last committed
//! transaction id) followed by the opcode-specific result bytes, all
//! big-endian. COPY_STORE additionally streams the store payload ahead of
//! the envelope, bypassing the result encoders.
//!
//! # Versioning
//!
//! The catalog is the frozen wire contract of one protocol generation:
//! entries are only ever appended, never reordered or removed, and retired
//! operations stay behind as placeholders that fail every call. Several
//! operations deliberately reject older-protocol clients instead of
//! attempting semantic translation.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod master;
pub mod request;
pub mod response;
pub mod serializer;
pub mod types;
pub mod wire;

pub use catalog::{RequestKind, catalog, lookup, request_type};
pub use error::{Error, Result};
pub use master::{BufStoreWriter, Master, StoreWriter};
pub use request::{RequestType, dispatch};
pub use response::Response;
pub use serializer::Payload;
pub use types::{
    HandshakeResult, IdAllocation, IdRange, IdType, LockRefusal, LockResult, RequestContext,
    StoreId,
};
