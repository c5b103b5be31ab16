//! Value types exchanged between slaves and the master
//!
//! Everything here is a request-scoped value object: built for one
//! request/response cycle, immutable once constructed, never retained by
//! the dispatch layer.

use crate::{Error, Result};

/// The calling slave's view of global state, threaded unchanged from the
/// session layer into every domain call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// Master epoch the slave believes it is talking to
    pub epoch: u64,
    /// Cluster member id of the calling slave
    pub machine_id: u32,
    /// Lock-session token identifying the slave-side transaction
    pub lock_session: i32,
    /// Last transaction id the slave has applied locally
    pub last_applied_tx: u64,
}

impl RequestContext {
    /// Create a context for one request.
    pub fn new(epoch: u64, machine_id: u32, lock_session: i32, last_applied_tx: u64) -> Self {
        Self {
            epoch,
            machine_id,
            lock_session,
            last_applied_tx,
        }
    }
}

/// Identifier categories the master can allocate ranges for.
///
/// Referenced on the wire only by ordinal; the set is closed for a protocol
/// generation and the ordinals are frozen.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdType {
    /// Node records
    Node = 0,
    /// Relationship records
    Relationship = 1,
    /// Property records
    Property = 2,
    /// Dynamic string blocks
    StringBlock = 3,
    /// Dynamic array blocks
    ArrayBlock = 4,
    /// Property key tokens
    PropertyKeyToken = 5,
    /// Relationship type tokens
    RelationshipTypeToken = 6,
    /// Label tokens
    LabelToken = 7,
    /// Schema rule records
    Schema = 8,
}

impl IdType {
    /// Wire ordinal of this id type.
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for IdType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Node),
            1 => Ok(Self::Relationship),
            2 => Ok(Self::Property),
            3 => Ok(Self::StringBlock),
            4 => Ok(Self::ArrayBlock),
            5 => Ok(Self::PropertyKeyToken),
            6 => Ok(Self::RelationshipTypeToken),
            7 => Ok(Self::LabelToken),
            8 => Ok(Self::Schema),
            _ => Err(Error::framing(format!("unknown id type ordinal: {value}"))),
        }
    }
}

/// A batch of identifiers granted to one slave: reusable defragmented ids
/// plus one contiguous freshly allocated range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdRange {
    /// Reclaimed ids that may be reused before the fresh range
    pub defrag_ids: Vec<u64>,
    /// First id of the fresh contiguous range
    pub range_start: u64,
    /// Number of ids in the fresh range
    pub range_length: u32,
}

/// Result of an ALLOCATE_IDS call, produced by the master's id allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocation {
    /// The granted id range
    pub id_range: IdRange,
    /// Highest id handed out so far for this id type
    pub highest_id_in_use: u64,
    /// Total defragmented ids still available on the master
    pub defrag_count: u64,
}

/// Reason code sent to the slave when a lock was not granted.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockRefusal {
    /// The resource is held by another session
    NotAvailable = 0,
    /// Granting would have produced a deadlock
    DeadlockDetected = 1,
    /// The wait exceeded the master's lock acquisition timeout
    Timeout = 2,
    /// The requesting lock session is no longer open on the master
    SessionClosed = 3,
}

impl TryFrom<u8> for LockRefusal {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::NotAvailable),
            1 => Ok(Self::DeadlockDetected),
            2 => Ok(Self::Timeout),
            3 => Ok(Self::SessionClosed),
            _ => Err(Error::framing(format!("unknown lock refusal code: {value}"))),
        }
    }
}

/// Outcome of a lock acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockResult {
    /// All requested resources are now held by the calling session
    Acquired,
    /// Nothing was granted; the reason travels back to the slave
    NotAcquired(LockRefusal),
}

/// Identity of the master a slave has shaken hands with, used to detect
/// split-brain and stale-master conditions at connection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeResult {
    /// Author id of the transaction the handshake was validated against
    pub author: i32,
    /// Checksum of that transaction
    pub checksum: u64,
    /// Current master epoch
    pub epoch: u64,
}

/// Opaque identity of a store, optionally offered during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreId {
    /// Creation timestamp of the store
    pub creation_time: u64,
    /// Random id minted when the store was created
    pub random_id: u64,
}
