//! Request-type catalog
//!
//! The ordered, ordinal-stable enumeration of every operation this
//! protocol generation serves. A client encodes the opcode as a single
//! byte before any version negotiation, so the table is a closed, ordered
//! list that is only ever appended to: entries are never reordered and
//! never removed, and obsolete operations stay behind as inert
//! placeholders to keep the later ordinals stable.
//!
//! The table is a plain `static` holding only fn pointers and flags; it is
//! immutable and shared by every connection without locking.

use crate::master::{BufStoreWriter, Master};
use crate::request::{RequestType, acquire_lock_call};
use crate::response::Response;
use crate::serializer::{self, Payload};
use crate::types::{IdType, RequestContext};
use crate::{Error, Result, wire};
use bytes::{Buf, BufMut};

/// Symbolic names of the catalog entries, in frozen declaration order.
/// The wire opcode of each operation is its discriminant.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Allocate an id range for one id type
    AllocateIds = 0,
    /// Register a relationship type token
    CreateRelationshipType = 1,
    /// Acquire exclusive node locks (retired in this generation)
    AcquireNodeWriteLock = 2,
    /// Acquire shared node locks (retired in this generation)
    AcquireNodeReadLock = 3,
    /// Acquire exclusive relationship locks (retired in this generation)
    AcquireRelationshipWriteLock = 4,
    /// Acquire shared relationship locks (retired in this generation)
    AcquireRelationshipReadLock = 5,
    /// Commit a single slave transaction
    Commit = 6,
    /// Deliver queued updates to the slave
    PullUpdates = 7,
    /// Finalize or roll back a transaction
    Finish = 8,
    /// Validate protocol and epoch compatibility
    Handshake = 9,
    /// Stream the entire store to the slave
    CopyStore = 10,
    /// Retired copy-transactions slot, kept for ordinal stability
    PlaceholderForCopyTransactions = 11,
    /// Register the start of a new transaction
    InitializeTx = 12,
    /// Acquire the exclusive graph lock (retired in this generation)
    AcquireGraphWriteLock = 13,
    /// Acquire the shared graph lock (retired in this generation)
    AcquireGraphReadLock = 14,
    /// Acquire shared index locks (retired in this generation)
    AcquireIndexReadLock = 15,
    /// Acquire exclusive index locks (retired in this generation)
    AcquireIndexWriteLock = 16,
    /// Obsolete transaction push, kept for ordinal stability
    PushTransaction = 17,
    /// Register a property key token
    CreatePropertyKey = 18,
    /// Register a label token
    CreateLabel = 19,
    /// Acquire shared schema locks (retired in this generation)
    AcquireSchemaReadLock = 20,
    /// Acquire exclusive schema locks (retired in this generation)
    AcquireSchemaWriteLock = 21,
    /// Acquire exclusive index entry locks (retired in this generation)
    AcquireIndexEntryWriteLock = 22,
    /// Acquire shared index entry locks (retired in this generation)
    AcquireIndexEntryReadLock = 23,
}

impl RequestKind {
    /// Number of entries in this protocol generation's catalog.
    pub const COUNT: usize = 24;

    /// Wire opcode of this operation.
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Stable symbolic name, for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::AllocateIds => "ALLOCATE_IDS",
            Self::CreateRelationshipType => "CREATE_RELATIONSHIP_TYPE",
            Self::AcquireNodeWriteLock => "ACQUIRE_NODE_WRITE_LOCK",
            Self::AcquireNodeReadLock => "ACQUIRE_NODE_READ_LOCK",
            Self::AcquireRelationshipWriteLock => "ACQUIRE_RELATIONSHIP_WRITE_LOCK",
            Self::AcquireRelationshipReadLock => "ACQUIRE_RELATIONSHIP_READ_LOCK",
            Self::Commit => "COMMIT",
            Self::PullUpdates => "PULL_UPDATES",
            Self::Finish => "FINISH",
            Self::Handshake => "HANDSHAKE",
            Self::CopyStore => "COPY_STORE",
            Self::PlaceholderForCopyTransactions => "PLACEHOLDER_FOR_COPY_TRANSACTIONS",
            Self::InitializeTx => "INITIALIZE_TX",
            Self::AcquireGraphWriteLock => "ACQUIRE_GRAPH_WRITE_LOCK",
            Self::AcquireGraphReadLock => "ACQUIRE_GRAPH_READ_LOCK",
            Self::AcquireIndexReadLock => "ACQUIRE_INDEX_READ_LOCK",
            Self::AcquireIndexWriteLock => "ACQUIRE_INDEX_WRITE_LOCK",
            Self::PushTransaction => "PUSH_TRANSACTION",
            Self::CreatePropertyKey => "CREATE_PROPERTY_KEY",
            Self::CreateLabel => "CREATE_LABEL",
            Self::AcquireSchemaReadLock => "ACQUIRE_SCHEMA_READ_LOCK",
            Self::AcquireSchemaWriteLock => "ACQUIRE_SCHEMA_WRITE_LOCK",
            Self::AcquireIndexEntryWriteLock => "ACQUIRE_INDEX_ENTRY_WRITE_LOCK",
            Self::AcquireIndexEntryReadLock => "ACQUIRE_INDEX_ENTRY_READ_LOCK",
        }
    }
}

impl TryFrom<u8> for RequestKind {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::AllocateIds),
            1 => Ok(Self::CreateRelationshipType),
            2 => Ok(Self::AcquireNodeWriteLock),
            3 => Ok(Self::AcquireNodeReadLock),
            4 => Ok(Self::AcquireRelationshipWriteLock),
            5 => Ok(Self::AcquireRelationshipReadLock),
            6 => Ok(Self::Commit),
            7 => Ok(Self::PullUpdates),
            8 => Ok(Self::Finish),
            9 => Ok(Self::Handshake),
            10 => Ok(Self::CopyStore),
            11 => Ok(Self::PlaceholderForCopyTransactions),
            12 => Ok(Self::InitializeTx),
            13 => Ok(Self::AcquireGraphWriteLock),
            14 => Ok(Self::AcquireGraphReadLock),
            15 => Ok(Self::AcquireIndexReadLock),
            16 => Ok(Self::AcquireIndexWriteLock),
            17 => Ok(Self::PushTransaction),
            18 => Ok(Self::CreatePropertyKey),
            19 => Ok(Self::CreateLabel),
            20 => Ok(Self::AcquireSchemaReadLock),
            21 => Ok(Self::AcquireSchemaWriteLock),
            22 => Ok(Self::AcquireIndexEntryWriteLock),
            23 => Ok(Self::AcquireIndexEntryReadLock),
            _ => Err(Error::UnknownOperation(value)),
        }
    }
}

/// Look up the catalog entry for a wire opcode.
///
/// An opcode outside the catalog means version skew with the client; the
/// error terminates that single request, never the handler loop.
pub fn lookup(opcode: u8) -> Result<&'static RequestType> {
    let kind = RequestKind::try_from(opcode)?;
    Ok(&CATALOG[kind as usize])
}

/// Look up a catalog entry by symbolic name, for the encode side.
pub fn request_type(kind: RequestKind) -> &'static RequestType {
    &CATALOG[kind as usize]
}

/// The full catalog in declaration order.
pub fn catalog() -> &'static [RequestType] {
    &CATALOG
}

static CATALOG: [RequestType; RequestKind::COUNT] = [
    RequestType::new(
        RequestKind::AllocateIds,
        allocate_ids,
        serializer::encode_id_allocation,
        false,
    ),
    RequestType::new(
        RequestKind::CreateRelationshipType,
        create_relationship_type,
        serializer::encode_integer,
        false,
    ),
    RequestType::new(
        RequestKind::AcquireNodeWriteLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::AcquireNodeReadLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::AcquireRelationshipWriteLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::AcquireRelationshipReadLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(RequestKind::Commit, commit, serializer::encode_long, false),
    RequestType::new(
        RequestKind::PullUpdates,
        pull_updates,
        serializer::encode_void,
        false,
    ),
    RequestType::new(RequestKind::Finish, finish, serializer::encode_void, false),
    RequestType::new(
        RequestKind::Handshake,
        handshake,
        serializer::encode_handshake,
        false,
    ),
    RequestType::new(
        RequestKind::CopyStore,
        copy_store,
        serializer::encode_void,
        false,
    ),
    RequestType::new(
        RequestKind::PlaceholderForCopyTransactions,
        placeholder_for_copy_transactions,
        serializer::encode_void,
        false,
    ),
    RequestType::new(
        RequestKind::InitializeTx,
        initialize_tx,
        serializer::encode_void,
        false,
    ),
    RequestType::new(
        RequestKind::AcquireGraphWriteLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::AcquireGraphReadLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::AcquireIndexReadLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::AcquireIndexWriteLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::PushTransaction,
        push_transaction,
        serializer::encode_void,
        false,
    ),
    RequestType::new(
        RequestKind::CreatePropertyKey,
        create_property_key,
        serializer::encode_integer,
        false,
    ),
    RequestType::new(
        RequestKind::CreateLabel,
        create_label,
        serializer::encode_integer,
        false,
    ),
    RequestType::new(
        RequestKind::AcquireSchemaReadLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::AcquireSchemaWriteLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::AcquireIndexEntryWriteLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
    RequestType::new(
        RequestKind::AcquireIndexEntryReadLock,
        acquire_lock_from_stale_client,
        serializer::encode_lock,
        true,
    ),
];

fn allocate_ids(
    master: &dyn Master,
    context: &RequestContext,
    input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    let id_type = IdType::try_from(wire::read_u8(input)?)?;
    Ok(master
        .allocate_ids(context, id_type)?
        .map(Payload::IdAllocation))
}

fn create_relationship_type(
    master: &dyn Master,
    context: &RequestContext,
    input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    let name = wire::read_string(input)?;
    Ok(master
        .create_relationship_type(context, &name)?
        .map(Payload::Integer))
}

fn create_property_key(
    master: &dyn Master,
    context: &RequestContext,
    input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    let name = wire::read_string(input)?;
    Ok(master
        .create_property_key(context, &name)?
        .map(Payload::Integer))
}

fn create_label(
    master: &dyn Master,
    context: &RequestContext,
    input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    let name = wire::read_string(input)?;
    Ok(master.create_label(context, &name)?.map(Payload::Integer))
}

// The single-transaction commit path is not served by this protocol
// generation. The legacy payload is drained so the frame stays aligned,
// then the request fails cleanly instead of answering with a fabricated
// commit id.
fn commit(
    _master: &dyn Master,
    _context: &RequestContext,
    input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    let legacy_payload = input.remaining();
    input.advance(legacy_payload);
    Err(Error::protocol_rejected(
        "single-transaction commit from an older protocol client is not served by this master",
    ))
}

fn pull_updates(
    master: &dyn Master,
    context: &RequestContext,
    _input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    Ok(master.pull_updates(context)?.map(|()| Payload::Void))
}

fn finish(
    master: &dyn Master,
    context: &RequestContext,
    input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    let success = wire::read_bool(input)?;
    Ok(master
        .finish_transaction(context, success)?
        .map(|()| Payload::Void))
}

fn handshake(
    master: &dyn Master,
    _context: &RequestContext,
    input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    let tx_id = wire::read_u64(input)?;
    Ok(master.handshake(tx_id, None)?.map(Payload::Handshake))
}

fn copy_store(
    master: &dyn Master,
    context: &RequestContext,
    _input: &mut dyn Buf,
    target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    let mut writer = BufStoreWriter::new(target);
    Ok(master
        .copy_store(context, &mut writer)?
        .map(|()| Payload::Void))
}

fn placeholder_for_copy_transactions(
    _master: &dyn Master,
    _context: &RequestContext,
    _input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    Err(Error::unsupported(
        "copy-transactions requests are not used anymore; the opcode remains to keep the later ordinals stable",
    ))
}

fn initialize_tx(
    master: &dyn Master,
    context: &RequestContext,
    _input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    Ok(master.initialize_tx(context)?.map(|()| Payload::Void))
}

fn push_transaction(
    _master: &dyn Master,
    _context: &RequestContext,
    _input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    Err(Error::unsupported("transaction push requests are obsolete"))
}

// Compatibility fence: every lock opcode of this generation is only ever
// reached by older-protocol clients, and serving them would hand back
// locking semantics this master no longer provides. The id array is still
// decoded in full, so framing violations surface as such.
fn acquire_lock_from_stale_client(
    master: &dyn Master,
    context: &RequestContext,
    input: &mut dyn Buf,
    _target: &mut dyn BufMut,
) -> Result<Response<Payload>> {
    acquire_lock_call(master, context, input, |_, _, _| {
        Err(Error::protocol_rejected(
            "lock requests from an older protocol client are not served by this master",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::dispatch;
    use crate::response::Response;
    use crate::types::{HandshakeResult, IdAllocation, StoreId};
    use proptest::prelude::*;

    struct UnreachableMaster;

    impl Master for UnreachableMaster {
        fn allocate_ids(&self, _: &RequestContext, _: IdType) -> Result<Response<IdAllocation>> {
            unreachable!("retired opcodes never reach the master")
        }
        fn create_relationship_type(&self, _: &RequestContext, _: &str) -> Result<Response<i32>> {
            unreachable!("retired opcodes never reach the master")
        }
        fn create_property_key(&self, _: &RequestContext, _: &str) -> Result<Response<i32>> {
            unreachable!("retired opcodes never reach the master")
        }
        fn create_label(&self, _: &RequestContext, _: &str) -> Result<Response<i32>> {
            unreachable!("retired opcodes never reach the master")
        }
        fn pull_updates(&self, _: &RequestContext) -> Result<Response<()>> {
            unreachable!("retired opcodes never reach the master")
        }
        fn finish_transaction(&self, _: &RequestContext, _: bool) -> Result<Response<()>> {
            unreachable!("retired opcodes never reach the master")
        }
        fn handshake(&self, _: u64, _: Option<StoreId>) -> Result<Response<HandshakeResult>> {
            unreachable!("retired opcodes never reach the master")
        }
        fn copy_store(
            &self,
            _: &RequestContext,
            _: &mut dyn crate::master::StoreWriter,
        ) -> Result<Response<()>> {
            unreachable!("retired opcodes never reach the master")
        }
        fn initialize_tx(&self, _: &RequestContext) -> Result<Response<()>> {
            unreachable!("retired opcodes never reach the master")
        }
    }

    fn context() -> RequestContext {
        RequestContext::new(1, 2, 3, 4)
    }

    #[test]
    fn opcodes_are_contiguous_from_zero() {
        for (position, entry) in catalog().iter().enumerate() {
            assert_eq!(entry.opcode() as usize, position);
            assert_eq!(entry.kind().opcode() as usize, position);
        }
        assert_eq!(catalog().len(), RequestKind::COUNT);
    }

    #[test]
    fn lookup_round_trips_every_opcode() {
        for opcode in 0..RequestKind::COUNT as u8 {
            let entry = lookup(opcode).unwrap();
            assert_eq!(entry.opcode(), opcode);
            assert!(std::ptr::eq(entry, request_type(entry.kind())));
        }
    }

    #[test]
    fn lookup_outside_the_catalog_is_unknown_operation() {
        for opcode in [RequestKind::COUNT as u8, 100, u8::MAX] {
            match lookup(opcode) {
                Ok(_) => panic!("opcode {opcode} must not resolve"),
                Err(e) => assert!(matches!(e, Error::UnknownOperation(o) if o == opcode)),
            }
        }
    }

    proptest! {
        #[test]
        fn lookup_accepts_exactly_the_declared_opcodes(opcode: u8) {
            match lookup(opcode) {
                Ok(entry) => {
                    prop_assert!((opcode as usize) < RequestKind::COUNT);
                    prop_assert_eq!(entry.opcode(), opcode);
                }
                Err(e) => {
                    prop_assert!((opcode as usize) >= RequestKind::COUNT);
                    prop_assert!(matches!(e, Error::UnknownOperation(_)));
                }
            }
        }
    }

    #[test]
    fn exactly_the_twelve_lock_opcodes_report_is_lock() {
        let lock_kinds = [
            RequestKind::AcquireNodeWriteLock,
            RequestKind::AcquireNodeReadLock,
            RequestKind::AcquireRelationshipWriteLock,
            RequestKind::AcquireRelationshipReadLock,
            RequestKind::AcquireGraphWriteLock,
            RequestKind::AcquireGraphReadLock,
            RequestKind::AcquireIndexReadLock,
            RequestKind::AcquireIndexWriteLock,
            RequestKind::AcquireSchemaReadLock,
            RequestKind::AcquireSchemaWriteLock,
            RequestKind::AcquireIndexEntryWriteLock,
            RequestKind::AcquireIndexEntryReadLock,
        ];
        for entry in catalog() {
            assert_eq!(
                entry.is_lock(),
                lock_kinds.contains(&entry.kind()),
                "is_lock mismatch for {}",
                entry.kind().name()
            );
        }
        assert_eq!(catalog().iter().filter(|e| e.is_lock()).count(), 12);
    }

    #[test]
    fn retired_lock_opcodes_reject_every_well_formed_request() {
        let mut frame = Vec::new();
        wire::write_u32(&mut frame, 2);
        wire::write_u64(&mut frame, 1);
        wire::write_u64(&mut frame, 2);

        for entry in catalog().iter().filter(|e| e.is_lock()) {
            let mut input: &[u8] = &frame;
            let mut output = Vec::new();
            let err = dispatch(entry, &UnreachableMaster, &context(), &mut input, &mut output)
                .unwrap_err();
            assert!(
                matches!(err, Error::ProtocolRejected(_)),
                "{} must reject stale clients",
                entry.kind().name()
            );
            assert!(output.is_empty());
        }
    }

    #[test]
    fn placeholder_opcodes_fail_for_every_input() {
        for kind in [
            RequestKind::PlaceholderForCopyTransactions,
            RequestKind::PushTransaction,
        ] {
            for payload in [&[][..], &[0, 1, 2, 3][..]] {
                let mut input: &[u8] = payload;
                let mut output = Vec::new();
                let err = dispatch(
                    request_type(kind),
                    &UnreachableMaster,
                    &context(),
                    &mut input,
                    &mut output,
                )
                .unwrap_err();
                assert!(matches!(err, Error::Unsupported(_)));
            }
        }
    }

    #[test]
    fn commit_never_returns_a_commit_id() {
        let mut input: &[u8] = &[0xDE, 0xAD, 0xBE, 0xEF];
        let mut output = Vec::new();
        let err = dispatch(
            request_type(RequestKind::Commit),
            &UnreachableMaster,
            &context(),
            &mut input,
            &mut output,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ProtocolRejected(_)));
        assert!(output.is_empty());
        // The legacy payload is fully drained.
        assert_eq!(input.len(), 0);
    }

    #[test]
    fn allocate_ids_rejects_unknown_id_type_ordinal() {
        let mut input: &[u8] = &[200];
        let mut output = Vec::new();
        let err = dispatch(
            request_type(RequestKind::AllocateIds),
            &UnreachableMaster,
            &context(),
            &mut input,
            &mut output,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Framing(_)));
    }
}
