//! Domain collaborator contract
//!
//! The master is an opaque capability passed into every dispatcher call.
//! It is shared across all slave connections and externally synchronized;
//! this core never holds state of its own between requests.

use crate::response::Response;
use crate::types::{HandshakeResult, IdAllocation, IdType, RequestContext, StoreId};
use crate::{Result, wire};
use bytes::BufMut;

/// Master-side operations invoked by the request dispatchers.
///
/// Each call either produces a [`Response`] or fails with a domain error
/// that the transport reports back to the slave as a failed response.
/// ALLOCATE_IDS and COPY_STORE may block the calling connection's handling
/// thread; timeout policy belongs to the caller, but a failed call always
/// completes the request/response cycle.
pub trait Master: Send + Sync {
    /// Allocate an id range of the given type for the calling slave.
    fn allocate_ids(
        &self,
        context: &RequestContext,
        id_type: IdType,
    ) -> Result<Response<IdAllocation>>;

    /// Register a relationship type token, returning its id.
    fn create_relationship_type(
        &self,
        context: &RequestContext,
        name: &str,
    ) -> Result<Response<i32>>;

    /// Register a property key token, returning its id.
    fn create_property_key(&self, context: &RequestContext, name: &str) -> Result<Response<i32>>;

    /// Register a label token, returning its id.
    fn create_label(&self, context: &RequestContext, name: &str) -> Result<Response<i32>>;

    /// Deliver queued updates to the calling slave.
    fn pull_updates(&self, context: &RequestContext) -> Result<Response<()>>;

    /// Finalize or roll back the context's transaction.
    fn finish_transaction(&self, context: &RequestContext, success: bool) -> Result<Response<()>>;

    /// Validate protocol and epoch compatibility for a connecting slave.
    fn handshake(&self, tx_id: u64, store_id: Option<StoreId>) -> Result<Response<HandshakeResult>>;

    /// Stream the entire store to the requesting connection through
    /// `writer`. The payload bypasses the result encoders.
    fn copy_store(
        &self,
        context: &RequestContext,
        writer: &mut dyn StoreWriter,
    ) -> Result<Response<()>>;

    /// Register the start of a new transaction for this session.
    fn initialize_tx(&self, context: &RequestContext) -> Result<Response<()>>;
}

/// Sink the master streams store files into during COPY_STORE.
pub trait StoreWriter {
    /// Write one store file chunk.
    fn write_chunk(&mut self, path: &str, data: &[u8]) -> Result<()>;
}

/// [`StoreWriter`] that writes chunks straight into the outbound response
/// buffer: length-prefixed path, u32 payload length, payload bytes.
pub struct BufStoreWriter<'a> {
    target: &'a mut dyn BufMut,
}

impl<'a> BufStoreWriter<'a> {
    /// Wrap the outbound buffer of the current request.
    pub fn new(target: &'a mut dyn BufMut) -> Self {
        Self { target }
    }
}

impl StoreWriter for BufStoreWriter<'_> {
    fn write_chunk(&mut self, path: &str, data: &[u8]) -> Result<()> {
        wire::write_string(self.target, path);
        wire::write_u32(self.target, data.len() as u32);
        self.target.put_slice(data);
        Ok(())
    }
}
