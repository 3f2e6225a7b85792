//! Transport layer for communicating with the optimization service
//!
//! This module provides the transport abstraction, the HTTP implementation
//! and the newline framing used to split the streamed response body.

pub mod framing;
pub mod http;

use std::pin::Pin;

use futures::Stream;

use crate::error::Result;
use crate::types::events::OptimizeRequest;
use crate::types::model_status::ModelStatusReport;

/// Raw response body chunks as they arrive from the network
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>> + Send>>;

/// Transport trait for reaching the optimization service
///
/// One `open_stream` call is made per submission. The returned stream yields
/// body chunks at arbitrary boundaries; an `Err` item ends the stream.
pub trait Transport: Send + Sync {
    /// Issue the optimize request and return the streaming body
    ///
    /// # Arguments
    /// * `request` - Prompt and optional starting prompt
    ///
    /// # Errors
    /// Returns error if the request fails or the server answers with a
    /// non-success status
    fn open_stream(
        &self,
        request: &OptimizeRequest,
    ) -> impl std::future::Future<Output = Result<ByteStream>> + Send;

    /// Query the model and API key status endpoint
    ///
    /// # Errors
    /// Returns error if the request fails or the payload does not decode
    fn fetch_status(&self) -> impl std::future::Future<Output = Result<ModelStatusReport>> + Send;
}

pub use framing::FrameDecoder;
pub use http::HttpTransport;
