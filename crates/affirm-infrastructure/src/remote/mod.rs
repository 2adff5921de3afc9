//! Remote document store and identity adapters.

mod auth;
mod http_document_store;
mod offline_document_store;

pub use auth::StaticTokenProvider;
pub use http_document_store::HttpDocumentStore;
pub use offline_document_store::OfflineDocumentStore;
