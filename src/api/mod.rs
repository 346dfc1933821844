//! Hammergen API access
//!
//! # Module Structure
//!
//! - [`http`] - [`Transport`] trait and the reqwest-backed [`HttpTransport`]
//! - [`crud`] - Generic CRUD client driven by a [`ResourceConverter`]
//! - [`error`] - [`ApiError`] and user-facing error formatting
//!
//! # Example
//!
//! ```ignore
//! use hammergen_client::api::HttpTransport;
//! use hammergen_client::mutation::MutationApi;
//!
//! async fn example() -> hammergen_client::api::ApiResult<()> {
//!     let transport = HttpTransport::new("http://localhost:8080", None)?;
//!     let mutations = MutationApi::new(transport).list().await?;
//!     Ok(())
//! }
//! ```

pub mod crud;
pub mod error;
pub mod http;

pub use crud::{CrudClient, ResourceConverter};
pub use error::{format_api_error, ApiError, ApiResult};
pub use http::{HttpTransport, Transport};
