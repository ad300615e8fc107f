//! HTTP API for browsing Vetrina collections: collection listing, facet
//! listings, paginated card search, item details.

pub mod locale;
pub mod routes;
pub mod server;
pub mod state;

mod error;

pub use error::{Result, WebError};
pub use locale::resolve_locale;
pub use server::{start_server, WebConfig};
pub use state::AppState;
