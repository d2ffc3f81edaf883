//! Transport infrastructure - Combined-query transports

mod http;

pub use http::GraphqlHttpTransport;
