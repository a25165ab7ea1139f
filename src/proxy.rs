pub mod client;
pub mod headers;

pub use client::{ManifestFetch, ProxyClient, body_preview};
pub use headers::{BrowserHeaders, HLS_ACCEPT, ANY_ACCEPT};
