pub mod resolver;
pub mod source;
pub mod ttl;
pub mod types;

pub use resolver::ChannelResolver;
pub use source::CatalogSources;
pub use ttl::{CacheEntry, Clock, SystemClock, TtlCache};
pub use types::{BdixCatalog, BdixChannel, CatalogNumber, Channel, Playlist};
