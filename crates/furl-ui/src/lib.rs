//! # Search header
//!
//! A list header that shrinks as the list scrolls and collapses to a pinned
//! search bar while its field is focused. [`SearchHeader`] owns the whole
//! animation graph; the host feeds it events and applies [`HeaderOutputs`]
//! after every pass.
//!
//! ```rust
//! use furl_core::ManualTime;
//! use furl_ui::*;
//!
//! let time = ManualTime::new();
//! let mut header = SearchHeader::new(HeaderConfig::default(), time.clone()).unwrap();
//!
//! header.on_scroll(30.0).unwrap();
//! assert_eq!(header.outputs().unwrap().header_height, 110.0);
//!
//! header.on_focus().unwrap();
//! while header.needs_frame() {
//!     time.advance_ms(16);
//!     header.frame().unwrap();
//! }
//! assert_eq!(header.outputs().unwrap().header_height, 72.0);
//! assert_eq!(header.phase(), HeaderPhase::Collapsed);
//! ```
//!
//! Hosts call [`SearchHeader::frame`] from their animation callback for as
//! long as [`SearchHeader::needs_frame`] holds.

pub mod config;
pub mod error;
pub mod header;
pub mod host;
pub mod search_input;
pub mod state;
pub mod tests;

pub use config::HeaderConfig;
pub use error::{ConfigError, HeaderError, Result};
pub use header::{CONTENT_OFFSET_Y, HeaderCells, SearchHeader};
pub use host::{HeaderOutputs, ScrollHost, TextFieldHost};
pub use search_input::SearchInput;
pub use state::{Armed, FocusState, HeaderPhase};
