//! Core domain entities.

pub mod scan;
pub mod short_link;

pub use scan::NewScan;
pub use short_link::{ContentKind, NewShortLink, RouteStyle, ShortLink};
