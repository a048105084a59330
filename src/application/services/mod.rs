//! Application services orchestrating domain logic.

pub mod link_service;
pub mod redirect_service;

pub use link_service::{CreatedLink, CreationOutcome, LinkService};
pub use redirect_service::{RedirectService, Resolution};
