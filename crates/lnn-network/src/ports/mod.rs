//! # Ports Layer
//!
//! - `inbound`: what this crate offers the rest of the soft bus
//! - `outbound`: what it requires from its collaborators

pub mod inbound;
pub mod outbound;

pub use inbound::LnnNetworkApi;
pub use outbound::{CollaboratorError, Discovery, LinkStatus, Listener, MeshLeaver, NetQuery};
