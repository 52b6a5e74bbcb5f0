//! Discovery and booking engine for the Service on Call marketplace.
//!
//! The crate is split hexagonally: [`domain`] holds entities, ports, and the
//! two application services (search resolution and serialized mutations);
//! [`outbound`] holds the driven adapters that reach the hosted data store
//! and the AI advisor over HTTP. Presentation concerns live outside this
//! crate entirely; consumers render the snapshot and outcomes it exposes.

pub mod domain;
pub mod outbound;
