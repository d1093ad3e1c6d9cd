//! Route modules:
//!
//! - `certificates` - issue, list, read, update and revoke
//! - `network` - chain and contract description
//! - `settings` - read and replace runtime settings
//! - `content` - serve locally stored blobs

pub mod certificates;
pub mod content;
pub mod network;
pub mod settings;
