//! Identity and authorization: token service, demo role resolution, the
//! per-request authentication gate and the role guard it feeds.

pub mod credentials;
pub mod gate;
pub mod guard;
pub mod identity;
pub mod roles;
pub mod token;

pub use identity::Identity;
pub use roles::{resolve_role, Role};
pub use token::{Claims, TokenService};
