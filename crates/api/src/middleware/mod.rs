//! Request extractors.
//!
//! - [`admin::AdminUser`] -- the back-office admin forwarded by the auth proxy.

pub mod admin;
