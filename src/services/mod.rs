//! Session services used by the route guard and the terminal front end.
//!
//! ARCHITECTURE
//! ============
//! Each module is a set of functions over `AppState`: `session` runs the
//! validation state machine, `login`/`logout` write and clear the token,
//! and `verdict_cache` optionally short-circuits repeat remote checks.

pub mod login;
pub mod logout;
pub mod session;
pub mod verdict_cache;
