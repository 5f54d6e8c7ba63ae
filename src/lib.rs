//! # chowk
//!
//! Session core for the Career Chowk student-resource portal.
//!
//! The portal's public pages are plain content; everything under the
//! dashboard sits behind a route guard. This crate owns the guard and the
//! pieces it needs: the persisted token slot, the token payload decoder,
//! the validation state machine with its remote session check, and the
//! login/logout flows that write and clear the token.
//!
//! The `chowk` binary is a terminal front end over the same library.

pub mod api;
pub mod config;
pub mod guard;
pub mod nav;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod token;
