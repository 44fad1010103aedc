//! SimpleAI Library
//!
//! Launch routing, instance spawning and window geometry persistence shared
//! by the picker and service windows. Every process is an independent
//! instance: the picker spawns copies of the executable with a service id,
//! each of which routes itself straight to that service.

pub mod catalog;
pub mod chrome;
pub mod config;
pub mod debounce;
pub mod error;
pub mod geometry;
pub mod gui;
pub mod host;
pub mod launch;
pub mod launcher;
pub mod router;
pub mod webview;
