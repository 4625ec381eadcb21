//! Domain services used by the websocket and page routes.
//!
//! ARCHITECTURE
//! ============
//! `registry` owns every board session and is the single entry point for
//! routes. `command` and `clock` mutate one session at a time; `session`
//! holds the per-board data and the broadcast fan-out.

pub mod clock;
pub mod command;
pub mod pulse;
pub mod registry;
pub mod session;
