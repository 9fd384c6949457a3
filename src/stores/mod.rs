//! Client-side state containers.
//!
//! DESIGN
//! ======
//! Each store owns its state inside a `watch` channel: setters mutate through
//! `send_modify`, readers borrow snapshots, observers `subscribe`.

pub mod search;
pub mod session;
pub mod storage;
