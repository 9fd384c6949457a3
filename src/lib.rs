//! Cosmetics catalog: guarded front-end navigation, client stores, product API.
//!
//! ARCHITECTURE
//! ============
//! `nav` owns the route table and the auth guard, `stores` owns the session
//! and search state containers, `catalog` owns the CSV-backed product list.
//! `routes` stitches the catalog and the guard into a single Axum router that
//! the binary serves.

pub mod catalog;
pub mod config;
pub mod nav;
pub mod routes;
pub mod state;
pub mod stores;
