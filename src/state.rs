//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. All
//! of it is immutable after start-up: the compiled route table, the guard,
//! the product catalog (absent if loading failed), and the SPA shell.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::nav::{NavigationGuard, RouteTable};

/// Clone is required by Axum; every field is Arc-wrapped or cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub guard: NavigationGuard,
    /// `None` when the catalog failed to load; product endpoints then degrade.
    pub catalog: Option<Arc<Catalog>>,
    /// Contents of the front-end `index.html`, if a dist directory is configured.
    pub shell: Option<Arc<str>>,
}

impl AppState {
    #[must_use]
    pub fn new(routes: RouteTable, catalog: Option<Catalog>) -> Self {
        Self { routes: Arc::new(routes), guard: NavigationGuard::default(), catalog: catalog.map(Arc::new), shell: None }
    }

    #[must_use]
    pub fn with_shell(mut self, html: impl Into<Arc<str>>) -> Self {
        self.shell = Some(html.into());
        self
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::nav::route::{mark_protected, standard_routes};

    pub const SAMPLE_CSV: &str = "\
Label,Brand,Name,Price
Moisturizer,LA MER,Crème de la Mer,175
Cleanser,TATCHA,The Rice Wash,68
";

    /// Standard routes with `recommendation` protected, plus a two-row catalog.
    #[must_use]
    pub fn test_app_state() -> AppState {
        let mut routes = standard_routes();
        mark_protected(&mut routes, &["recommendation".into()]);
        let table = RouteTable::new(routes).expect("standard routes should compile");
        let catalog = Catalog::from_reader(SAMPLE_CSV.as_bytes()).expect("sample catalog should parse");
        AppState::new(table, Some(catalog))
    }

    /// Same as `test_app_state` but with no catalog loaded.
    #[must_use]
    pub fn test_app_state_without_catalog() -> AppState {
        let mut state = test_app_state();
        state.catalog = None;
        state
    }
}
