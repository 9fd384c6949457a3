//! Route table: ordered path-pattern bindings to front-end views.
//!
//! DESIGN
//! ======
//! Descriptors are declared as a tree (parents with children) and flattened
//! once at construction into compiled entries. Each entry remembers its chain
//! of records from the root descriptor down to itself so the guard can OR the
//! `requires_auth` flags over the whole chain.
//!
//! Matching is first-match over the compiled order. Children are compiled
//! ahead of their parent, and catch-all patterns always sort last, so a
//! specific route never loses to a wildcard declared before it.

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

use std::collections::{BTreeMap, HashSet};

pub const HOME_ROUTE: &str = "home";
pub const LOGIN_ROUTE: &str = "login";
pub const LOGIN_PATH: &str = "/login";
pub const NOT_FOUND_ROUTE: &str = "not-found";

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("route `{name}` has an empty path pattern")]
    EmptyPattern { name: String },
    #[error("invalid parameter segment `{segment}`")]
    InvalidParam { segment: String },
    #[error("catch-all segment `{segment}` must be the last segment")]
    CatchAllNotLast { segment: String },
    #[error("duplicate route name `{0}`")]
    DuplicateName(String),
}

// =============================================================================
// PATH PATTERN
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Literal text, stored lowercase and compared case-insensitively.
    Static(String),
    /// `:name`: exactly one non-empty segment.
    Param(String),
    /// `:name(.*)*`: every remaining segment, possibly none.
    CatchAll(String),
}

/// A parsed route path such as `/product/:id` or `/:pathMatch(.*)*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern string.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed parameter segments or a catch-all that
    /// is not the final segment.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let parts: Vec<&str> = split_segments(raw).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            let segment = match part.strip_prefix(':') {
                Some(rest) => parse_param(rest).ok_or_else(|| RouteError::InvalidParam { segment: (*part).to_owned() })?,
                None => Segment::Static(part.to_ascii_lowercase()),
            };
            if matches!(segment, Segment::CatchAll(_)) && i + 1 != parts.len() {
                return Err(RouteError::CatchAllNotLast { segment: (*part).to_owned() });
            }
            segments.push(segment);
        }

        Ok(Self { raw: raw.to_owned(), segments })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::CatchAll(_)))
    }

    fn match_parts(&self, parts: &[&str]) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(literal) => {
                    if !parts.get(i)?.eq_ignore_ascii_case(literal) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), decode_param(parts.get(i)?));
                }
                Segment::CatchAll(name) => {
                    params.insert(name.clone(), decode_param(&parts[i..].join("/")));
                    return Some(params);
                }
            }
        }
        (parts.len() == self.segments.len()).then_some(params)
    }
}

fn parse_param(rest: &str) -> Option<Segment> {
    let (name, catch_all) = match rest.strip_suffix("(.*)*").or_else(|| rest.strip_suffix("(.*)")) {
        Some(name) => (name, true),
        None => (rest, false),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(if catch_all { Segment::CatchAll(name.to_owned()) } else { Segment::Param(name.to_owned()) })
}

/// Percent-decode a captured value. Invalid UTF-8 after decoding keeps the raw text.
fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), std::borrow::Cow::into_owned)
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strip query and fragment, collapse empty segments, drop trailing slash.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let joined = split_segments(path).collect::<Vec<_>>().join("/");
    format!("/{joined}")
}

fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        child.to_owned()
    } else if child.is_empty() {
        parent.to_owned()
    } else {
        format!("{}/{child}", parent.trim_end_matches('/'))
    }
}

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// Declarative route entry. Children inherit the parent's path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: String,
    pub name: String,
    pub view: String,
    pub requires_auth: bool,
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: impl Into<String>) -> Self {
        Self { path: path.into(), name: name.into(), view: view.into(), requires_auth: false, children: Vec::new() }
    }

    #[must_use]
    pub fn protected(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

/// The application's route table, in declaration order.
#[must_use]
pub fn standard_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("/", HOME_ROUTE, "HomeView"),
        RouteDescriptor::new("/about", "about", "AboutView"),
        RouteDescriptor::new("/recommendation", "recommendation", "RecommendationView"),
        RouteDescriptor::new("/search", "search", "SearchView"),
        RouteDescriptor::new("/product/:id", "product-details", "ProductDetailsView"),
        RouteDescriptor::new(LOGIN_PATH, LOGIN_ROUTE, "LoginView"),
        RouteDescriptor::new("/register", "register", "RegisterView"),
        RouteDescriptor::new("/:pathMatch(.*)*", NOT_FOUND_ROUTE, "NotFoundView"),
    ]
}

/// Set `requires_auth` on every descriptor (at any depth) whose name is listed.
///
/// Returns the listed names that matched no descriptor.
pub fn mark_protected(routes: &mut [RouteDescriptor], names: &[String]) -> Vec<String> {
    fn walk(routes: &mut [RouteDescriptor], names: &[String], seen: &mut HashSet<String>) {
        for route in routes {
            if names.iter().any(|n| *n == route.name) {
                route.requires_auth = true;
                seen.insert(route.name.clone());
            }
            walk(&mut route.children, names, seen);
        }
    }

    let mut seen = HashSet::new();
    walk(routes, names, &mut seen);
    names.iter().filter(|n| !seen.contains(*n)).cloned().collect()
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// One flattened descriptor with its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub name: String,
    pub path: String,
    pub view: String,
    pub requires_auth: bool,
}

#[derive(Debug)]
struct CompiledRoute {
    pattern: PathPattern,
    /// Indices into `RouteTable::records`, root first, this route last.
    chain: Vec<usize>,
}

/// Result of matching a concrete path.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    /// Normalized request path.
    pub path: String,
    pub params: BTreeMap<String, String>,
    /// Matched records from the outermost parent down to the leaf.
    pub matched: Vec<&'a RouteRecord>,
    pub leaf: &'a RouteRecord,
    pub catch_all: bool,
}

impl RouteMatch<'_> {
    /// True if any record in the matched chain requires authentication.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|r| r.requires_auth)
    }
}

/// Immutable, compiled route table.
#[derive(Debug)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    compiled: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Compile descriptors into a table.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate names or malformed patterns.
    pub fn new(descriptors: Vec<RouteDescriptor>) -> Result<Self, RouteError> {
        let mut table = Self { records: Vec::new(), compiled: Vec::new() };
        let mut names = HashSet::new();
        for descriptor in descriptors {
            table.compile(descriptor, "", &[], &mut names)?;
        }
        // Stable: declaration order is kept within each group.
        table.compiled.sort_by_key(|c| c.pattern.is_catch_all());
        Ok(table)
    }

    fn compile(
        &mut self,
        descriptor: RouteDescriptor,
        parent_path: &str,
        parent_chain: &[usize],
        names: &mut HashSet<String>,
    ) -> Result<(), RouteError> {
        if descriptor.path.is_empty() && parent_chain.is_empty() {
            return Err(RouteError::EmptyPattern { name: descriptor.name });
        }
        if !names.insert(descriptor.name.clone()) {
            return Err(RouteError::DuplicateName(descriptor.name));
        }

        let full_path = join_paths(parent_path, &descriptor.path);
        let pattern = PathPattern::parse(&full_path)?;

        let index = self.records.len();
        self.records.push(RouteRecord {
            name: descriptor.name,
            path: full_path.clone(),
            view: descriptor.view,
            requires_auth: descriptor.requires_auth,
        });
        let mut chain = parent_chain.to_vec();
        chain.push(index);

        for child in descriptor.children {
            self.compile(child, &full_path, &chain, names)?;
        }
        self.compiled.push(CompiledRoute { pattern, chain });
        Ok(())
    }

    /// Match a concrete path (query and fragment are ignored).
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        let parts: Vec<&str> = split_segments(&path).collect();

        self.compiled.iter().find_map(|route| {
            let params = route.pattern.match_parts(&parts)?;
            let matched: Vec<&RouteRecord> = route.chain.iter().map(|&i| &self.records[i]).collect();
            let leaf = *matched.last()?;
            Some(RouteMatch { path: path.clone(), params, matched, leaf, catch_all: route.pattern.is_catch_all() })
        })
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// All records in declaration order (parents before children).
    #[must_use]
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }
}
