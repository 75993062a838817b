use regex::Regex;
use shared::domain::RouteKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub kind: RouteKind,
    pub controller: String,
    pub key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Route {
    pattern: Regex,
    kind: RouteKind,
}

impl Route {
    pub fn new(pattern: &str, kind: RouteKind) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            kind,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    fn captures(&self, path: &str) -> Option<RouteMatch> {
        let caps = self.pattern.captures(path)?;
        let controller = caps.get(1)?.as_str().to_string();
        let key = match self.kind {
            RouteKind::Member => Some(caps.get(2)?.as_str().to_string()),
            RouteKind::Collection => None,
        };
        Some(RouteMatch {
            kind: self.kind,
            controller,
            key,
        })
    }
}

pub const MEMBER_PATTERN: &str = r"^/([^/]+)/([^/]+)/?$";
pub const COLLECTION_PATTERN: &str = r"^/([^/]+)/?$";

/// Ordered route list; the first matching route wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Member before collection: a member path also reads as a longer collection path.
    pub fn conventional() -> Self {
        let routes = [
            (MEMBER_PATTERN, RouteKind::Member),
            (COLLECTION_PATTERN, RouteKind::Collection),
        ]
        .into_iter()
        .map(|(pattern, kind)| {
            Route::new(pattern, kind).expect("conventional route patterns are valid regexes")
        })
        .collect();
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        self.routes.iter().find_map(|route| route.captures(path))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::conventional()
    }
}

#[cfg(test)]
#[path = "tests/route_tests.rs"]
mod tests;
