use std::collections::HashMap;

use shared::domain::HttpMethod;
use url::form_urlencoded;

use crate::route::RouteMatch;

/// One incoming request as the dispatcher sees it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: HttpMethod,
    url: String,
    path: String,
    params: Vec<(String, String)>,
    headers: HashMap<String, String>,
    route: Option<RouteMatch>,
}

impl RequestContext {
    /// `url` is the request target as received, path plus optional query.
    pub fn new(method: impl Into<HttpMethod>, url: impl Into<String>) -> Self {
        let url = url.into();
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query)),
            None => (url.clone(), None),
        };
        let params = query
            .map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self {
            method: method.into(),
            url,
            path,
            params,
            headers: HashMap::new(),
            route: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Appends `application/x-www-form-urlencoded` body fields after the query params.
    pub fn with_form_body(mut self, body: &[u8]) -> Self {
        self.params
            .extend(form_urlencoded::parse(body).into_owned());
        self
    }

    pub(crate) fn bind_route(&mut self, route: RouteMatch) {
        self.route = Some(route);
    }

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|(key, _)| key == name)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn route(&self) -> Option<&RouteMatch> {
        self.route.as_ref()
    }

    pub fn key(&self) -> Option<&str> {
        self.route.as_ref().and_then(|route| route.key.as_deref())
    }
}
