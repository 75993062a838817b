//! Convention-driven REST dispatch.
//!
//! `/{controller}` and `/{controller}/{key}` requests are routed to a
//! registered [`Controller`], one of its seven conventional actions is run, and
//! the resulting [`RenderContext`](shared::protocol::RenderContext) is rendered
//! through the `controller/action` template.

pub mod auth;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod render;
pub mod request;
pub mod resolve;
pub mod route;

pub use auth::{authorize, IdentityProvider};
pub use controller::{
    normalize_controller_name, Controller, ControllerBase, ControllerFactory, ControllerRegistry,
};
pub use dispatch::{Dispatcher, DispatcherConfig, RedirectPolicy, Reply};
pub use error::{DispatchError, RegistryError, RenderError};
pub use render::{template_id, Renderer, TemplateEngine, TemplateFallback};
pub use request::RequestContext;
pub use resolve::resolve_action;
pub use route::{Route, RouteMatch, RouteTable};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
