//! Live request handlers produced by factories.

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};

use webmount_core::{Binding, Options};

/// A configured API instance that can claim and serve HTTP requests.
///
/// Handlers are built by exactly one [`HandlerFactory::new_handler`] call and
/// are never mutated by the registry or loader afterwards. They live until the
/// owning server drops them; there is no reload, a new configuration means a
/// new handler.
///
/// ## Matching
///
/// [`is_handler`](ApiHandler::is_handler) is probed for every in-flight
/// request, possibly against every mounted handler, before one is chosen. It
/// borrows the request, so it cannot consume the body, and it must stay a cheap,
/// non-blocking predicate (method/path/header comparisons). Repeated calls with
/// the same request must give the same answer.
///
/// [`serve`](ApiHandler::serve) only runs after `is_handler` returned `true`
/// for that request. It may be called concurrently for distinct requests;
/// any shared mutable state needs its own synchronisation.
///
/// [`HandlerFactory::new_handler`]: crate::HandlerFactory::new_handler
#[async_trait]
pub trait ApiHandler: Send + Sync {
    /// Binding of the factory that built this handler.
    fn binding(&self) -> &Binding;

    /// The options this handler was built from, exactly as passed in.
    fn options(&self) -> &Options;

    /// Path prefix this handler claims. Advisory; `is_handler` decides.
    fn root_path(&self) -> &str;

    fn is_handler(&self, request: &Request<Body>) -> bool;

    async fn serve(&self, request: Request<Body>) -> Response;
}

impl core::fmt::Debug for dyn ApiHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiHandler")
            .field("binding", self.binding())
            .field("root_path", &self.root_path())
            .finish_non_exhaustive()
    }
}

/// Segment-aware prefix test for request paths.
///
/// `/api` covers `/api`, `/api/` and `/api/widgets` but not `/apiary`.
/// An empty root or `/` covers every path.
pub fn is_under_root(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return true;
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
