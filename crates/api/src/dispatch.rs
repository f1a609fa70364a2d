//! Request dispatch across the handlers mounted on one listener.
//!
//! ## Selection
//!
//! Every handler's `is_handler` is probed; `root_path` is only used to rank
//! the handlers that said yes:
//!
//! 1. the longest root path wins (trailing `/` ignored),
//! 2. equal lengths go to the handler registered first.
//!
//! Requests nobody claims get a JSON `404`.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::from_fn,
    response::Response,
};
use tower::ServiceBuilder;

use crate::{ApiHandler, errors, middleware::trace_requests};

/// Ordered set of handlers for one listener.
#[derive(Debug, Default, Clone)]
pub struct Demux {
    handlers: Vec<Arc<dyn ApiHandler>>,
}

impl Demux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; registration order breaks selection ties.
    pub fn push(&mut self, handler: Arc<dyn ApiHandler>) {
        self.handlers.push(handler);
    }

    pub fn handlers(&self) -> &[Arc<dyn ApiHandler>] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler that should serve `request`, if any.
    pub fn select(&self, request: &Request<Body>) -> Option<&Arc<dyn ApiHandler>> {
        let mut best: Option<(&Arc<dyn ApiHandler>, usize)> = None;
        for handler in &self.handlers {
            if !handler.is_handler(request) {
                continue;
            }
            let specificity = specificity(handler.root_path());
            match best {
                Some((_, current)) if current >= specificity => {}
                _ => best = Some((handler, specificity)),
            }
        }
        best.map(|(handler, _)| handler)
    }

    /// Serve `request` with the selected handler or answer `404`.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        match self.select(&request) {
            Some(handler) => {
                tracing::trace!(
                    binding = %handler.binding(),
                    root_path = handler.root_path(),
                    path = request.uri().path(),
                    "dispatching request"
                );
                handler.serve(request).await
            }
            None => {
                tracing::debug!(path = request.uri().path(), "no api handler matched");
                errors::no_handler(request.uri().path())
            }
        }
    }

    /// Axum router sending every request through [`Demux::dispatch`].
    pub fn into_router(self) -> Router {
        Router::new()
            .fallback(dispatch_request)
            .with_state(Arc::new(self))
            .layer(ServiceBuilder::new().layer(from_fn(trace_requests)))
    }
}

impl FromIterator<Arc<dyn ApiHandler>> for Demux {
    fn from_iter<I: IntoIterator<Item = Arc<dyn ApiHandler>>>(iter: I) -> Self {
        Self {
            handlers: iter.into_iter().collect(),
        }
    }
}

async fn dispatch_request(State(demux): State<Arc<Demux>>, request: Request<Body>) -> Response {
    demux.dispatch(request).await
}

fn specificity(root_path: &str) -> usize {
    root_path.trim_end_matches('/').len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::to_bytes, http::{Method, StatusCode}};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use webmount_core::{Binding, Options};

    use crate::is_under_root;

    /// Claims `root` (optionally only for one method) and answers with its tag.
    struct StubHandler {
        binding: Binding,
        options: Options,
        root: String,
        method: Option<Method>,
        tag: &'static str,
        served: AtomicUsize,
    }

    impl StubHandler {
        fn new(root: &str, tag: &'static str) -> Self {
            Self {
                binding: Binding::new("stub"),
                options: Options::new().with("path", root.to_string()),
                root: root.to_string(),
                method: None,
                tag,
                served: AtomicUsize::new(0),
            }
        }

        fn only(mut self, method: Method) -> Self {
            self.method = Some(method);
            self
        }
    }

    #[async_trait]
    impl ApiHandler for StubHandler {
        fn binding(&self) -> &Binding {
            &self.binding
        }

        fn options(&self) -> &Options {
            &self.options
        }

        fn root_path(&self) -> &str {
            &self.root
        }

        fn is_handler(&self, request: &Request<Body>) -> bool {
            if let Some(m) = &self.method {
                if request.method() != m {
                    return false;
                }
            }
            is_under_root(request.uri().path(), &self.root)
        }

        async fn serve(&self, _request: Request<Body>) -> Response {
            self.served.fetch_add(1, Ordering::SeqCst);
            Response::new(Body::from(self.tag))
        }
    }

    fn stub(root: &str) -> Arc<dyn ApiHandler> {
        Arc::new(StubHandler::new(root, "stub"))
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    fn tag(demux: &Demux, request: &Request<Body>) -> Option<String> {
        demux
            .select(request)
            .map(|h| h.options().get("path").unwrap().as_str().unwrap().to_string())
    }

    #[test]
    fn longest_root_path_wins() {
        let demux: Demux = ["/", "/api/v1", "/api"].into_iter().map(stub).collect();

        assert_eq!(tag(&demux, &get("/api/v1/widgets")).as_deref(), Some("/api/v1"));
        assert_eq!(tag(&demux, &get("/api/v2/widgets")).as_deref(), Some("/api"));
        assert_eq!(tag(&demux, &get("/elsewhere")).as_deref(), Some("/"));
    }

    #[test]
    fn equal_roots_resolve_to_first_registered() {
        let mut demux = Demux::new();
        demux.push(Arc::new(StubHandler::new("/api", "first")));
        demux.push(Arc::new(StubHandler::new("/api/", "second")));

        let selected = demux.select(&get("/api/x")).unwrap();
        assert!(Arc::ptr_eq(selected, &demux.handlers()[0]));
    }

    #[test]
    fn is_handler_is_authoritative_over_root_path() {
        let mut demux = Demux::new();
        demux.push(Arc::new(StubHandler::new("/api/v1", "writes").only(Method::POST)));
        demux.push(Arc::new(StubHandler::new("/api", "reads")));

        let get_req = get("/api/v1/widgets");
        assert!(Arc::ptr_eq(demux.select(&get_req).unwrap(), &demux.handlers()[1]));

        let post_req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/widgets")
            .body(Body::empty())
            .unwrap();
        assert!(Arc::ptr_eq(demux.select(&post_req).unwrap(), &demux.handlers()[0]));
    }

    #[test]
    fn unmatched_request_selects_nothing() {
        let demux: Demux = std::iter::once(stub("/api")).collect();
        assert!(demux.select(&get("/other")).is_none());
        assert!(Demux::new().select(&get("/")).is_none());
    }

    #[tokio::test]
    async fn dispatch_serves_only_the_selected_handler() {
        let api = Arc::new(StubHandler::new("/api", "api"));
        let root = Arc::new(StubHandler::new("/", "root"));
        let mut demux = Demux::new();
        demux.push(root.clone());
        demux.push(api.clone());

        let res = demux.dispatch(get("/api/widgets")).await;
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"api");
        assert_eq!(api.served.load(Ordering::SeqCst), 1);
        assert_eq!(root.served.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn router_answers_404_json_when_nothing_matches() {
        use tower::ServiceExt;

        let demux: Demux = std::iter::once(stub("/api")).collect();
        let router = demux.into_router();

        let res = router.clone().oneshot(get("/other")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "not_found");

        let res = router.oneshot(get("/api/widgets")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    proptest! {
        /// Property: probing is deterministic and leaves handlers untouched.
        #[test]
        fn selection_is_deterministic(path in "(/[a-z]{1,4}){0,4}") {
            let path = if path.is_empty() { "/".to_string() } else { path };
            let demux: Demux = ["/", "/a", "/ab", "/a/b", "/b"]
                .into_iter()
                .map(stub)
                .collect();
            let before: Vec<(String, Options)> = demux
                .handlers()
                .iter()
                .map(|h| (h.root_path().to_string(), h.options().clone()))
                .collect();

            let request = get(&path);
            let first = demux.select(&request).map(|h| h.root_path().to_string());
            for _ in 0..3 {
                let again = demux.select(&request).map(|h| h.root_path().to_string());
                prop_assert_eq!(&again, &first);
            }
            // "/" claims everything, so something always matches
            prop_assert!(first.is_some());

            let after: Vec<(String, Options)> = demux
                .handlers()
                .iter()
                .map(|h| (h.root_path().to_string(), h.options().clone()))
                .collect();
            prop_assert_eq!(after, before);
        }
    }
}
