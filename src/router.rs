//! Method + path route table with per-path middleware, dispatched from an
//! explicit request context.
//!
//! Paths are normalised before lookup: a path with two or more segments is
//! looked up as `/{first}/{id}` with the second segment bound to `id`; any
//! other path is looked up literally. Middleware is keyed by the same
//! normalised path, so an overlay on `/user` does not cover `/user/{id}`.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Placeholder used in member route patterns.
pub const ID_PARAM: &str = "id";

/// Everything a handler may look at. Built once per request.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub params: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        RequestContext {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: header::HeaderName, value: &str) -> Self {
        if let Ok(v) = value.parse() {
            self.headers.insert(name, v);
        }
        self
    }

    /// Read an axum request in full.
    pub async fn from_request(req: Request) -> Result<Self, AppError> {
        let (parts, body) = req.into_parts();
        let body = to_bytes(body, usize::MAX)
            .await
            .map_err(|_| AppError::BadRequest("Invalid request body".into()))?;
        Ok(RequestContext {
            method: parts.method,
            path: parts.uri.path().to_string(),
            headers: parts.headers,
            body,
            params: HashMap::new(),
        })
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The body as a non-empty JSON object. Empty, unparseable, non-object and
    /// `{}` bodies all yield `None`.
    pub fn json_object(&self) -> Option<Map<String, Value>> {
        match serde_json::from_slice::<Value>(&self.body) {
            Ok(Value::Object(map)) if !map.is_empty() => Some(map),
            _ => None,
        }
    }

    /// `Authorization` header value with the `Bearer` scheme word removed.
    pub fn bearer_token(&self) -> Option<&str> {
        let raw = self.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = raw.trim().strip_prefix("Bearer").unwrap_or(raw).trim();
        Some(token)
    }
}

#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, req: &RequestContext) -> Result<Response, AppError>;
}

/// Runs before the matching handler; an error short-circuits the request.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn before(&self, req: &RequestContext) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct RouteEntry {
    pub method: Method,
    pub path: String,
    pub handler: Arc<dyn RouteHandler>,
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Split a request path into its dispatch key and bound parameters.
pub fn normalize_path(path: &str) -> (String, HashMap<String, String>) {
    let parts: Vec<&str> = path.split('/').collect();
    let mut params = HashMap::new();
    if parts.len() > 2 {
        params.insert(ID_PARAM.to_string(), parts[2].to_string());
        (format!("/{}/{{{}}}", parts[1], ID_PARAM), params)
    } else {
        (path.to_string(), params)
    }
}

#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<Method, HashMap<String, Arc<dyn RouteHandler>>>,
    middleware: HashMap<Method, HashMap<String, Vec<Arc<dyn Middleware>>>>,
    /// Registration order, for introspection. Replaced entries keep their slot.
    order: Vec<(Method, String)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering the same method and path again replaces the handler.
    pub fn register(&mut self, entry: RouteEntry) {
        let previous = self
            .routes
            .entry(entry.method.clone())
            .or_default()
            .insert(entry.path.clone(), entry.handler);
        if previous.is_none() {
            self.order.push((entry.method, entry.path));
        }
    }

    pub fn register_all(&mut self, entries: impl IntoIterator<Item = RouteEntry>) {
        for entry in entries {
            self.register(entry);
        }
    }

    fn add(&mut self, method: Method, path: &str, handler: Arc<dyn RouteHandler>) {
        self.register(RouteEntry {
            method,
            path: path.to_string(),
            handler,
        });
    }

    pub fn get(&mut self, path: &str, handler: Arc<dyn RouteHandler>) {
        self.add(Method::GET, path, handler);
    }

    pub fn post(&mut self, path: &str, handler: Arc<dyn RouteHandler>) {
        self.add(Method::POST, path, handler);
    }

    pub fn put(&mut self, path: &str, handler: Arc<dyn RouteHandler>) {
        self.add(Method::PUT, path, handler);
    }

    pub fn delete(&mut self, path: &str, handler: Arc<dyn RouteHandler>) {
        self.add(Method::DELETE, path, handler);
    }

    /// Attach middleware to an exact dispatch key for each `|`-separated method.
    pub fn apply_middleware(&mut self, methods: &str, path: &str, middleware: Arc<dyn Middleware>) {
        for method in methods.split('|').map(str::trim).filter(|m| !m.is_empty()) {
            let Ok(method) = Method::from_bytes(method.to_ascii_uppercase().as_bytes()) else {
                tracing::warn!(method, "ignoring middleware for unknown method");
                continue;
            };
            self.middleware
                .entry(method)
                .or_default()
                .entry(path.to_string())
                .or_default()
                .push(middleware.clone());
        }
    }

    /// Registered (method, path) pairs in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.order.iter().map(|(m, p)| (m, p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub async fn dispatch(&self, mut req: RequestContext) -> Response {
        let (route_path, params) = normalize_path(&req.path);
        req.params.extend(params);
        tracing::debug!(method = %req.method, path = %req.path, route = %route_path, "dispatch");

        if let Some(chain) = self
            .middleware
            .get(&req.method)
            .and_then(|by_path| by_path.get(&route_path))
        {
            for mw in chain {
                if let Err(err) = mw.before(&req).await {
                    return err.into_response();
                }
            }
        }

        let handler = self
            .routes
            .get(&req.method)
            .and_then(|by_path| by_path.get(&route_path));
        match handler {
            Some(h) => h.handle(&req).await.unwrap_or_else(IntoResponse::into_response),
            None => AppError::NotFound("Route not found".into()).into_response(),
        }
    }

    /// Mount the table as the fallback of an axum router.
    pub fn into_service(self) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch_http)
            .with_state(Arc::new(self))
    }
}

async fn dispatch_http(State(table): State<Arc<RouteTable>>, req: Request) -> Response {
    match RequestContext::from_request(req).await {
        Ok(ctx) => table.dispatch(ctx).await,
        Err(err) => err.into_response(),
    }
}
