//! The single inbound request handler.
//!
//! A bridge has exactly one [`RequestHandler`], supplied at construction. It
//! receives the raw decoded payload; narrowing it to a concrete shape is the
//! handler's job. Returning `Ok(None)` declines the request, which the
//! content side sees as an ordinary "no content" reply.
//!
//! Handlers are invoked concurrently for concurrent inbound messages and must
//! tolerate that or serialize internally.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use bridge_traits::platform::PlatformSendSync;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RequestHandler: PlatformSendSync {
    /// Answer one request. `Err` is rendered to text before crossing the
    /// boundary; its structure never reaches the content side.
    async fn handle(&self, request: Value) -> anyhow::Result<Option<Value>>;
}

/// Adapter turning an async closure into a [`RequestHandler`].
pub struct FnHandler<F> {
    f: F,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<Value>>> + Send,
{
    async fn handle(&self, request: Value) -> anyhow::Result<Option<Value>> {
        (self.f)(request).await
    }
}

/// Wrap an async closure over raw values as a shareable handler.
///
/// ```rust
/// use core_bridge::handler::handler_fn;
/// use serde_json::json;
///
/// let echo = handler_fn(|request| async move { Ok(Some(json!({ "echo": request }))) });
/// # let _ = echo;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn RequestHandler>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<Value>>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

/// Handler that narrows requests to `T` before calling `f`.
///
/// Requests that do not deserialize as `T` are declined rather than treated
/// as errors.
pub struct TypedHandler<T, R, F> {
    f: F,
    _marker: PhantomData<fn(T) -> R>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<T, R, F, Fut> RequestHandler for TypedHandler<T, R, F>
where
    T: DeserializeOwned + Send + 'static,
    R: Serialize + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Option<R>>> + Send,
{
    async fn handle(&self, request: Value) -> anyhow::Result<Option<Value>> {
        let request: T = match serde_json::from_value(request) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, "Declining request that does not match the handler's shape");
                return Ok(None);
            }
        };

        match (self.f)(request).await? {
            Some(response) => Ok(Some(serde_json::to_value(response)?)),
            None => Ok(None),
        }
    }
}

pub fn typed_handler_fn<T, R, F, Fut>(f: F) -> Arc<dyn RequestHandler>
where
    T: DeserializeOwned + Send + 'static,
    R: Serialize + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<R>>> + Send + 'static,
{
    Arc::new(TypedHandler {
        f,
        _marker: PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    #[serde(tag = "type", rename_all = "camelCase")]
    enum Request {
        Ping,
        Add { a: i64, b: i64 },
    }

    #[tokio::test]
    async fn test_fn_handler_passes_raw_value() {
        let handler = handler_fn(|request| async move { Ok(Some(json!({ "echo": request }))) });

        let response = handler.handle(json!([1, "two"])).await.unwrap();
        assert_eq!(response, Some(json!({"echo": [1, "two"]})));
    }

    #[tokio::test]
    async fn test_fn_handler_error_keeps_message() {
        let handler = handler_fn(|_| async { Err(anyhow::anyhow!("boom")) });

        let err = handler.handle(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_typed_handler_narrows() {
        let handler = typed_handler_fn(|request: Request| async move {
            Ok(match request {
                Request::Ping => None,
                Request::Add { a, b } => Some(a + b),
            })
        });

        assert_eq!(
            handler.handle(json!({"type": "add", "a": 2, "b": 3})).await.unwrap(),
            Some(json!(5))
        );
        assert_eq!(handler.handle(json!({"type": "ping"})).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_typed_handler_declines_unknown_shape() {
        let handler = typed_handler_fn(|_: Request| async { Ok(Some("unreachable")) });

        assert_eq!(handler.handle(json!({"type": "unknown"})).await.unwrap(), None);
        assert_eq!(handler.handle(json!("ping")).await.unwrap(), None);
    }
}
