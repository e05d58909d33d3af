//! Host -> content calls over the script evaluation primitive.

use std::time::Duration;

use bridge_traits::content::{ContentWorld, ScriptArguments, ScriptEvaluator};
use bridge_traits::BridgeError;
use core_runtime::config::{BridgeConfig, HostConfig, PayloadLimits};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::payload;
use crate::script::{self, ResponderEnvelope, DATA_ARGUMENT};

/// Builds and evaluates the responder call for one bridge configuration.
#[derive(Debug, Clone)]
pub struct OutboundCaller {
    bridge: BridgeConfig,
    limits: PayloadLimits,
    call_timeout: Option<Duration>,
    body: String,
}

impl OutboundCaller {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            bridge: config.bridge.clone(),
            limits: config.payload_limits,
            call_timeout: config.call_timeout,
            body: script::responder_call_body(&config.bridge),
        }
    }

    /// The evaluated function body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Deliver `payload` to the content responder and await its result.
    ///
    /// The body is evaluated in the page world so that it sees the same
    /// globals the content application assigned its responder on.
    pub async fn call<E>(&self, evaluator: &E, payload: Value) -> Result<Option<Value>>
    where
        E: ScriptEvaluator + ?Sized,
    {
        let stats = payload::inspect(&payload, &self.limits)?;
        debug!(bytes = stats.bytes, "Calling content responder");

        let mut arguments = ScriptArguments::new();
        arguments.insert(DATA_ARGUMENT.to_string(), payload);

        let evaluation = evaluator.call_async_script(&self.body, arguments, ContentWorld::Page);
        let settled = self.bounded(evaluation).await?;

        let envelope = match settled {
            Ok(envelope) => envelope,
            Err(BridgeError::ScriptException { message })
                if script::is_missing_function_error(&message, &self.bridge) =>
            {
                return Err(self.no_handler());
            }
            Err(err) => {
                warn!(error = %err, "Script evaluation failed");
                return Err(Error::from(err));
            }
        };

        match ResponderEnvelope::decode(envelope) {
            Ok(ResponderEnvelope::Ok { value }) => {
                if let Some(value) = &value {
                    payload::inspect(value, &self.limits)?;
                }
                Ok(value)
            }
            Ok(ResponderEnvelope::NoHandler) => Err(self.no_handler()),
            Ok(ResponderEnvelope::Error { message }) => Err(Error::ContentRejected(message)),
            Err(err) => Err(Error::Transport(format!(
                "Unexpected result from the responder call: {err}"
            ))),
        }
    }

    fn no_handler(&self) -> Error {
        Error::NoHandlerRegistered {
            entry: format!(
                "{}.{}",
                self.bridge.bridge_object_name, self.bridge.native_to_web_entry_name
            ),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn bounded<F: std::future::Future>(&self, evaluation: F) -> Result<F::Output> {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, evaluation)
                .await
                .map_err(|_| Error::Transport(format!("Content call timed out after {limit:?}"))),
            None => Ok(evaluation.await),
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn bounded<F: std::future::Future>(&self, evaluation: F) -> Result<F::Output> {
        Ok(evaluation.await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use mockall::mock;
    use serde_json::json;

    mock! {
        Evaluator {}

        #[async_trait]
        impl ScriptEvaluator for Evaluator {
            async fn call_async_script(
                &self,
                body: &str,
                arguments: ScriptArguments,
                world: ContentWorld,
            ) -> BridgeResult<Value>;
        }
    }

    fn caller() -> OutboundCaller {
        OutboundCaller::new(&HostConfig::default())
    }

    fn evaluator_returning(result: Value) -> MockEvaluator {
        let mut evaluator = MockEvaluator::new();
        evaluator
            .expect_call_async_script()
            .times(1)
            .returning(move |_, _, _| Ok(result.clone()));
        evaluator
    }

    #[tokio::test]
    async fn test_payload_bound_under_data_in_page_world() {
        let caller = caller();
        let expected_body = caller.body().to_string();

        let mut evaluator = MockEvaluator::new();
        evaluator
            .expect_call_async_script()
            .withf(move |body, arguments, world| {
                body.to_string() == expected_body
                    && arguments.len() == 1
                    && arguments.get("data") == Some(&json!({"type": "actionA"}))
                    && matches!(world, ContentWorld::Page)
            })
            .returning(|_, _, _| Ok(json!({"status": "ok", "value": {"done": true}})));

        let response = caller.call(&evaluator, json!({"type": "actionA"})).await.unwrap();
        assert_eq!(response, Some(json!({"done": true})));
    }

    #[tokio::test]
    async fn test_absent_response() {
        let evaluator = evaluator_returning(json!({"status": "ok"}));
        assert_eq!(caller().call(&evaluator, json!(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unassigned_responder() {
        let evaluator = evaluator_returning(json!({"status": "noHandler"}));

        match caller().call(&evaluator, json!({"type": "actionA"})).await {
            Err(Error::NoHandlerRegistered { entry }) => {
                assert_eq!(entry, "WebNativeBridge.nativeToWeb");
            }
            other => panic!("expected NoHandlerRegistered, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_function_exception_maps_to_no_handler() {
        let mut evaluator = MockEvaluator::new();
        evaluator.expect_call_async_script().returning(|_, _, _| {
            Err(BridgeError::script_exception(
                "TypeError: window.WebNativeBridge.nativeToWeb is not a function",
            ))
        });

        assert!(matches!(
            caller().call(&evaluator, json!({})).await,
            Err(Error::NoHandlerRegistered { .. })
        ));
    }

    #[tokio::test]
    async fn test_unrelated_type_error_is_transport_error() {
        let mut evaluator = MockEvaluator::new();
        evaluator.expect_call_async_script().returning(|_, _, _| {
            Err(BridgeError::script_exception(
                "TypeError: undefined is not an object (evaluating 'state.items.length')",
            ))
        });

        assert!(matches!(
            caller().call(&evaluator, json!({})).await,
            Err(Error::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_responder_rejection() {
        let evaluator = evaluator_returning(json!({"status": "error", "message": "not ready"}));

        match caller().call(&evaluator, json!({})).await {
            Err(Error::ContentRejected(message)) => assert_eq!(message, "not ready"),
            other => panic!("expected ContentRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_context_loss_is_transport_error() {
        let mut evaluator = MockEvaluator::new();
        evaluator
            .expect_call_async_script()
            .returning(|_, _, _| Err(BridgeError::ContextUnavailable("navigated away".into())));

        assert!(matches!(
            caller().call(&evaluator, json!({})).await,
            Err(Error::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_transport_error() {
        let evaluator = evaluator_returning(json!(42));
        assert!(matches!(
            caller().call(&evaluator, json!({})).await,
            Err(Error::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_payload_not_evaluated() {
        let config = HostConfig::builder()
            .payload_limits(PayloadLimits::new(8, 4))
            .build()
            .unwrap();
        let caller = OutboundCaller::new(&config);

        let mut evaluator = MockEvaluator::new();
        evaluator.expect_call_async_script().never();

        assert!(matches!(
            caller.call(&evaluator, json!("far too long for the limit")).await,
            Err(Error::Payload(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_timeout() {
        struct Stalled;

        #[async_trait]
        impl ScriptEvaluator for Stalled {
            async fn call_async_script(
                &self,
                _body: &str,
                _arguments: ScriptArguments,
                _world: ContentWorld,
            ) -> BridgeResult<Value> {
                futures::future::pending().await
            }
        }

        let config = HostConfig::builder()
            .call_timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        match OutboundCaller::new(&config).call(&Stalled, json!({})).await {
            Err(Error::Transport(message)) => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
