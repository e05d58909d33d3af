//! Inbound (content -> host) request routing.
//!
//! The router is the [`MessageSink`] registered with the content view. Each
//! message arrives with a [`Reply`]; the router runs the handler and consumes
//! the reply with exactly one [`ReplyOutcome`]. `Reply::resolve` takes the
//! reply by value, so a second resolution cannot be written, and a reply
//! dropped on any path still settles with an error.

use std::sync::Arc;

use async_trait::async_trait;
use bridge_traits::message::{InboundMessage, MessageSink, Reply, ReplyOutcome};
use core_runtime::config::PayloadLimits;
use core_runtime::events::{BridgeEvent, CallOutcome, EventBus};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::handler::RequestHandler;
use crate::payload;

pub struct RequestRouter {
    handler: Option<Arc<dyn RequestHandler>>,
    limits: PayloadLimits,
    events: EventBus,
}

impl RequestRouter {
    /// Without a handler every request is answered with "no content".
    pub fn new(
        handler: Option<Arc<dyn RequestHandler>>,
        limits: PayloadLimits,
        events: EventBus,
    ) -> Self {
        Self {
            handler,
            limits,
            events,
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Run one request through the limits and the handler.
    ///
    /// The request is passed to the handler unmodified.
    pub async fn route(&self, request: Value) -> Result<Option<Value>> {
        let stats = payload::inspect(&request, &self.limits)?;
        debug!(bytes = stats.bytes, depth = stats.depth, "Routing inbound request");

        let Some(handler) = &self.handler else {
            debug!("No request handler registered, replying with no content");
            return Ok(None);
        };

        let response = handler
            .handle(request)
            .await
            .map_err(|err| Error::Handler(format!("{err:#}")))?;

        if let Some(response) = &response {
            payload::inspect(response, &self.limits)?;
        }

        Ok(response)
    }

    /// Route `message` and settle `reply` with the result.
    pub async fn dispatch(&self, message: InboundMessage, reply: Reply) {
        if !message.is_main_frame {
            debug!("Inbound request from a subframe");
        }

        let outcome = match self.route(message.body).await {
            Ok(Some(value)) => ReplyOutcome::Value(value),
            Ok(None) => ReplyOutcome::NoContent,
            Err(Error::Handler(text)) => {
                warn!(error = %text, "Request handler failed");
                ReplyOutcome::Error(text)
            }
            Err(err) => {
                warn!(error = %err, "Inbound request rejected");
                ReplyOutcome::Error(err.to_string())
            }
        };

        self.events.emit(BridgeEvent::InboundHandled {
            outcome: call_outcome(&outcome),
        });

        reply.resolve(outcome);
    }
}

fn call_outcome(outcome: &ReplyOutcome) -> CallOutcome {
    match outcome {
        ReplyOutcome::Value(_) => CallOutcome::Value,
        ReplyOutcome::NoContent => CallOutcome::NoContent,
        ReplyOutcome::Error(_) => CallOutcome::Error,
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MessageSink for RequestRouter {
    async fn on_message(&self, message: InboundMessage, reply: Reply) {
        self.dispatch(message, reply).await;
    }
}
