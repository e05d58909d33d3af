//! Scripted stand-in for a platform content view.
//!
//! Simulates what the page would do with the bridge: the transport shim's
//! `postMessage` is [`FakeContentView::post_from_content`], and the content
//! responder is a Rust closure evaluated in place of the generated body.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::content::{
    ContentNavigator, ContentWorld, ScriptArguments, ScriptEvaluator, ScriptInjector, UserScript,
};
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::message::{InboundMessage, MessageSink, Reply, ReplyOutcome};
use serde_json::{json, Value};

pub type Responder = Arc<dyn Fn(Value) -> std::result::Result<Option<Value>, String> + Send + Sync>;

#[derive(Default)]
pub struct FakeContentView {
    pub scripts: Mutex<Vec<UserScript>>,
    handlers: Mutex<HashMap<String, Arc<dyn MessageSink>>>,
    responder: Mutex<Option<Responder>>,
    location: Mutex<Option<String>>,
    pub evaluations: AtomicUsize,
    stall_evaluations: AtomicBool,
    context_lost: AtomicBool,
    refuse_scripts: AtomicBool,
    pub last_world: Mutex<Option<ContentWorld>>,
}

impl FakeContentView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Assign `window.<bridge>.<nativeToWeb>`.
    pub fn set_responder<F>(&self, responder: F)
    where
        F: Fn(Value) -> std::result::Result<Option<Value>, String> + Send + Sync + 'static,
    {
        *self.responder.lock().unwrap() = Some(Arc::new(responder));
    }

    pub fn clear_responder(&self) {
        *self.responder.lock().unwrap() = None;
    }

    /// Evaluations never settle, as with a responder that never resolves.
    pub fn stall_evaluations(&self) {
        self.stall_evaluations.store(true, Ordering::SeqCst);
    }

    /// Evaluations fail as if the content process went away.
    pub fn lose_context(&self) {
        self.context_lost.store(true, Ordering::SeqCst);
    }

    /// `add_user_script` fails from now on.
    pub fn refuse_scripts(&self) {
        self.refuse_scripts.store(true, Ordering::SeqCst);
    }

    pub fn script_count(&self) -> usize {
        self.scripts.lock().unwrap().len()
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.lock().unwrap().contains_key(name)
    }

    /// Content calls `window.<bridge>.<webToNative>(body)` and awaits it.
    pub async fn post_from_content(&self, name: &str, body: Value) -> ReplyOutcome {
        self.post(name, InboundMessage::new(body)).await
    }

    pub async fn post(&self, name: &str, message: InboundMessage) -> ReplyOutcome {
        let sink = self
            .handlers
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("no message handler named {name}"));

        let (reply, settled) = Reply::channel();
        sink.on_message(message, reply).await;
        settled.await.expect("reply resolved")
    }
}

#[async_trait]
impl ScriptEvaluator for FakeContentView {
    async fn call_async_script(
        &self,
        body: &str,
        arguments: ScriptArguments,
        world: ContentWorld,
    ) -> Result<Value> {
        assert!(body.contains("typeof bridge."), "unexpected body: {body}");
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        *self.last_world.lock().unwrap() = Some(world);

        if self.stall_evaluations.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        if self.context_lost.load(Ordering::SeqCst) {
            return Err(BridgeError::ContextUnavailable("content process terminated".into()));
        }

        let data = arguments.get("data").cloned().unwrap_or(Value::Null);
        let responder = self.responder.lock().unwrap().clone();

        Ok(match responder {
            None => json!({"status": "noHandler"}),
            Some(responder) => match responder(data) {
                Ok(Some(value)) => json!({"status": "ok", "value": value}),
                Ok(None) => json!({"status": "ok"}),
                Err(message) => json!({"status": "error", "message": message}),
            },
        })
    }
}

impl ScriptInjector for FakeContentView {
    fn add_user_script(&self, script: UserScript) -> Result<()> {
        if self.refuse_scripts.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("user scripts are locked".into()));
        }
        self.scripts.lock().unwrap().push(script);
        Ok(())
    }

    fn remove_user_script(&self, script: &UserScript) {
        let mut scripts = self.scripts.lock().unwrap();
        if let Some(position) = scripts.iter().position(|installed| installed == script) {
            scripts.remove(position);
        }
    }

    fn add_message_handler(
        &self,
        name: &str,
        _world: ContentWorld,
        sink: Arc<dyn MessageSink>,
    ) -> Result<()> {
        let mut handlers = self.handlers.lock().unwrap();
        if handlers.contains_key(name) {
            return Err(BridgeError::OperationFailed(format!(
                "message handler {name} already registered"
            )));
        }
        handlers.insert(name.to_string(), sink);
        Ok(())
    }

    fn remove_message_handler(&self, name: &str, _world: ContentWorld) {
        self.handlers.lock().unwrap().remove(name);
    }
}

impl ContentNavigator for FakeContentView {
    fn load(&self, address: &str) {
        *self.location.lock().unwrap() = Some(address.to_string());
    }

    fn current_location(&self) -> Option<String> {
        self.location.lock().unwrap().clone()
    }
}
