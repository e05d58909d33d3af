//! Content View Capabilities
//!
//! The hosting UI surface (a WKWebView, WebView2, WebKitGTK view, an Android
//! `WebView`, ...) is an external collaborator. The protocol only needs three
//! things from it: evaluating a script with a reply, installing scripts and
//! message handlers before content loads, and basic navigation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::Result, message::MessageSink, platform::PlatformSendSync};

/// Named arguments bound into an evaluated function body.
pub type ScriptArguments = Map<String, Value>;

/// Execution world a script runs in.
///
/// Content-authored scripts and the bridge must share a world for the
/// injected globals to be visible to the page; privileged worlds are kept
/// separate so unrelated injected scripts cannot spoof the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentWorld {
    /// The page's own world, shared with content scripts.
    Page,
    /// The platform's default client world, isolated from page globals.
    Client,
}

/// When an injected user script runs relative to the document lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InjectionTime {
    /// Before any content script, right after the document element exists.
    DocumentStart,
    /// After the document finished parsing.
    DocumentEnd,
}

/// A script installed into every document the view loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserScript {
    pub source: String,
    pub injection_time: InjectionTime,
    /// Restrict injection to the top-level frame.
    pub main_frame_only: bool,
    pub world: ContentWorld,
}

impl UserScript {
    /// Script injected at document start into the page world of the main
    /// frame only.
    pub fn document_start(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            injection_time: InjectionTime::DocumentStart,
            main_frame_only: true,
            world: ContentWorld::Page,
        }
    }
}

/// Evaluate-with-reply primitive.
///
/// `body` is the body of an async function whose parameters are the keys of
/// `arguments`. The call resolves with the function's resolved value
/// (`undefined` surfaces as [`Value::Null`]) or fails with
/// [`BridgeError::ScriptException`](crate::error::BridgeError::ScriptException)
/// when the function rejects.
///
/// # Platform Notes
///
/// - **Apple**: `WKWebView.callAsyncJavaScript(_:arguments:in:in:)`
/// - **Windows**: `ExecuteScriptAsync` around a wrapper that awaits the body
/// - **Android**: `evaluateJavascript` plus a reply channel
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ScriptEvaluator: PlatformSendSync {
    async fn call_async_script(
        &self,
        body: &str,
        arguments: ScriptArguments,
        world: ContentWorld,
    ) -> Result<Value>;
}

/// Script and message-handler installation.
///
/// Must be called before the first navigation so that installed scripts see
/// every document.
pub trait ScriptInjector: PlatformSendSync {
    fn add_user_script(&self, script: UserScript) -> Result<()>;

    /// Uninstall one script equal to `script`. Other installed scripts stay.
    fn remove_user_script(&self, script: &UserScript);

    /// Register `sink` as the reply-capable message handler exposed to
    /// content as `<namespace>.<name>.postMessage(..)`.
    fn add_message_handler(
        &self,
        name: &str,
        world: ContentWorld,
        sink: Arc<dyn MessageSink>,
    ) -> Result<()>;

    fn remove_message_handler(&self, name: &str, world: ContentWorld);
}

/// Navigation surface. Not part of the bridging protocol.
pub trait ContentNavigator: PlatformSendSync {
    /// Start loading `address`. Fire and forget.
    fn load(&self, address: &str);

    /// Address of the currently loaded document, if any.
    fn current_location(&self) -> Option<String>;
}

/// Everything the bridge needs from a live content view.
pub trait ContentView: ScriptEvaluator + ScriptInjector + ContentNavigator {}

impl<T> ContentView for T where T: ScriptEvaluator + ScriptInjector + ContentNavigator {}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use serde_json::json;

    mock! {
        View {}

        #[async_trait]
        impl ScriptEvaluator for View {
            async fn call_async_script(
                &self,
                body: &str,
                arguments: ScriptArguments,
                world: ContentWorld,
            ) -> Result<Value>;
        }

        impl ScriptInjector for View {
            fn add_user_script(&self, script: UserScript) -> Result<()>;
            fn remove_user_script(&self, script: &UserScript);
            fn add_message_handler(
                &self,
                name: &str,
                world: ContentWorld,
                sink: Arc<dyn MessageSink>,
            ) -> Result<()>;
            fn remove_message_handler(&self, name: &str, world: ContentWorld);
        }

        impl ContentNavigator for View {
            fn load(&self, address: &str);
            fn current_location(&self) -> Option<String>;
        }
    }

    #[tokio::test]
    async fn test_any_full_implementation_is_a_content_view() {
        let mut view = MockView::new();
        view.expect_call_async_script()
            .returning(|_, arguments, _| Ok(json!({ "args": arguments.len() })));
        view.expect_current_location()
            .returning(|| Some("about:blank".to_string()));

        let view: Arc<dyn ContentView> = Arc::new(view);
        let mut arguments = ScriptArguments::new();
        arguments.insert("data".into(), json!(1));

        let result = view
            .call_async_script("return data;", arguments, ContentWorld::Page)
            .await
            .unwrap();
        assert_eq!(result, json!({"args": 1}));
        assert_eq!(view.current_location().as_deref(), Some("about:blank"));
    }

    #[test]
    fn test_document_start_script_defaults() {
        let script = UserScript::document_start("window.x = 1;");

        assert_eq!(script.injection_time, InjectionTime::DocumentStart);
        assert!(script.main_frame_only);
        assert_eq!(script.world, ContentWorld::Page);
    }

    #[test]
    fn test_world_serializes_camel_case() {
        let json = serde_json::to_string(&ContentWorld::Page).unwrap();
        assert_eq!(json, "\"page\"");
    }
}
