//! Content -> host requests through the injected transport shim.
//!
//! The host installs `window.<bridge>.<webToNative>` before any content code
//! runs. [`ContentBridge`] looks that object up once and calls the entry with
//! plain JSON-compatible values, so the host receives the same structure the
//! Rust caller serialized.

use core_runtime::config::BridgeConfig;
use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::error::{js_message, WasmError, WasmResult};

/// Content-side view of the bridge object installed by the host.
#[derive(Debug, Clone)]
pub struct ContentBridge {
    config: BridgeConfig,
    bridge: Object,
}

impl ContentBridge {
    /// Locate `window.<bridge_object_name>`.
    ///
    /// # Errors
    ///
    /// - [`WasmError::NoWindow`] outside a browsing context
    /// - [`WasmError::NotInstalled`] if the host has not installed the shim
    pub fn connect(config: &BridgeConfig) -> WasmResult<Self> {
        let window = web_sys::window().ok_or(WasmError::NoWindow)?;
        let bridge = Reflect::get(&window, &JsValue::from_str(&config.bridge_object_name))?;

        if bridge.is_undefined() || bridge.is_null() {
            return Err(WasmError::NotInstalled(format!(
                "window.{} is not defined",
                config.bridge_object_name
            )));
        }
        let bridge = bridge.dyn_into::<Object>().map_err(|_| {
            WasmError::NotInstalled(format!("window.{} is not an object", config.bridge_object_name))
        })?;

        tracing::debug!(bridge = %config.bridge_object_name, "Connected to host bridge");

        Ok(Self {
            config: config.clone(),
            bridge,
        })
    }

    /// Names this bridge was connected with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub(crate) fn object(&self) -> &Object {
        &self.bridge
    }

    /// Send `request` to the host handler and await its reply.
    ///
    /// `Ok(None)` means the host replied with no content, which includes a
    /// host that declined the request.
    ///
    /// # Errors
    ///
    /// - [`WasmError::Rejected`] with the host's text when its handler failed
    /// - [`WasmError::NotInstalled`] if the entry is missing
    /// - [`WasmError::Conversion`] if either value cannot cross the boundary
    pub async fn send_to_native<T>(&self, request: &T) -> WasmResult<Option<Value>>
    where
        T: Serialize + ?Sized,
    {
        let entry = self.entry(&self.config.web_to_native_entry_name)?;
        let argument = to_js(request)?;

        let returned = entry.call1(&self.bridge, &argument)?;
        let promise = match returned.dyn_into::<Promise>() {
            Ok(promise) => promise,
            Err(value) => Promise::resolve(&value),
        };

        let settled = JsFuture::from(promise)
            .await
            .map_err(|err| WasmError::Rejected(js_message(&err)))?;

        from_js(settled)
    }

    fn entry(&self, name: &str) -> WasmResult<Function> {
        Reflect::get(&self.bridge, &JsValue::from_str(name))?
            .dyn_into::<Function>()
            .map_err(|_| {
                WasmError::NotInstalled(format!(
                    "window.{}.{} is not a function",
                    self.config.bridge_object_name, name
                ))
            })
    }
}

/// Serialize to plain objects and arrays, never `Map`s, so the value reads
/// the same as one produced by `JSON.parse`.
pub(crate) fn to_js<T>(value: &T) -> WasmResult<JsValue>
where
    T: Serialize + ?Sized,
{
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

/// `undefined` and `null` both mean no content.
pub(crate) fn from_js(value: JsValue) -> WasmResult<Option<Value>> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_wasm_bindgen::from_value(value)?))
}
