//! Script generation for both directions of the bridge.
//!
//! - [`transport_shim`] is installed into content at document start and
//!   exposes the content -> host entry.
//! - [`responder_call_body`] is evaluated by the host for every host ->
//!   content call. It never throws on its own: it always settles with a
//!   [`ResponderEnvelope`] so that "no responder assigned", "responder threw"
//!   and "responder returned" stay distinguishable after the value crosses
//!   the evaluation boundary.

use core_runtime::config::BridgeConfig;
use serde::Deserialize;
use serde_json::Value;

/// Name under which the outbound payload is bound for the evaluated body.
pub const DATA_ARGUMENT: &str = "data";

/// Content-side shim forwarding `window.<bridge>.<webToNative>(data)` to the
/// host's message channel under `namespace`.
pub fn transport_shim(config: &BridgeConfig, namespace: &str) -> String {
    let bridge = &config.bridge_object_name;
    let entry = &config.web_to_native_entry_name;

    format!(
        "window.{bridge} = {{\n  \
           {entry}: async function ({data}) {{\n    \
             return window.{namespace}.{bridge}.postMessage({data});\n  \
           }}\n\
         }};\n",
        data = DATA_ARGUMENT,
    )
}

/// Async function body invoking the content responder with the bound
/// [`DATA_ARGUMENT`].
pub fn responder_call_body(config: &BridgeConfig) -> String {
    let bridge = &config.bridge_object_name;
    let entry = &config.native_to_web_entry_name;

    format!(
        "const bridge = window.{bridge};\n\
         if (!bridge || typeof bridge.{entry} !== \"function\") {{\n  \
           return {{ status: \"noHandler\" }};\n\
         }}\n\
         try {{\n  \
           const value = await bridge.{entry}({data});\n  \
           return value === undefined ? {{ status: \"ok\" }} : {{ status: \"ok\", value: value }};\n\
         }} catch (error) {{\n  \
           const message = error instanceof Error ? error.message : String(error);\n  \
           return {{ status: \"error\", message: message }};\n\
         }}\n",
        data = DATA_ARGUMENT,
    )
}

/// What the responder call body settles with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ResponderEnvelope {
    /// The responder returned. `null` and `undefined` both mean absent.
    Ok {
        #[serde(default)]
        value: Option<Value>,
    },
    /// `window.<bridge>.<nativeToWeb>` is not a function.
    NoHandler,
    /// The responder threw or its promise rejected.
    Error { message: String },
}

impl ResponderEnvelope {
    pub fn decode(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Whether an evaluation failure reads like calling the unassigned
/// `<nativeToWeb>` entry of `config`.
///
/// Covers engines that evaluate the entry call directly instead of the
/// guarded body. The message must name the entry; a TypeError raised inside
/// an assigned responder is not a missing handler.
pub fn is_missing_function_error(message: &str, config: &BridgeConfig) -> bool {
    const MARKERS: &[&str] = &[
        "is not a function",
        "undefined is not an object",
        "Cannot read properties of undefined",
        "can't access property",
    ];

    message.contains(config.native_to_web_entry_name.as_str())
        && MARKERS.iter().any(|marker| message.contains(marker))
}
