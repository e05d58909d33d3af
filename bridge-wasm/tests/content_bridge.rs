#![cfg(target_arch = "wasm32")]
//! Integration tests for the content side of the bridge
//!
//! Each test installs its own stand-in for the host's transport shim under a
//! unique bridge name so tests do not observe each other's globals.

use bridge_wasm::{ContentBridge, WasmError};
use core_runtime::config::BridgeConfig;
use js_sys::Promise;
use serde_json::{json, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn install(bridge: &str, entry_source: &str) -> BridgeConfig {
    js_sys::eval(&format!("window.{bridge} = {{ webToNative: {entry_source} }};")).unwrap();
    BridgeConfig::new(bridge, "webToNative", "nativeToWeb")
}

async fn call_from_host(bridge: &str, data: &str) -> Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue> {
    let promise: Promise = js_sys::eval(&format!("window.{bridge}.nativeToWeb({data})"))
        .unwrap()
        .dyn_into()
        .unwrap();
    JsFuture::from(promise).await
}

#[wasm_bindgen_test]
fn test_connect_without_shim() {
    let config = BridgeConfig::new("MissingBridge", "webToNative", "nativeToWeb");
    assert!(matches!(
        ContentBridge::connect(&config),
        Err(WasmError::NotInstalled(_))
    ));
}

#[wasm_bindgen_test]
async fn test_send_to_native_round_trip() {
    let config = install("EchoBridge", "async function (data) { return { echo: data }; }");
    let bridge = ContentBridge::connect(&config).unwrap();

    let reply = bridge.send_to_native(&json!({"type": "ping"})).await.unwrap();
    assert_eq!(reply, Some(json!({"echo": {"type": "ping"}})));
}

#[wasm_bindgen_test]
async fn test_no_content_reply() {
    let config = install("SilentBridge", "async function (data) { return undefined; }");
    let bridge = ContentBridge::connect(&config).unwrap();

    assert_eq!(bridge.send_to_native(&json!({})).await.unwrap(), None);
}

#[wasm_bindgen_test]
async fn test_host_rejection_carries_text() {
    let config = install(
        "FailingBridge",
        "async function (data) { throw new Error('boom'); }",
    );
    let bridge = ContentBridge::connect(&config).unwrap();

    match bridge.send_to_native(&json!({"type": "fail"})).await {
        Err(WasmError::Rejected(message)) => assert!(message.contains("boom")),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[wasm_bindgen_test]
async fn test_responder_answers_host() {
    let config = install("ResponderBridge", "async function (data) { return null; }");
    let bridge = ContentBridge::connect(&config).unwrap();

    let guard = bridge
        .set_responder(|data: Value| async move { Ok(Some(json!({ "received": data }))) })
        .unwrap();
    assert!(guard.is_assigned());

    let result = call_from_host("ResponderBridge", "{ type: 'actionA' }").await.unwrap();
    let result: Value = serde_wasm_bindgen::from_value(result).unwrap();
    assert_eq!(result, json!({"received": {"type": "actionA"}}));
}

#[wasm_bindgen_test]
async fn test_responder_error_rejects_host_call() {
    let config = install("RejectingBridge", "async function (data) { return null; }");
    let bridge = ContentBridge::connect(&config).unwrap();

    let _guard = bridge
        .set_responder(|_| async { Err::<Option<Value>, _>("not ready".to_string()) })
        .unwrap();

    let err = call_from_host("RejectingBridge", "{}").await.unwrap_err();
    let err: js_sys::Error = err.dyn_into().unwrap();
    assert_eq!(String::from(err.message()), "not ready");
}

#[wasm_bindgen_test]
fn test_dropping_guard_unassigns_responder() {
    let config = install("GuardedBridge", "async function (data) { return null; }");
    let bridge = ContentBridge::connect(&config).unwrap();

    let guard = bridge.set_responder(|_| async { Ok(None) }).unwrap();
    drop(guard);

    let assigned = js_sys::eval("typeof window.GuardedBridge.nativeToWeb").unwrap();
    assert_eq!(assigned.as_string().as_deref(), Some("undefined"));
}
