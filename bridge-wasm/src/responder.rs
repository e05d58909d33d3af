//! Host -> content responder assignment.
//!
//! The host calls `window.<bridge>.<nativeToWeb>(data)` and treats an
//! unassigned entry as "no handler registered". [`ContentBridge::set_responder`]
//! assigns a Rust closure there; the returned [`ResponderGuard`] unassigns it
//! on drop, after which host calls see no handler again.

use std::future::Future;
use std::rc::Rc;

use js_sys::{Object, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::future_to_promise;

use crate::error::WasmResult;
use crate::transport::{from_js, to_js, ContentBridge};

type ResponderClosure = Closure<dyn FnMut(JsValue) -> Promise>;

impl ContentBridge {
    /// Assign `responder` as the content-side entry for host calls.
    ///
    /// Returning `Err(text)` rejects the host's call with `text`; returning
    /// `Ok(None)` resolves it with no content. Any previously assigned
    /// responder is replaced.
    pub fn set_responder<F, Fut>(&self, responder: F) -> WasmResult<ResponderGuard>
    where
        F: Fn(Value) -> Fut + 'static,
        Fut: Future<Output = Result<Option<Value>, String>> + 'static,
    {
        let responder = Rc::new(responder);
        let closure: ResponderClosure = Closure::wrap(Box::new(move |data: JsValue| -> Promise {
            future_to_promise(respond(Rc::clone(&responder), data))
        }) as Box<dyn FnMut(JsValue) -> Promise>);

        let entry = JsValue::from_str(&self.config().native_to_web_entry_name);
        Reflect::set(self.object(), &entry, closure.as_ref())?;

        tracing::debug!(
            entry = %self.config().native_to_web_entry_name,
            "Content responder assigned"
        );

        Ok(ResponderGuard {
            bridge: self.object().clone(),
            entry,
            closure,
        })
    }
}

async fn respond<F, Fut>(responder: Rc<F>, data: JsValue) -> Result<JsValue, JsValue>
where
    F: Fn(Value) -> Fut,
    Fut: Future<Output = Result<Option<Value>, String>>,
{
    let request = from_js(data)
        .map_err(|err| js_sys::Error::new(&err.to_string()))?
        .unwrap_or(Value::Null);

    match responder(request).await {
        Ok(Some(response)) => Ok(to_js(&response).map_err(|err| js_sys::Error::new(&err.to_string()))?),
        Ok(None) => Ok(JsValue::UNDEFINED),
        Err(message) => Err(js_sys::Error::new(&message).into()),
    }
}

/// Keeps a responder assigned. Dropping it deletes the entry if it still
/// holds this responder.
pub struct ResponderGuard {
    bridge: Object,
    entry: JsValue,
    closure: ResponderClosure,
}

impl ResponderGuard {
    /// Whether the bridge entry still holds this responder.
    pub fn is_assigned(&self) -> bool {
        Reflect::get(&self.bridge, &self.entry)
            .map(|current| Object::is(&current, self.closure.as_ref()))
            .unwrap_or(false)
    }
}

impl Drop for ResponderGuard {
    fn drop(&mut self) {
        if self.is_assigned() {
            let _ = Reflect::delete_property(&self.bridge, &self.entry);
        }
    }
}

impl std::fmt::Debug for ResponderGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponderGuard")
            .field("entry", &self.entry)
            .field("assigned", &self.is_assigned())
            .finish()
    }
}
