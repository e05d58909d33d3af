//! Assembly of one bridge instance.
//!
//! [`WebNativeBridge`] owns the configuration, the request router and the
//! outbound caller for exactly one content view. [`attach`] installs the
//! transport shim and message handler into the view before the first
//! navigation and binds the [`BridgeHandle`]; [`teardown`] reverses that.
//! Dropping the bridge tears it down. A bridge that never attached does not
//! touch the handle, so a handle can be passed to a replacement bridge
//! before any of them attaches.
//!
//! [`attach`]: WebNativeBridge::attach
//! [`teardown`]: WebNativeBridge::teardown

use std::sync::Arc;

use bridge_traits::content::{ContentView, ContentWorld, UserScript};
use bridge_traits::message::MessageSink;
use core_runtime::config::HostConfig;
use core_runtime::events::{BridgeEvent, EventBus, Receiver};
use core_runtime::logging::strip_query;
use parking_lot::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::handle::BridgeHandle;
use crate::handler::RequestHandler;
use crate::outbound::OutboundCaller;
use crate::router::RequestRouter;
use crate::script;

pub struct WebNativeBridge {
    id: String,
    config: HostConfig,
    router: Arc<RequestRouter>,
    caller: Arc<OutboundCaller>,
    handle: BridgeHandle,
    events: EventBus,
    /// Set once this bridge has bound its handle to a view.
    attached: Mutex<Option<Arc<dyn ContentView>>>,
}

impl WebNativeBridge {
    /// Create a bridge around `handler`, binding `handle` once attached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`] if `config` fails validation.
    pub fn new(
        config: HostConfig,
        handler: Option<Arc<dyn RequestHandler>>,
        handle: BridgeHandle,
    ) -> Result<Self> {
        config.validate()?;

        let events = EventBus::new(config.event_buffer_size);
        let router = Arc::new(RequestRouter::new(
            handler,
            config.payload_limits,
            events.clone(),
        ));
        let caller = Arc::new(OutboundCaller::new(&config));

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            config,
            router,
            caller,
            handle,
            events,
            attached: Mutex::new(None),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn handle(&self) -> &BridgeHandle {
        &self.handle
    }

    /// The router registered as the content view's message handler.
    pub fn router(&self) -> Arc<RequestRouter> {
        Arc::clone(&self.router)
    }

    pub fn subscribe(&self) -> Receiver<BridgeEvent> {
        self.events.subscribe()
    }

    /// Transport shim installed into every top-level document.
    pub fn transport_script(&self) -> UserScript {
        let source = script::transport_shim(
            &self.config.bridge,
            &self.config.message_channel_namespace,
        );
        UserScript::document_start(source)
    }

    /// Install the bridge into `view`, bind the handle and load the start
    /// address.
    ///
    /// The handle is claimed before anything is installed. If any step
    /// fails, whatever was already installed is removed again and the handle
    /// returns to `Unbound`.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyBound`] / [`Error::Destroyed`] if the handle has
    ///   left the `Unbound` state or another attach holds it
    /// - [`Error::Transport`] if the view refuses the script or handler
    pub fn attach(&self, view: Arc<dyn ContentView>) -> Result<()> {
        let mut attached = self.attached.lock();
        self.handle.reserve()?;

        if let Err(err) = self.install(&view) {
            self.handle.release();
            warn!(bridge_id = %self.id, error = %err, "Attach failed, bridge uninstalled");
            return Err(err);
        }
        *attached = Some(Arc::clone(&view));
        drop(attached);

        let address = self.config.start_address();
        view.load(address);

        info!(
            bridge_id = %self.id,
            address = %strip_query(address),
            has_handler = self.router.has_handler(),
            "Bridge attached to content view"
        );
        self.events.emit(BridgeEvent::Attached {
            bridge_id: self.id.clone(),
            address: address.to_string(),
        });

        Ok(())
    }

    fn install(&self, view: &Arc<dyn ContentView>) -> Result<()> {
        let name = &self.config.bridge.bridge_object_name;
        let shim = self.transport_script();
        view.add_user_script(shim.clone())?;

        let sink: Arc<dyn MessageSink> = self.router();
        if let Err(err) = view.add_message_handler(name, ContentWorld::Page, sink) {
            view.remove_user_script(&shim);
            return Err(Error::from(err));
        }

        let bound = self
            .handle
            .bind(Arc::clone(view), Arc::clone(&self.caller), self.events.clone());
        if bound.is_err() {
            view.remove_message_handler(name, ContentWorld::Page);
            view.remove_user_script(&shim);
        }
        bound
    }

    /// Detach from the content view and destroy the handle.
    ///
    /// Every outbound call still in flight resolves to `Ok(None)`. Returns
    /// the number of calls abandoned. A bridge that never attached leaves the
    /// handle untouched, and calling again returns 0.
    pub fn teardown(&self) -> usize {
        let Some(view) = self.attached.lock().take() else {
            return 0;
        };
        view.remove_message_handler(&self.config.bridge.bridge_object_name, ContentWorld::Page);
        view.remove_user_script(&self.transport_script());

        let Some(abandoned_calls) = self.handle.destroy() else {
            return 0;
        };
        if abandoned_calls > 0 {
            warn!(bridge_id = %self.id, abandoned_calls, "Content view torn down with calls in flight");
        }
        self.events.emit(BridgeEvent::Destroyed { abandoned_calls });

        abandoned_calls
    }
}

impl Drop for WebNativeBridge {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for WebNativeBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebNativeBridge")
            .field("id", &self.id)
            .field("bridge", &self.config.bridge)
            .field("handle", &self.handle)
            .finish()
    }
}
