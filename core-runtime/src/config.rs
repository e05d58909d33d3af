//! # Bridge Configuration
//!
//! Configuration for one bridge instance.
//!
//! ## Overview
//!
//! - [`BridgeConfig`] - the global names shared by the host and the content
//!   side (`window.<bridge>.<webToNative>` / `<nativeToWeb>`)
//! - [`PayloadLimits`] - upper bounds on what may cross the boundary
//! - [`HostConfig`] - everything the host needs to attach a bridge to a
//!   content view, built through [`HostConfigBuilder`]
//!
//! All of it is immutable once a bridge is constructed. The builder validates
//! eagerly so a misconfigured bridge fails at startup rather than when the
//! first message arrives.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::{BridgeConfig, HostConfig};
//!
//! let config = HostConfig::builder()
//!     .initial_address("https://app.local/index.html")
//!     .bridge(BridgeConfig::new("AppBridge", "toHost", "toPage"))
//!     .build()
//!     .expect("valid configuration");
//!
//! assert_eq!(config.start_address(), "https://app.local/index.html");
//! ```
//!
//! ## Error Handling
//!
//! Names that would not be usable as script identifiers are rejected:
//!
//! ```
//! use core_runtime::config::BridgeConfig;
//!
//! let config = BridgeConfig::new("my-bridge", "webToNative", "nativeToWeb");
//! assert!(config.validate().is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default global object name installed into the content context.
pub const DEFAULT_BRIDGE_OBJECT_NAME: &str = "WebNativeBridge";

/// Default entry the content side calls to reach the host.
pub const DEFAULT_WEB_TO_NATIVE_ENTRY: &str = "webToNative";

/// Default entry the content side assigns to answer host calls.
pub const DEFAULT_NATIVE_TO_WEB_ENTRY: &str = "nativeToWeb";

/// Default namespace under which the host exposes message handlers.
pub const DEFAULT_MESSAGE_CHANNEL_NAMESPACE: &str = "webkit.messageHandlers";

/// Address loaded when no initial address is configured.
pub const BLANK_ADDRESS: &str = "about:blank";

/// Default maximum serialized payload size (1 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Default maximum nesting depth of arrays/objects in a payload.
pub const DEFAULT_MAX_PAYLOAD_DEPTH: usize = 64;

/// Default buffer size for the lifecycle event bus.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

/// Words that parse as identifiers but cannot be used as bare global names.
const RESERVED_WORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Check that `value` is an ASCII script identifier usable as a global name.
pub fn validate_identifier(field: &'static str, value: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidIdentifier {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("must not be empty"));
    };

    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return Err(invalid("must start with a letter, `_` or `$`"));
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Err(invalid("may only contain letters, digits, `_` and `$`"));
    }

    if RESERVED_WORDS.contains(&value) {
        return Err(invalid("is a reserved word"));
    }

    Ok(())
}

/// Names of the bridge globals.
///
/// The content side sees:
///
/// ```text
/// window.<bridge_object_name>.<web_to_native_entry_name>(data)   // content -> host
/// window.<bridge_object_name>.<native_to_web_entry_name> = fn    // host -> content
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    pub bridge_object_name: String,
    pub web_to_native_entry_name: String,
    pub native_to_web_entry_name: String,
}

impl BridgeConfig {
    pub fn new(
        bridge_object_name: impl Into<String>,
        web_to_native_entry_name: impl Into<String>,
        native_to_web_entry_name: impl Into<String>,
    ) -> Self {
        Self {
            bridge_object_name: bridge_object_name.into(),
            web_to_native_entry_name: web_to_native_entry_name.into(),
            native_to_web_entry_name: native_to_web_entry_name.into(),
        }
    }

    /// Validates the names.
    ///
    /// This checks:
    /// - every name is a valid, non-reserved identifier
    /// - the two entry names differ (they live on the same object)
    pub fn validate(&self) -> Result<()> {
        validate_identifier("bridge_object_name", &self.bridge_object_name)?;
        validate_identifier("web_to_native_entry_name", &self.web_to_native_entry_name)?;
        validate_identifier("native_to_web_entry_name", &self.native_to_web_entry_name)?;

        if self.web_to_native_entry_name == self.native_to_web_entry_name {
            return Err(Error::Config(format!(
                "Entry names must differ: both are `{}`",
                self.web_to_native_entry_name
            )));
        }

        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_BRIDGE_OBJECT_NAME,
            DEFAULT_WEB_TO_NATIVE_ENTRY,
            DEFAULT_NATIVE_TO_WEB_ENTRY,
        )
    }
}

/// Upper bounds on payloads crossing the boundary in either direction.
///
/// Applied to inbound requests, handler replies, and outbound calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadLimits {
    /// Maximum serialized JSON length in bytes
    pub max_bytes: usize,
    /// Maximum nesting depth of arrays and objects (a scalar has depth 0)
    pub max_depth: usize,
}

impl PayloadLimits {
    pub fn new(max_bytes: usize, max_depth: usize) -> Self {
        Self {
            max_bytes,
            max_depth,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(Error::Config(
                "Payload byte limit must be greater than 0".to_string(),
            ));
        }

        if self.max_depth == 0 {
            return Err(Error::Config(
                "Payload depth limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_BYTES, DEFAULT_MAX_PAYLOAD_DEPTH)
    }
}

/// Host-side configuration for one bridge instance.
///
/// Use [`HostConfig::builder`] to construct instances.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Address loaded once the bridge is attached (`None` loads a blank page)
    pub initial_address: Option<String>,

    /// Global names shared with the content side
    pub bridge: BridgeConfig,

    /// Dotted path under which the platform exposes message handlers to
    /// content, e.g. `webkit.messageHandlers`
    pub message_channel_namespace: String,

    pub payload_limits: PayloadLimits,

    /// Upper bound on a single host -> content call. `None` waits until the
    /// content side settles or the view is destroyed.
    pub call_timeout: Option<Duration>,

    /// Buffer size of the lifecycle event bus
    pub event_buffer_size: usize,
}

impl HostConfig {
    pub fn builder() -> HostConfigBuilder {
        HostConfigBuilder::default()
    }

    /// Address to load on attach.
    pub fn start_address(&self) -> &str {
        self.initial_address.as_deref().unwrap_or(BLANK_ADDRESS)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - bridge names are valid identifiers
    /// - the message channel namespace is a dotted identifier path
    /// - payload limits and event buffer size are non-zero
    /// - the call timeout, when set, is non-zero
    pub fn validate(&self) -> Result<()> {
        self.bridge.validate()?;
        self.payload_limits.validate()?;

        if self.message_channel_namespace.is_empty() {
            return Err(Error::Config(
                "Message channel namespace cannot be empty".to_string(),
            ));
        }
        for segment in self.message_channel_namespace.split('.') {
            validate_identifier("message_channel_namespace", segment)?;
        }

        if let Some(address) = &self.initial_address {
            if address.trim().is_empty() {
                return Err(Error::Config(
                    "Initial address cannot be blank; leave it unset to load about:blank"
                        .to_string(),
                ));
            }
        }

        if self.call_timeout == Some(Duration::ZERO) {
            return Err(Error::Config(
                "Call timeout must be greater than zero; leave it unset to wait indefinitely"
                    .to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            initial_address: None,
            bridge: BridgeConfig::default(),
            message_channel_namespace: DEFAULT_MESSAGE_CHANNEL_NAMESPACE.to_string(),
            payload_limits: PayloadLimits::default(),
            call_timeout: None,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

/// Builder for constructing [`HostConfig`] instances.
///
/// Every setting has a default; [`build()`](HostConfigBuilder::build)
/// validates the result.
#[derive(Debug, Default)]
pub struct HostConfigBuilder {
    initial_address: Option<String>,
    bridge: Option<BridgeConfig>,
    message_channel_namespace: Option<String>,
    payload_limits: Option<PayloadLimits>,
    call_timeout: Option<Duration>,
    event_buffer_size: Option<usize>,
}

impl HostConfigBuilder {
    /// Sets the address loaded on attach.
    pub fn initial_address(mut self, address: impl Into<String>) -> Self {
        self.initial_address = Some(address.into());
        self
    }

    pub fn bridge(mut self, bridge: BridgeConfig) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Sets the dotted namespace the platform exposes message handlers under.
    ///
    /// Apple WebKit uses `webkit.messageHandlers`; other hosts inject their
    /// own object (for example `chrome.webview`).
    pub fn message_channel_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.message_channel_namespace = Some(namespace.into());
        self
    }

    pub fn payload_limits(mut self, limits: PayloadLimits) -> Self {
        self.payload_limits = Some(limits);
        self
    }

    /// Bounds every host -> content call.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final [`HostConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] or [`Error::InvalidIdentifier`] when the
    /// result fails [`HostConfig::validate`].
    pub fn build(self) -> Result<HostConfig> {
        let defaults = HostConfig::default();

        let config = HostConfig {
            initial_address: self.initial_address,
            bridge: self.bridge.unwrap_or(defaults.bridge),
            message_channel_namespace: self
                .message_channel_namespace
                .unwrap_or(defaults.message_channel_namespace),
            payload_limits: self.payload_limits.unwrap_or(defaults.payload_limits),
            call_timeout: self.call_timeout,
            event_buffer_size: self.event_buffer_size.unwrap_or(defaults.event_buffer_size),
        };

        config.validate()?;
        Ok(config)
    }
}
