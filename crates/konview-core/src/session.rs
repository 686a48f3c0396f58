//! # Session
//!
//! The inspection context of one stop, and the top-level dispatch the host's
//! display pipeline calls into.
//!
//! A [`Session`] owns every piece of mutable engine state: the four caches,
//! the revisit tracker and the configuration. Nothing is process-global, so
//! dropping the session (or calling [`Session::resume`]) is all it takes to
//! forget a stop.
//!
//! ## Dispatch
//!
//! ```text
//! render / provide(value)
//!   ├─ raw address 0          → null marker / Provider::Null
//!   ├─ classify → unresolved  → host text / Provider::Uninitialized
//!   └─ classify → typed       → resolve_shape → String | Array | Object
//! ```

use tracing::{debug, debug_span, trace, warn};

use crate::cache::{RevisitTracker, SessionCache};
use crate::classify::{Classification, TypeDescriptor};
use crate::config::EngineConfig;
use crate::error::{KonviewError, KonviewResult};
use crate::eval;
use crate::host::Host;
use crate::provider::{ArrayProvider, ObjectProvider, Provider, StringProvider, SyntheticValue};
use crate::shape::Shape;
use crate::types::{Address, HostValue, NULL_MARKER};

/// Engine state for one stopped-process inspection episode.
///
/// ## Thread Safety
///
/// A session is driven from one thread. The host already serializes its
/// rendering calls; concurrent callers need their own session or a lock
/// around this one.
pub struct Session<'h, H: Host + ?Sized>
{
    pub(crate) host: &'h H,
    pub(crate) cache: SessionCache,
    pub(crate) revisits: RevisitTracker,
    pub(crate) config: EngineConfig,
}

impl<'h, H: Host + ?Sized> Session<'h, H>
{
    /// Create a session over `host` with default configuration.
    pub fn new(host: &'h H) -> Self
    {
        Self::with_config(host, EngineConfig::default())
    }

    /// Create a session over `host` with explicit configuration.
    pub fn with_config(host: &'h H, config: EngineConfig) -> Self
    {
        Self {
            host,
            cache: SessionCache::new(),
            revisits: RevisitTracker::new(config.revisit_capacity),
            config,
        }
    }

    /// The host this session talks to.
    pub fn host(&self) -> &'h H
    {
        self.host
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig
    {
        &self.config
    }

    /// Read access to the caches.
    pub fn cache(&self) -> &SessionCache
    {
        &self.cache
    }

    /// Write access to the caches, for host-driven invalidation.
    pub fn cache_mut(&mut self) -> &mut SessionCache
    {
        &mut self.cache
    }

    /// The host resumed the process: every cached binding may now be stale.
    ///
    /// Purges all caches and the revisit tracker unless the session was
    /// configured with [`EngineConfig::keep_caches_on_resume`].
    pub fn resume(&mut self)
    {
        if self.config.purge_on_resume {
            debug!("process resumed, purging session caches");
            self.cache.reset();
            self.revisits.reset();
        } else {
            debug!("process resumed, keeping session caches");
        }
    }

    /// Build the synthetic value provider for `value`.
    ///
    /// Null references yield [`Provider::Null`], references without a
    /// discoverable type descriptor yield [`Provider::Uninitialized`].
    ///
    /// ## Errors
    ///
    /// Any remote failure or malformed shape answer while resolving a typed
    /// reference.
    pub fn provide(&mut self, value: &HostValue) -> KonviewResult<Provider>
    {
        let _span = debug_span!("provide", address = %value.address(), name = %value.name).entered();
        if value.address().is_null() {
            return Ok(Provider::Null);
        }
        match self.classify_value(value) {
            Classification::Typed(descriptor) => self.select_provider(value, descriptor),
            Classification::Null => Ok(Provider::Null),
            Classification::Unresolved => Ok(Provider::Uninitialized),
        }
    }

    /// Short rendering of `value`, used for collapsed display.
    ///
    /// Values that are not managed references render as the host's own text
    /// (or the null marker), and unresolved references fall back to the
    /// host's text rather than a fabricated shape.
    ///
    /// ## Errors
    ///
    /// Any remote failure or malformed shape answer.
    pub fn render(&mut self, value: &HostValue) -> KonviewResult<String>
    {
        let _span = debug_span!("render", address = %value.address(), name = %value.name).entered();
        match self.typed_provider(value)? {
            Rendered::Done(text) => Ok(text),
            Rendered::Provider(mut provider) => provider.short_summary(self),
        }
    }

    /// Full rendering of `value`: children rendered recursively, bracketed.
    ///
    /// ## Errors
    ///
    /// Any remote failure or malformed shape answer.
    pub fn render_full(&mut self, value: &HostValue) -> KonviewResult<String>
    {
        let _span = debug_span!("render_full", address = %value.address(), name = %value.name).entered();
        match self.typed_provider(value)? {
            Rendered::Done(text) => Ok(text),
            Rendered::Provider(mut provider) => provider.full_summary(self),
        }
    }

    fn typed_provider(&mut self, value: &HostValue) -> KonviewResult<Rendered>
    {
        if !value.is_managed() {
            return Ok(Rendered::Done(
                value.text.clone().unwrap_or_else(|| NULL_MARKER.to_string()),
            ));
        }
        if value.address().is_null() {
            return Ok(Rendered::Done(NULL_MARKER.to_string()));
        }
        match self.classify_value(value) {
            Classification::Typed(descriptor) => Ok(Rendered::Provider(self.select_provider(value, descriptor)?)),
            Classification::Null => Ok(Rendered::Done(NULL_MARKER.to_string())),
            Classification::Unresolved => {
                debug!("type unresolved, using host text");
                Ok(Rendered::Done(value.fallback_text()))
            }
        }
    }

    /// Resolve the shape of a typed reference with one composite query.
    ///
    /// ## Errors
    ///
    /// - `RemoteEvaluation` / `MemoryRead`: the query or its answer failed
    /// - `MalformedShape` / `UnknownPrimitiveKind`: the answer did not parse
    pub fn resolve_shape(&mut self, address: Address, descriptor: TypeDescriptor) -> KonviewResult<Shape>
    {
        let symbol = self.config.string_class_symbol.clone();
        let string_class = self.symbol_address(&symbol);
        let expression = eval::complete_type_init_flow(address, string_class);
        let response = self.read_composite(&expression)?;
        match Shape::parse(&response) {
            Ok(shape) => {
                debug!(%address, %descriptor, ?shape, "resolved shape");
                Ok(shape)
            }
            Err(err) => {
                warn!(%address, %descriptor, %response, "malformed shape response");
                Err(err)
            }
        }
    }

    fn select_provider(&mut self, value: &HostValue, descriptor: TypeDescriptor) -> KonviewResult<Provider>
    {
        let provider = match self.resolve_shape(value.address(), descriptor)? {
            Shape::String { buffer, length } => {
                Provider::String(StringProvider::new(self, value.clone(), buffer, length)?)
            }
            Shape::Array { count } => Provider::Array(ArrayProvider::new(self, value.clone(), descriptor, count)?),
            Shape::Object(layout) => Provider::Object(ObjectProvider::new(value.clone(), descriptor, layout)),
        };
        debug!(kind = provider.kind_name(), "selected provider");
        Ok(provider)
    }

    /// Evaluate a query answered by a C string, caching the string's address.
    ///
    /// The address is cached under the exact expression text; the string
    /// itself is re-read each time.
    ///
    /// ## Errors
    ///
    /// - `RemoteEvaluation`: evaluation failed or returned a null pointer
    /// - `MemoryRead`: the answer could not be read
    pub fn read_composite(&mut self, expression: &str) -> KonviewResult<String>
    {
        let address = match self.cache.read_string(expression) {
            Some(address) => address,
            None => {
                let result = eval::evaluate(self.host, expression)?;
                let address = Address::new(result.unsigned);
                if address.is_null() {
                    return Err(KonviewError::RemoteEvaluation {
                        expression: expression.to_string(),
                        reason: "returned a null string".to_string(),
                    });
                }
                self.cache.put_read_string(expression, address);
                address
            }
        };
        let text = self.host.read_cstring(address, self.config.cstring_read_limit)?;
        trace!(expression, %address, %text, "read composite answer");
        Ok(text)
    }

    /// Load address of `symbol`, or zero when the module has no such symbol.
    ///
    /// Found addresses are cached for the rest of the stop.
    pub fn symbol_address(&mut self, symbol: &str) -> Address
    {
        if let Some(address) = self.cache.loaded_address(symbol) {
            return address;
        }
        match self.host.symbol_address(symbol) {
            Some(address) => {
                self.cache.put_loaded_address(symbol, address);
                address
            }
            None => {
                debug!(symbol, "symbol not found, passing null");
                Address::ZERO
            }
        }
    }

    /// Whether the object at `address` is an instance of `descriptor`.
    ///
    /// ## Errors
    ///
    /// - `RemoteEvaluation`: the check could not be evaluated
    pub fn is_instance_of(&mut self, address: Address, descriptor: TypeDescriptor) -> KonviewResult<bool>
    {
        let result = eval::evaluate(self.host, &eval::is_instance(address, descriptor.address()))?;
        Ok(result.text.as_deref() == Some("true"))
    }

    /// Runtime type name of the object at `address`, without quotes.
    ///
    /// ## Errors
    ///
    /// - `RemoteEvaluation` / `MemoryRead`: the name could not be fetched
    pub fn runtime_type_name(&mut self, address: Address) -> KonviewResult<String>
    {
        let result = eval::evaluate(self.host, &eval::type_name(address))?;
        let name = self.host.read_cstring(Address::new(result.unsigned), self.config.cstring_read_limit)?;
        Ok(name.trim_matches('"').to_string())
    }
}

enum Rendered
{
    Done(String),
    Provider(Provider),
}
