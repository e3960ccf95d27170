//! Throttling anything that executes requests.
//!
//! A [`Transport`] takes a request and returns a response or an
//! error. Wrapping it in a [`ThrottledTransport`] makes every request
//! pass through a [`Throttler`] first; requests and responses are
//! handed through unchanged, and nothing is retried.
//!
//! # Example
//! ```
//! use window_throttle::transport::transport_fn;
//! use window_throttle::{Transport, TransportExt};
//!
//! let echo = transport_fn(|request: &str| -> Result<String, ()> { Ok(request.to_uppercase()) });
//! let throttled = echo.throttled(10);
//! assert_eq!(Ok("HELLO".to_string()), throttled.round_trip("hello"));
//! ```

use crate::clock::{self, Clock};
use crate::lib::*;
use crate::throttler::Throttler;

/// Something that executes requests of type `Req`.
pub trait Transport<Req> {
    /// The type of a successful response.
    type Response;

    /// The type of a failed request.
    type Error;

    /// Executes a single request.
    fn round_trip(&self, request: Req) -> Result<Self::Response, Self::Error>;
}

/// A transport that executes requests by calling a closure. Created
/// by [`transport_fn`].
#[derive(Debug, Clone, Copy)]
pub struct TransportFn<F> {
    f: F,
}

/// Returns a transport that executes each request by calling `f`.
pub fn transport_fn<F>(f: F) -> TransportFn<F> {
    TransportFn { f }
}

impl<Req, Resp, E, F> Transport<Req> for TransportFn<F>
where
    F: Fn(Req) -> Result<Resp, E>,
{
    type Response = Resp;
    type Error = E;

    fn round_trip(&self, request: Req) -> Result<Resp, E> {
        (self.f)(request)
    }
}

/// A transport that waits for admission from a throttler before
/// executing each request on the transport it wraps.
#[derive(Debug)]
pub struct ThrottledTransport<T, C: Clock = clock::DefaultClock> {
    transport: T,
    throttler: Arc<Throttler<C>>,
}

impl<T> ThrottledTransport<T, clock::DefaultClock> {
    /// Wraps `transport` in a new throttler admitting `limit`
    /// requests per second.
    pub fn new(transport: T, limit: u64) -> Self {
        Self::with_throttler(transport, Arc::new(Throttler::new(limit)))
    }
}

impl<T, C: Clock> ThrottledTransport<T, C> {
    /// Wraps `transport` so that its requests are admitted by
    /// `throttler`. The throttler can be shared with other transports
    /// or callers, in which case they all count against the same
    /// limit.
    pub fn with_throttler(transport: T, throttler: Arc<Throttler<C>>) -> Self {
        ThrottledTransport {
            transport,
            throttler,
        }
    }

    /// Returns the throttler admitting this transport's requests.
    pub fn throttler(&self) -> &Arc<Throttler<C>> {
        &self.throttler
    }

    /// Returns the wrapped transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T: Clone, C: Clock> Clone for ThrottledTransport<T, C> {
    fn clone(&self) -> Self {
        ThrottledTransport {
            transport: self.transport.clone(),
            throttler: self.throttler.clone(),
        }
    }
}

impl<Req, T, C> Transport<Req> for ThrottledTransport<T, C>
where
    T: Transport<Req>,
    C: Clock,
{
    type Response = T::Response;
    type Error = T::Error;

    fn round_trip(&self, request: Req) -> Result<T::Response, T::Error> {
        self.throttler.acquire();
        self.transport.round_trip(request)
    }
}

/// Convenience methods for wrapping transports in throttlers.
pub trait TransportExt: Sized {
    /// Wraps `self` in a new throttler admitting `limit` requests per
    /// second. See [`ThrottledTransport::new`].
    fn throttled(self, limit: u64) -> ThrottledTransport<Self> {
        ThrottledTransport::new(self, limit)
    }

    /// Wraps `self` so that its requests are admitted by `throttler`.
    /// See [`ThrottledTransport::with_throttler`].
    fn throttled_with<C: Clock>(self, throttler: Arc<Throttler<C>>) -> ThrottledTransport<Self, C> {
        ThrottledTransport::with_throttler(self, throttler)
    }
}

impl<T> TransportExt for T {}

#[cfg(feature = "reqwest")]
mod reqwest_blocking;
