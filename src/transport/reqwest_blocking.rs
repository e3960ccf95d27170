//! Throttling for `reqwest`'s blocking client.
//!
//! ```no_run
//! use window_throttle::{Transport, TransportExt};
//!
//! # fn main() -> Result<(), reqwest::Error> {
//! let client = reqwest::blocking::Client::new();
//! let throttled = client.clone().throttled(2);
//! for _ in 0..3 {
//!     let request = client.get("http://localhost:8080/").build()?;
//!     throttled.round_trip(request)?;
//! }
//! # Ok(())
//! # }
//! ```

use super::Transport;
use reqwest::blocking::{Client, Request, Response};

impl Transport<Request> for Client {
    type Response = Response;
    type Error = reqwest::Error;

    fn round_trip(&self, request: Request) -> Result<Response, reqwest::Error> {
        self.execute(request)
    }
}
