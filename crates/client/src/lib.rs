//! Client for the DAW's plain-text HTTP control endpoint.
//!
//! [`ControlChannel`] wraps a [`Backend`]: [`HttpBackend`] talks to a running
//! DAW, [`MockBackend`] answers from a JSON fixture.

mod backend;
mod channel;
mod error;
mod mock;

pub use backend::{AnyBackend, Backend, Credentials, HttpBackend};
pub use channel::{ControlChannel, JumpOutcome, SeekMode, SmoothSeekingStatus};
pub use error::ClientError;
pub use mock::{DEFAULT_MOCK_LATENCY, MockBackend, MockFixture, MockPlayState};
