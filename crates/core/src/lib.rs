pub mod config;
pub mod connection;
pub mod mixer;
pub mod navigation;
pub mod poller;
pub mod session;
pub mod snapshot;
pub mod throttle;

pub use config::{Config, ConfigError, EndpointConfig, NavigationConfig};
pub use connection::connect;
pub use mixer::{reconcile_echo, snap_pan, snap_volume};
pub use navigation::{Navigation, PendingJump, SectionState};
pub use poller::{DEFAULT_POLL_INTERVAL, PollCallbacks, Poller};
pub use session::{BAR_COUNT_OPTIONS, JumpPlan, Session, Song, group_sections};
pub use snapshot::{FaderView, Highlight, SectionView, SessionSnapshot, SongView, session_to_snapshot};
pub use throttle::{Decision, THROTTLE_INTERVAL, Throttle, ThrottledSender};

pub use remote_client::{AnyBackend, ClientError, ControlChannel, JumpOutcome, SmoothSeekingStatus};
pub use remote_protocol::{JumpMode, MarkerId, RegionId, TrackId};
