//! cache — persisted forecast artifacts with staleness-based rebuilds.

pub mod clock;
pub mod codec;
pub mod keys;
pub mod manager;
pub mod store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::keys::{ArtifactKey, ArtifactKind, TIMESTAMP_FORMAT};
pub use self::manager::{ArtifactState, ForecastCache, RebuildReport};
pub use self::store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};
