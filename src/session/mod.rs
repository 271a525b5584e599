// Session state synchronization between the studio and the quotation assistant

pub mod events;
pub mod guard;
pub mod state;
pub mod synchronizer;

pub use events::{
    for_each_event, SyncBroadcaster, SyncEvent, EVENT_SESSION_RESET, EVENT_STATE_CHANGED,
};
pub use guard::{InFlightGuard, InFlightLatch};
pub use state::ChatState;
pub use synchronizer::{IgnoredReason, ResumeError, SendOutcome, SessionSynchronizer};
