pub mod presence;
pub mod routes;

pub use presence::{PresenceMap, PresencePayload, PresenceRecord, RosterPayload, UserRecord};
