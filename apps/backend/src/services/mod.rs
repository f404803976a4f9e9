pub mod room_actor;
pub mod room_store;

pub use room_actor::{Act, Intent, Join, Leave, RoomActor, RoomEvent, SnapshotFor, Summarize};
pub use room_store::{CreatedRoom, RoomStore};
