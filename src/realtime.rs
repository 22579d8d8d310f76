// Canal em tempo real: registro de conexões + fan-out de eventos.

pub mod hub;
pub mod socket;

pub use hub::{Notifier, RealtimeEvent, RealtimeHub, Room};
