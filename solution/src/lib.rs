pub mod assignment;
pub mod json_serialisation;
pub mod stop_sequence;
pub mod trip;

pub use assignment::{AssignedTrip, Assignment};
pub use stop_sequence::{Stop, StopKind, StopSequence};
pub use trip::Trip;
