mod document;
mod rest_type;

pub use document::DocumentClient;
pub use rest_type::{AvailabilityType, BandType, InstrumentType, MemberType, RosterRefType};
