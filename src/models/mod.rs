pub mod activity;
pub mod instrument;
pub mod member;

pub use activity::{
    Activity, ActivityRequest, Participation, ParticipationChange, ParticipationRequest,
    ParticipationStatus,
};
pub use instrument::{AssignRequest, Implement, ImplementRequest, Instrument, InstrumentRequest};
pub use member::{Member, MemberPatch, MemberSummary, NewMember, Role};
