use std::sync::Arc;

use crate::middleware::JwtVerifier;
use crate::repository::{ImplementRepository, InstrumentRepository, MemberRepository};
use crate::services::ActivityService;

/// Shared handles every handler can reach through `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub activities: ActivityService,
    pub members: Arc<dyn MemberRepository>,
    pub instruments: Arc<dyn InstrumentRepository>,
    pub implements: Arc<dyn ImplementRepository>,
    pub jwt: Arc<JwtVerifier>,
}
