//! Shared application state for all routes.

use crate::store::MilestoneRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub milestones: Arc<dyn MilestoneRepository>,
}

impl AppState {
    pub fn new(milestones: Arc<dyn MilestoneRepository>) -> Self {
        Self { milestones }
    }
}
