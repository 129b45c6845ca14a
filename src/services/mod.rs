//! Business logic services

pub mod stats;

use std::sync::Arc;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            stats: stats::StatsService::new(Arc::new(repository.orders)),
        }
    }
}
