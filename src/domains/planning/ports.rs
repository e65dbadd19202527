use super::types::{PlanRequest, PlanReply};
use crate::common::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Port trait for the external route planning collaborator. The simulator
/// issues exactly one `plan` call per submit; adapters provide the Kafka
/// round trip or an in-process stub.
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    async fn plan(&self, request: PlanRequest) -> DomainResult<PlanReply>;
}

pub type DynRoutePlanner = Arc<dyn RoutePlanner>;
