//! Policy-decision seam.
//!
//! Every metadata operation is gated by a [`PolicyClient`] decision keyed
//! by the fully-qualified operation name. The default [`AllowAll`] client
//! is used when no policy endpoint is configured, matching a deployment
//! with authorization disabled. A real deployment points an implementation
//! at its policy engine and returns its allow/deny verdict.

use async_trait::async_trait;

use crate::error::{ServerError, ServerResult};

/// Operation name checked for reads.
pub const OP_GET: &str = "metadatav1.GetRequest";
/// Operation name checked for create/update.
pub const OP_CREATE_OR_UPDATE: &str = "metadatav1.CreateOrUpdateRequest";
/// Operation name checked for value deletion.
pub const OP_DELETE: &str = "metadatav1.DeleteRequest";
/// Operation name checked for whole-project deletion.
pub const OP_DELETE_PROJECT: &str = "metadatav1.DeleteProjectRequest";

/// External policy decision point.
///
/// `check` returns the engine's verdict; transport or engine failures are
/// errors, not denials, so an unreachable engine is distinguishable from a
/// deny rule.
#[async_trait]
pub trait PolicyClient: Send + Sync {
    async fn check(&self, operation: &str, project_id: &str) -> ServerResult<bool>;
}

/// Permissive policy used when authorization is not configured.
pub struct AllowAll;

#[async_trait]
impl PolicyClient for AllowAll {
    async fn check(&self, _operation: &str, _project_id: &str) -> ServerResult<bool> {
        Ok(true)
    }
}

/// Gate an operation on the policy verdict.
///
/// Denial becomes the distinct [`ServerError::Forbidden`] condition; it
/// never originates in the store or façade.
pub async fn authorize(
    policy: &dyn PolicyClient,
    operation: &str,
    project_id: &str,
) -> ServerResult<()> {
    if policy.check(operation, project_id).await? {
        tracing::debug!(operation, project_id, "authorized");
        Ok(())
    } else {
        Err(ServerError::Forbidden {
            operation: operation.to_string(),
        })
    }
}
