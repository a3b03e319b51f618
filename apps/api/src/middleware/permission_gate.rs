use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{RawPathParams, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use blablabook_application::{AccessTarget, AuthorizationAuditRecord};
use blablabook_core::{AppError, UserIdentity};
use blablabook_domain::{AuthorizationOutcome, PermissionLabel};
use chrono::Utc;
use tower_sessions::Session;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;

use super::request_context::RequestContext;
use super::session_identity;

const RESOURCE_ID_PARAM: &str = "id";

/// Per-route-group permission requirement, installed with
/// `axum::middleware::from_fn_with_state(gate, permission_gate)`.
#[derive(Clone)]
pub struct PermissionGate {
    state: AppState,
    required: PermissionLabel,
    resource: Option<&'static str>,
}

impl PermissionGate {
    pub fn new(state: AppState, required: PermissionLabel, resource: Option<&'static str>) -> Self {
        Self {
            state,
            required,
            resource,
        }
    }

    fn audit(
        &self,
        identity: Option<&UserIdentity>,
        target: &AccessTarget,
        context: &RequestContext,
        outcome: AuthorizationOutcome,
    ) {
        let record = AuthorizationAuditRecord {
            user_id: identity.map(UserIdentity::id),
            user_email: identity.map(|identity| identity.email().to_owned()),
            permission: self.required.clone(),
            resource: target.resource.clone(),
            resource_id: target.resource_id.clone(),
            outcome,
            ip_address: context.ip_address.clone(),
            user_agent: context.user_agent.clone(),
            occurred_at: Utc::now(),
        };

        let audit_service = self.state.authorization_audit_service.clone();
        tokio::spawn(async move {
            if let Err(error) = audit_service.record_decision(record).await {
                warn!(%error, "failed to persist authorization decision");
            }
        });
    }
}

/// Admits the request only when the session user holds the gate's permission
/// (or `ADMIN`). Every decision is audited exactly once.
pub async fn permission_gate(
    State(gate): State<PermissionGate>,
    session: Session,
    path_params: Result<RawPathParams, RawPathParamsRejection>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let context = RequestContext::from_request(&request, &gate.state.trusted_proxies);
    let target = AccessTarget {
        resource: gate.resource.map(str::to_owned),
        resource_id: path_params.ok().as_ref().and_then(resource_id_from),
    };

    let identity = match session_identity(&session).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            gate.audit(None, &target, &context, AuthorizationOutcome::Unauthenticated);
            return Err(AppError::Unauthorized("authentication required".to_owned()).into());
        }
        Err(error) => {
            gate.audit(None, &target, &context, AuthorizationOutcome::ResolutionFailed);
            return Err(error);
        }
    };

    let decision = gate
        .state
        .authorization_service
        .require_permission(identity.id(), &gate.required, &target)
        .await;

    match decision {
        Ok(()) => {
            gate.audit(
                Some(&identity),
                &target,
                &context,
                AuthorizationOutcome::Granted,
            );
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        Err(error @ AppError::PermissionDenied { .. }) => {
            gate.audit(
                Some(&identity),
                &target,
                &context,
                AuthorizationOutcome::Denied,
            );
            Err(error.into())
        }
        Err(error) => {
            gate.audit(
                Some(&identity),
                &target,
                &context,
                AuthorizationOutcome::ResolutionFailed,
            );
            Err(error.into())
        }
    }
}

fn resource_id_from(params: &RawPathParams) -> Option<String> {
    params
        .iter()
        .find(|(key, _)| *key == RESOURCE_ID_PARAM)
        .or_else(|| params.iter().next())
        .map(|(_, value)| value.to_owned())
}
