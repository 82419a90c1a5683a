pub mod admin;
pub mod catalog;
pub mod scripts;
pub mod watchlist;

use ottradar_core::audit::NewAuditEntry;
use ottradar_db::repositories::AuditRepo;

use crate::middleware::admin::AdminUser;
use crate::state::AppState;

/// Write an audit entry for an admin mutation, stamped with the admin's
/// client details. Failures are logged and never fail the request.
pub(crate) async fn record_audit(state: &AppState, admin: &AdminUser, entry: NewAuditEntry) {
    let entry = entry.client(admin.ip_address.clone(), admin.user_agent.as_deref());
    if let Err(e) = AuditRepo::insert(&state.pool, &entry).await {
        tracing::warn!(
            admin = %admin.username,
            action = %entry.action_type,
            error = %e,
            "Failed to write audit entry",
        );
    }
}
