//! Signed-in landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use diamond_assess_core::UserRole;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::routes::layout::Layout;

/// A shortcut card on the dashboard.
#[derive(Clone, Copy)]
pub struct WorkspaceCard {
    pub title: &'static str,
    pub body: &'static str,
}

const fn card(title: &'static str, body: &'static str) -> WorkspaceCard {
    WorkspaceCard { title, body }
}

/// Shortcuts offered to each role.
#[must_use]
pub fn workspace_cards(role: UserRole) -> Vec<WorkspaceCard> {
    match role {
        UserRole::Guest => vec![],
        UserRole::Customer => vec![
            card("Request an assessment", "Book a grading slot and drop off your stone."),
            card("Track orders", "Follow each stone from receipt to return."),
            card("Certificates", "Download and verify your issued certificates."),
        ],
        UserRole::AssessmentStaff => vec![
            card("Intake queue", "Stones received and waiting for grading."),
            card("Record results", "Enter the 4C measurements for a sample."),
            card("Quality check", "Second-reader review before certificates issue."),
        ],
        UserRole::Consultant => vec![
            card("Conversations", "Customer questions awaiting a reply."),
            card("Quotes", "Prepare service quotes for new requests."),
        ],
        UserRole::Manager => vec![
            card("Orders", "Open orders and their payment status."),
            card("Staff workload", "Assignments per assessor this week."),
            card("Feedback", "Recent ratings and unanswered reviews."),
        ],
        UserRole::Admin => vec![
            card("Users", "Accounts, roles and deactivation."),
            card("Services", "Catalog entries and pricing."),
            card("Certificates", "Issue and revoke certificates."),
        ],
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub user: CurrentUser,
    pub cards: Vec<WorkspaceCard>,
}

/// Display the dashboard for the signed-in user.
#[instrument(skip(user, layout), fields(user_id = %user.id))]
pub async fn show(RequireAuth(user): RequireAuth, layout: Layout) -> impl IntoResponse {
    DashboardTemplate {
        layout,
        cards: workspace_cards(user.role),
        user,
    }
}
