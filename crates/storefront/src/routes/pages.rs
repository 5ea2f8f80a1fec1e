//! Marketing page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use diamond_assess_core::{Price, Service, ServiceId};

use crate::filters;
use crate::routes::blog::PostView;
use crate::routes::layout::Layout;
use crate::state::AppState;

/// Posts teased on the home page.
const HOME_POSTS_COUNT: usize = 3;

/// The published service catalog.
#[must_use]
pub fn service_catalog() -> Vec<Service> {
    [
        (
            1,
            "Standard Grading",
            "Full 4C assessment with a laminated grading report.",
            1_500_000,
            5,
        ),
        (
            2,
            "Express Grading",
            "The standard assessment, returned within two working days.",
            2_500_000,
            2,
        ),
        (
            3,
            "Origin & Treatment Report",
            "Natural or lab-grown determination plus detection of HPHT and fracture filling.",
            3_200_000,
            7,
        ),
        (
            4,
            "Valuation Certificate",
            "Market valuation for insurance or resale, signed by a senior assessor.",
            1_800_000,
            3,
        ),
        (
            5,
            "Laser Inscription Check",
            "Microscope reading of girdle inscriptions matched against the issuing lab.",
            500_000,
            1,
        ),
    ]
    .into_iter()
    .map(
        |(id, name, description, amount, turnaround_days)| Service {
            id: ServiceId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            price: Price::vnd(amount),
            turnaround_days,
            is_active: true,
        },
    )
    .collect()
}

/// Service row for templates.
#[derive(Clone)]
pub struct ServiceView {
    pub name: String,
    pub description: String,
    pub price: String,
    pub turnaround: String,
}

impl From<&Service> for ServiceView {
    fn from(service: &Service) -> Self {
        let turnaround = match service.turnaround_days {
            1 => "Next working day".to_string(),
            days => format!("{days} working days"),
        };
        Self {
            name: service.name.clone(),
            description: service.description.clone(),
            price: service.price.to_string(),
            turnaround,
        }
    }
}

fn active_services() -> Vec<ServiceView> {
    service_catalog()
        .iter()
        .filter(|s| s.is_active)
        .map(ServiceView::from)
        .collect()
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub services: Vec<ServiceView>,
    pub posts: Vec<PostView>,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub layout: Layout,
}

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub layout: Layout,
    pub services: Vec<ServiceView>,
}

/// Pricing page template.
#[derive(Template, WebTemplate)]
#[template(path = "pricing.html")]
pub struct PricingTemplate {
    pub layout: Layout,
    pub services: Vec<ServiceView>,
}

/// Display the home page.
#[instrument(skip(state, layout))]
pub async fn home(State(state): State<AppState>, layout: Layout) -> impl IntoResponse {
    HomeTemplate {
        layout,
        services: active_services().into_iter().take(3).collect(),
        posts: state
            .content()
            .recent_posts(HOME_POSTS_COUNT, None)
            .into_iter()
            .map(PostView::from)
            .collect(),
    }
}

/// Display the about page.
#[instrument(skip(layout))]
pub async fn about(layout: Layout) -> impl IntoResponse {
    AboutTemplate { layout }
}

/// Display the services catalog.
#[instrument(skip(layout))]
pub async fn services(layout: Layout) -> impl IntoResponse {
    ServicesTemplate {
        layout,
        services: active_services(),
    }
}

/// Display the pricing table.
#[instrument(skip(layout))]
pub async fn pricing(layout: Layout) -> impl IntoResponse {
    PricingTemplate {
        layout,
        services: active_services(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_priced_in_vnd() {
        let catalog = service_catalog();
        assert_eq!(catalog.len(), 5);
        assert!(
            catalog
                .iter()
                .all(|s| s.price.currency_code == diamond_assess_core::CurrencyCode::VND)
        );
    }

    #[test]
    fn test_service_view_turnaround() {
        let catalog = service_catalog();
        let views: Vec<ServiceView> = catalog.iter().map(ServiceView::from).collect();
        assert_eq!(views[0].turnaround, "5 working days");
        assert_eq!(views[4].turnaround, "Next working day");
        assert_eq!(views[0].price, "1,500,000 ₫");
    }
}
