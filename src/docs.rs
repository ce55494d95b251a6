// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_stats,
        handlers::dashboard::get_revenue_series,
        handlers::dashboard::get_top_products,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::dashboard::DashboardStats,
            models::dashboard::RevenueBucket,
            models::dashboard::RankedProduct,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores de vendas, receita mensal e ranking de produtos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
