pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::eligibility::handlers as spin;
use crate::meals::handlers as meals;
use crate::selections::handlers as selections;
use crate::settings::handlers as settings;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Meal catalog
        .route(
            "/api/v1/meals",
            get(meals::handle_list_meals).post(meals::handle_create_meal),
        )
        .route(
            "/api/v1/meals/:id",
            get(meals::handle_get_meal)
                .patch(meals::handle_update_meal)
                .delete(meals::handle_delete_meal),
        )
        // Selection history
        .route(
            "/api/v1/selections",
            get(selections::handle_list_selections).post(selections::handle_confirm_selection),
        )
        .route(
            "/api/v1/selections/:id",
            delete(selections::handle_delete_selection),
        )
        // Cooldown settings
        .route(
            "/api/v1/settings",
            get(settings::handle_get_settings).patch(settings::handle_update_settings),
        )
        // Spin
        .route("/api/v1/spin", post(spin::handle_spin))
        .route("/api/v1/eligibility", get(spin::handle_get_eligibility))
        .with_state(state)
}
