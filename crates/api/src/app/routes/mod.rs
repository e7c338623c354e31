//! Route table, split by gate.
//!
//! Each router groups the routes sharing one [`Gate`]; `app::build_app` layers
//! the gate onto the token and admin groups and merges all three. Paths may
//! appear in several groups with different methods.

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

pub mod carts;
pub mod menu;
pub mod payments;
pub mod reviews;
pub mod stats;
pub mod system;
pub mod tokens;
pub mod users;

/// Routes anyone may call.
pub fn open_router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/jwt", post(tokens::issue_token))
        .route("/users", post(users::create_user))
        .route("/menu", get(menu::list_menu))
        .route(
            "/menu/:id",
            get(menu::get_menu_item)
                .patch(menu::update_menu_item)
                .delete(menu::delete_menu_item),
        )
        .route("/reviews", get(reviews::list_reviews).post(reviews::create_review))
        .route("/carts", get(carts::list_carts).post(carts::add_to_cart))
        .route("/carts/:id", delete(carts::remove_from_cart))
        .route("/create-payment-intent", post(payments::create_payment_intent))
        .route("/payments", post(payments::create_payment))
        .route("/admin-stats", get(stats::admin_stats))
        .route("/order-stats", get(stats::order_stats))
}

/// Routes requiring a valid token.
pub fn token_router() -> Router {
    Router::new()
        .route("/users/admin/:id", get(users::check_admin))
        .route("/payments", get(payments::list_payments))
}

/// Routes requiring a valid token held by an admin.
pub fn admin_router() -> Router {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/:id", delete(users::delete_user))
        .route("/users/admin/:id", patch(users::make_admin))
        .route("/menu", post(menu::create_menu_item))
}
