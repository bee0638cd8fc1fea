//! Route tree assembly.
//!
//! Route hierarchy under `/api/v1`:
//!
//! ```text
//! /invoices                                 list, submit
//! /invoices/{id}                            get
//! /invoices/{id}/approve                    workflow action (POST)
//! /invoices/{id}/reject                     workflow action (POST)
//! /invoices/{id}/request-info               workflow action (POST)
//! /invoices/{id}/resubmit                   workflow action (POST)
//! /invoices/{id}/send-back                  workflow action (POST)
//! /invoices/{id}/restore                    workflow action (POST)
//! /invoices/{id}/audit                      audit trail (GET)
//! /invoices/{id}/audit/verify               chain verification (GET, admin)
//!
//! /users                                    list, provision (admin)
//! /users/{id}                               get, soft-deactivate (admin)
//! /users/{id}/manager                       assign manager (PUT, admin)
//! /users/{id}/reports                       replace direct reports (PUT, admin)
//! /users/{id}/finance-user                  resolution preview (GET)
//! ```

pub mod health;
pub mod invoice;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/invoices", invoice::router())
        .nest("/users", user::router())
}
