//! Rendered pages and the dialog forms.
//!
//! The dialogs are driven by the URL: `/?rent=<id>` opens the rental dialog,
//! `&via=email|phone` picks the branch, and `/?call=open` opens the call-back
//! dialog. Forms post back to `/rent/<id>/` and `/request-call/`, which send
//! one email and render the page with the dialog in its new phase.
//! Every page also answers on its trailing-slash path.

use std::sync::Arc;

use axum::extract::{Form, Path, Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use chrono::Datelike;
use serde::Deserialize;

use backhoe_core::content::{Category, category};
use backhoe_core::lead::{CallModal, CallbackRequest, ContactMethod, LeadModal, RentalDraft};
use backhoe_core::site::{Overlay, PageContext, render_directory, render_home, render_state};

use crate::error::AppError;
use crate::routes::map::{DEFAULT_WIDTH, map_markup};
use crate::state::AppState;

/// Build the page router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/service-areas", get(directory))
        .route("/service-areas/", get(directory))
        .route("/service-areas/{slug}", get(service_area))
        .route("/service-areas/{slug}/", get(service_area))
        .route("/rent/{id}", post(rent))
        .route("/rent/{id}/", post(rent))
        .route("/request-call", post(request_call))
        .route("/request-call/", post(request_call))
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

fn find_category(id: &str) -> Result<&'static Category, AppError> {
    category(id).ok_or_else(|| AppError::NotFound(format!("unknown equipment category '{id}'")))
}

async fn home_html(state: &AppState, overlay: Overlay<'_>, active: Option<&str>) -> String {
    let map = map_markup(state, DEFAULT_WIDTH, active).await;
    render_home(&PageContext::new(current_year()).with_overlay(overlay), &map)
}

// ── Home ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct HomeQuery {
    rent: Option<String>,
    via: Option<String>,
    call: Option<String>,
    active: Option<String>,
}

async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, AppError> {
    let active = query.active.as_deref();

    if let Some(id) = query.rent.as_deref() {
        let mut modal = LeadModal::open(find_category(id)?);
        if let Some(via) = query.via.as_deref() {
            let method: ContactMethod = via.parse().map_err(AppError::BadRequest)?;
            modal.choose(method);
        }
        return Ok(Html(home_html(&state, Overlay::Rental(&modal), active).await));
    }

    if query.call.is_some() {
        let modal = CallModal::open();
        return Ok(Html(home_html(&state, Overlay::Call(&modal), active).await));
    }

    Ok(Html(home_html(&state, Overlay::None, active).await))
}

// ── Dialog forms ─────────────────────────────────────────────────────

async fn rent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(draft): Form<RentalDraft>,
) -> Result<Html<String>, AppError> {
    let mut modal = LeadModal::open(find_category(&id)?);
    modal.choose(ContactMethod::Email);
    modal.update_draft(draft);
    state.leads.submit_rental(&mut modal, state.failure_policy).await;
    Ok(Html(home_html(&state, Overlay::Rental(&modal), None).await))
}

async fn request_call(
    State(state): State<Arc<AppState>>,
    Form(draft): Form<CallbackRequest>,
) -> Html<String> {
    let mut modal = CallModal::open();
    modal.update_draft(draft);
    state.leads.submit_callback(&mut modal, state.failure_policy).await;
    Html(home_html(&state, Overlay::Call(&modal), None).await)
}

// ── Service areas ────────────────────────────────────────────────────

async fn directory(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_directory(&PageContext::new(current_year()), &state.directory))
}

async fn service_area(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let area = state
        .directory
        .by_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("no service area '{slug}'")))?;
    Ok(Html(render_state(&PageContext::new(current_year()), area)))
}
