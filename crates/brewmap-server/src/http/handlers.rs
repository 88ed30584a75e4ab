// SPDX-License-Identifier: Apache-2.0

use crate::csrf::CsrfError;
use crate::http::forms::{AddCafeForm, DeleteForm, EditCafeForm, FormErrors, CSRF_FIELD};
use crate::http::pages::{add_cafe_page, cafe_list_page, edit_cafe_page};
use crate::http::response_contract::AppError;
use crate::http::session::FormSession;
use crate::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use brewmap_model::{CafeId, CafeRecord};
use brewmap_store::{CafeStore, StoreError};
use serde::Deserialize;
use tracing::{debug, info, warn};

pub const AUDIT_TARGET: &str = "brewmap_audit";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdQuery {
    pub id: Option<String>,
}

/// Runs a blocking store call off the async workers.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn CafeStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| StoreError::unavailable(format!("store task failed: {e}")))?
}

fn require_id(query: &IdQuery) -> Result<CafeId, AppError> {
    let raw = query.id.as_deref().unwrap_or("");
    CafeId::parse(raw).map_err(|e| {
        debug!(id = raw, error = %e, "rejected cafe id");
        AppError::NotFound(format!("no cafe matches id {raw:?}"))
    })
}

fn audit(state: &AppState, action: &'static str, id: CafeId) {
    if state.config.enable_audit_log {
        info!(target: AUDIT_TARGET, action, cafe_id = id.get(), "cafe record changed");
    }
}

fn csrf_errors(state: &AppState, token: Option<&str>, session: &FormSession) -> FormErrors {
    let mut errors = FormErrors::new();
    if let Err(err) = state.csrf.verify(token, session.presented()) {
        warn!(error = %err, "form rejected by csrf check");
        errors.insert(CSRF_FIELD, err.user_message());
    }
    errors
}

fn merge(mut into: FormErrors, from: &FormErrors) -> FormErrors {
    for field in from.fields() {
        if let Some(msg) = from.get(field) {
            into.insert(field, msg);
        }
    }
    into
}

fn see_home() -> Response {
    Redirect::to("/").into_response()
}

pub(crate) async fn list_cafes_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let session = FormSession::from_headers(&headers);
    let cafes = with_store(&state, |store| store.list()).await?;
    let token = state.csrf.issue(session.nonce());
    Ok(session.attach(Html(cafe_list_page(&cafes, &token)).into_response()))
}

pub(crate) async fn add_form_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let session = FormSession::from_headers(&headers);
    let token = state.csrf.issue(session.nonce());
    session.attach(
        Html(add_cafe_page(
            &AddCafeForm::default(),
            &FormErrors::new(),
            &token,
        ))
        .into_response(),
    )
}

pub(crate) async fn add_submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddCafeForm>,
) -> Result<Response, AppError> {
    let session = FormSession::from_headers(&headers);
    let rerender = |status: StatusCode, errors: &FormErrors| {
        let token = state.csrf.issue(session.nonce());
        session.attach((status, Html(add_cafe_page(&form, errors, &token))).into_response())
    };

    let mut errors = csrf_errors(&state, form.csrf_token.as_deref(), &session);
    let validated = form.validate();
    if let Err(field_errors) = &validated {
        errors = merge(errors, field_errors);
    }
    let new_cafe = match validated {
        Ok(cafe) if errors.is_empty() => cafe,
        _ => {
            debug!(fields = ?errors.fields(), "add form rejected");
            return Ok(rerender(StatusCode::UNPROCESSABLE_ENTITY, &errors));
        }
    };

    match with_store(&state, move |store| store.insert(new_cafe)).await {
        Ok(record) => {
            audit(&state, "add", record.id);
            Ok(see_home())
        }
        Err(err) if err.is_conflict() => {
            warn!(error = %err, "add rejected: duplicate name");
            let mut errors = FormErrors::new();
            errors.insert("name", "A cafe with this name already exists.");
            Ok(rerender(StatusCode::CONFLICT, &errors))
        }
        Err(err) => Err(err.into()),
    }
}

async fn load_cafe(state: &AppState, query: &IdQuery) -> Result<CafeRecord, AppError> {
    let id = require_id(query)?;
    Ok(with_store(state, move |store| store.get_by_id(id)).await?)
}

pub(crate) async fn edit_form_handler(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let cafe = load_cafe(&state, &query).await?;
    let session = FormSession::from_headers(&headers);
    let token = state.csrf.issue(session.nonce());
    Ok(session.attach(
        Html(edit_cafe_page(
            &cafe,
            &EditCafeForm::from_record(&cafe),
            &FormErrors::new(),
            &token,
        ))
        .into_response(),
    ))
}

// The body is extracted fallibly so an unknown id answers 404 whatever was posted.
pub(crate) async fn edit_submit_handler(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    headers: HeaderMap,
    form: Result<Form<EditCafeForm>, FormRejection>,
) -> Result<Response, AppError> {
    let cafe = load_cafe(&state, &query).await?;
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(cafe_id = cafe.id.get(), error = %rejection, "edit body rejected");
            return Ok(rejection.into_response());
        }
    };
    let session = FormSession::from_headers(&headers);

    let mut errors = csrf_errors(&state, form.csrf_token.as_deref(), &session);
    let validated = form.validate();
    if let Err(field_errors) = &validated {
        errors = merge(errors, field_errors);
    }
    let update = match validated {
        Ok(update) if errors.is_empty() => update,
        _ => {
            debug!(cafe_id = cafe.id.get(), fields = ?errors.fields(), "edit form rejected");
            let token = state.csrf.issue(session.nonce());
            return Ok(session.attach(
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Html(edit_cafe_page(&cafe, &form, &errors, &token)),
                )
                    .into_response(),
            ));
        }
    };

    let id = cafe.id;
    with_store(&state, move |store| store.update(id, &update)).await?;
    audit(&state, "edit", id);
    Ok(see_home())
}

pub(crate) async fn delete_get_handler(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    if !state.config.allow_get_delete {
        return Err(AppError::MethodNotAllowed(
            "Deleting through a link is disabled; use the delete button.",
        ));
    }
    let id = require_id(&query)?;
    with_store(&state, move |store| store.delete(id)).await?;
    audit(&state, "delete", id);
    Ok(see_home())
}

pub(crate) async fn delete_post_handler(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    headers: HeaderMap,
    form: Result<Form<DeleteForm>, FormRejection>,
) -> Result<Response, AppError> {
    let id = load_cafe(&state, &query).await?.id;
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(cafe_id = id.get(), error = %rejection, "delete body rejected");
            return Ok(rejection.into_response());
        }
    };
    let session = FormSession::from_headers(&headers);
    state
        .csrf
        .verify(form.csrf_token.as_deref(), session.presented())
        .map_err(|err: CsrfError| {
            warn!(cafe_id = id.get(), error = %err, "delete rejected by csrf check");
            AppError::InvalidForm(err.user_message().to_string())
        })?;
    with_store(&state, move |store| store.delete(id)).await?;
    audit(&state, "delete", id);
    Ok(see_home())
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> Response {
    match with_store(&state, |store| store.ping()).await {
        Ok(()) => (StatusCode::OK, "ok").into_response(),
        Err(err) => {
            warn!(error = %err, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable").into_response()
        }
    }
}
