use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
};
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::error::{CruddappError, MutationFailure};
use crate::notify::Toast;
use crate::server::AppState;
use crate::state_structs::{
    CreateEntryArgs, CreateEntryRequest, DeleteEntryQuery, JournalEntry, ProgramInfoResponse,
    TxResponse, UpdateEntryRequest,
};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

impl From<Result<Signature, MutationFailure>> for TxResponse {
    fn from(result: Result<Signature, MutationFailure>) -> Self {
        match result {
            Ok(signature) => TxResponse {
                success: true,
                tx_signature: Some(signature.to_string()),
                error: None,
            },
            Err(failure) => TxResponse {
                success: false,
                tx_signature: None,
                error: Some(failure.to_string()),
            },
        }
    }
}

impl TxResponse {
    fn rejected(message: String) -> Self {
        TxResponse {
            success: false,
            tx_signature: None,
            error: Some(message),
        }
    }
}

fn parse_address(raw: &str) -> Result<Pubkey, CruddappError> {
    Pubkey::from_str(raw).map_err(|_| CruddappError::InvalidAddress(raw.to_string()))
}

// --- Program level ---

/// GET /api/v1/program
#[axum::debug_handler]
pub async fn program_info(State(state): State<AppState>) -> ResponseJson<ApiResponse<ProgramInfoResponse>> {
    match state.program.fetch_program_account_info().await {
        Ok(account) => ResponseJson(ApiResponse::success(ProgramInfoResponse {
            program_id: state.program.program_id().to_string(),
            cluster: state.program.cluster().name.clone(),
            account,
        })),
        Err(e) => {
            tracing::error!("[program_info] {}", e);
            ResponseJson(ApiResponse::error(format!("Failed to fetch program account: {}", e)))
        }
    }
}

/// GET /api/v1/entries
#[axum::debug_handler]
pub async fn list_entries(State(state): State<AppState>) -> ResponseJson<ApiResponse<Vec<JournalEntry>>> {
    match state.program.list_entries().await {
        Ok(entries) => ResponseJson(ApiResponse::success(entries)),
        Err(e) => {
            tracing::error!("[list_entries] {}", e);
            ResponseJson(ApiResponse::error(format!("Failed to list journal entries: {}", e)))
        }
    }
}

/// POST /api/v1/entries
///
/// The entry is owned by the server's signing wallet.
#[axum::debug_handler]
pub async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<CreateEntryRequest>,
) -> ResponseJson<TxResponse> {
    let owner = state.program.context().signer_pubkey();
    let args = CreateEntryArgs::new(request.title, request.message, owner);
    ResponseJson(state.program.create_entry(args).await.into())
}

// --- Single entry ---

/// GET /api/v1/entries/{address}
#[axum::debug_handler]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ResponseJson<ApiResponse<JournalEntry>> {
    let address = match parse_address(&address) {
        Ok(address) => address,
        Err(e) => return ResponseJson(ApiResponse::error(e.to_string())),
    };
    match state.program.account(address).fetch_entry().await {
        Ok(entry) => ResponseJson(ApiResponse::success(entry)),
        Err(e) => ResponseJson(ApiResponse::error(e.to_string())),
    }
}

/// PUT /api/v1/entries/{address}
#[axum::debug_handler]
pub async fn update_entry(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Json(request): Json<UpdateEntryRequest>,
) -> ResponseJson<TxResponse> {
    let address = match parse_address(&address) {
        Ok(address) => address,
        Err(e) => return ResponseJson(TxResponse::rejected(e.to_string())),
    };
    let result = state
        .program
        .account(address)
        .update_entry(&request.title, &request.message)
        .await;
    ResponseJson(result.into())
}

/// DELETE /api/v1/entries/{address}?title=...
#[axum::debug_handler]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<DeleteEntryQuery>,
) -> ResponseJson<TxResponse> {
    let address = match parse_address(&address) {
        Ok(address) => address,
        Err(e) => return ResponseJson(TxResponse::rejected(e.to_string())),
    };
    let result = state.program.account(address).delete_entry(&query.title).await;
    ResponseJson(result.into())
}

/// GET /api/v1/notifications, most recent first.
pub async fn notifications(State(state): State<AppState>) -> ResponseJson<ApiResponse<Vec<Toast>>> {
    ResponseJson(ApiResponse::success(state.toasts.recent()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use solana_sdk::signature::Signer;
    use tower::ServiceExt;

    use crate::onchain_instance::entry_address;
    use crate::server::{AppState, router};
    use crate::testing::{Harness, harness};

    fn app(h: &Harness) -> axum::Router {
        router(AppState {
            program: h.program.clone(),
            toasts: h.toasts.clone(),
        })
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn ping_answers_pong() {
        let h = harness();
        let request = Request::get("/ping").body(Body::empty()).unwrap();
        let (status, body) = send(app(&h), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pong");
    }

    #[tokio::test]
    async fn create_returns_the_signature_and_records_a_notification() {
        let h = harness();
        let request = json_request(
            "POST",
            "/api/v1/entries",
            serde_json::json!({ "title": "A", "message": "hello" }),
        );
        let (_, body) = send(app(&h), request).await;
        assert_eq!(body["success"], true);
        let signature = body["tx_signature"].as_str().unwrap().to_string();

        let request = Request::get("/api/v1/notifications").body(Body::empty()).unwrap();
        let (_, body) = send(app(&h), request).await;
        assert_eq!(body["data"][0]["kind"], "success");
        assert_eq!(body["data"][0]["signature"], signature.as_str());
    }

    #[tokio::test]
    async fn rejected_delete_reports_the_failure() {
        let h = harness();
        *h.client.reject_with.lock() = Some("insufficient funds".to_string());
        let address = entry_address("A", &h.signer.pubkey(), &crate::ID).unwrap();
        let uri = format!("/api/v1/entries/{}?title=A", address);
        let request = Request::delete(uri).body(Body::empty()).unwrap();

        let (status, body) = send(app(&h), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Error deleting journal entry"));
        assert!(error.contains("insufficient funds"));
    }

    #[tokio::test]
    async fn put_with_another_entrys_title_is_rejected() {
        let h = harness();
        let address = entry_address("A", &h.signer.pubkey(), &crate::ID).unwrap();
        let request = json_request(
            "PUT",
            &format!("/api/v1/entries/{}", address),
            serde_json::json!({ "title": "B", "message": "new" }),
        );
        let (_, body) = send(app(&h), request).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Error updating journal entry"));
        assert!(h.client.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn malformed_address_is_rejected_before_any_call() {
        let h = harness();
        let request = json_request(
            "PUT",
            "/api/v1/entries/not-a-key",
            serde_json::json!({ "title": "A", "message": "world" }),
        );
        let (_, body) = send(app(&h), request).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("not-a-key"));
        assert!(h.client.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn program_info_reports_the_bound_program() {
        let h = harness();
        let request = Request::get("/api/v1/program").body(Body::empty()).unwrap();
        let (_, body) = send(app(&h), request).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["program_id"], crate::ID.to_string());
        assert_eq!(body["data"]["cluster"], "localnet");
        assert!(body["data"]["account"].is_null());
    }
}
