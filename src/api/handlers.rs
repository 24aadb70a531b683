use crate::{
    api::models::*,
    error::SyndicateError,
    logger::in_memory::InMemoryAuditLogger,
    models::{
        AuditLogEntry, BillingPeriod, Buyer, BuyerInstallment, Horse, Transaction,
        TransactionDraft,
    },
    service::{BuyerBalance, HorseDetail, SyndicateService},
    storage::{InstallmentFilter, TransactionFilter, in_memory::InMemoryStorage},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

type AppService = SyndicateService<InMemoryStorage, InMemoryAuditLogger>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/buyers", axum::routing::post(create_buyer))
        .route("/buyers", axum::routing::get(list_buyers))
        .route("/buyers/{buyer_id}", axum::routing::get(get_buyer))
        .route("/buyers/{buyer_id}/balance", axum::routing::get(get_buyer_balance))
        .route(
            "/buyers/{buyer_id}/adjustments",
            axum::routing::post(adjust_buyer_balance),
        )
        .route("/horses", axum::routing::post(create_horse))
        .route("/horses", axum::routing::get(list_horses))
        .route("/horses/{horse_id}", axum::routing::get(get_horse))
        .route("/horses/{horse_id}/shares", axum::routing::put(update_shares))
        .route("/transactions", axum::routing::post(record_transaction))
        .route("/transactions", axum::routing::get(list_transactions))
        .route(
            "/transactions/{transaction_id}/settle",
            axum::routing::post(mark_settled),
        )
        .route("/installments", axum::routing::get(list_installments))
        .route(
            "/installments/{buyer_installment_id}/pay",
            axum::routing::post(pay_installment),
        )
        .route("/installments/sweep", axum::routing::post(sweep_overdue))
        .route("/logs", axum::routing::get(get_audit_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/buyers",
    request_body = CreateBuyerRequest,
    responses(
        (status = 201, description = "Buyer created", body = Buyer),
        (status = 400, description = "Invalid email", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn create_buyer(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CreateBuyerRequest>,
) -> Result<(StatusCode, Json<Buyer>), ApiError> {
    let buyer = service
        .create_buyer(req.name, req.email, req.is_admin)
        .await?;
    Ok((StatusCode::CREATED, Json(buyer)))
}

#[utoipa::path(
    get,
    path = "/api/buyers",
    responses((status = 200, description = "All buyers", body = [Buyer]))
)]
async fn list_buyers(
    State(service): State<Arc<AppService>>,
) -> Result<Json<Vec<Buyer>>, ApiError> {
    Ok(Json(service.list_buyers().await?))
}

#[utoipa::path(
    get,
    path = "/api/buyers/{buyer_id}",
    responses(
        (status = 200, description = "Buyer found", body = Buyer),
        (status = 404, description = "Buyer not found", body = ErrorResponse)
    )
)]
async fn get_buyer(
    State(service): State<Arc<AppService>>,
    Path(buyer_id): Path<Uuid>,
) -> Result<Json<Buyer>, ApiError> {
    let buyer = service
        .get_buyer(buyer_id)
        .await?
        .ok_or_else(|| SyndicateError::BuyerNotFound(buyer_id.to_string()))?;
    Ok(Json(buyer))
}

#[utoipa::path(
    get,
    path = "/api/buyers/{buyer_id}/balance",
    responses(
        (status = 200, description = "Resolved balance", body = BuyerBalance),
        (status = 404, description = "Buyer not found", body = ErrorResponse)
    )
)]
async fn get_buyer_balance(
    State(service): State<Arc<AppService>>,
    Path(buyer_id): Path<Uuid>,
) -> Result<Json<BuyerBalance>, ApiError> {
    Ok(Json(service.buyer_balance(buyer_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/buyers/{buyer_id}/adjustments",
    request_body = AdjustBalanceRequest,
    responses(
        (status = 200, description = "Adjustment applied", body = Buyer),
        (status = 404, description = "Buyer not found", body = ErrorResponse)
    )
)]
async fn adjust_buyer_balance(
    State(service): State<Arc<AppService>>,
    Path(buyer_id): Path<Uuid>,
    Json(req): Json<AdjustBalanceRequest>,
) -> Result<Json<Buyer>, ApiError> {
    let buyer = service
        .adjust_buyer_balance(buyer_id, req.delta, req.reason)
        .await?;
    Ok(Json(buyer))
}

#[utoipa::path(
    post,
    path = "/api/horses",
    request_body = CreateHorseRequest,
    responses(
        (status = 201, description = "Horse created with schedule", body = Horse),
        (status = 400, description = "Invalid shares or installment count", body = ErrorResponse),
        (status = 404, description = "Unknown buyer in shares", body = ErrorResponse)
    )
)]
async fn create_horse(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CreateHorseRequest>,
) -> Result<(StatusCode, Json<Horse>), ApiError> {
    // Resolve every referenced buyer before touching the registry.
    let lookups = req
        .shares
        .iter()
        .map(|share| {
            let service = service.clone();
            let buyer_id = share.buyer_id;
            async move {
                service
                    .get_buyer(buyer_id)
                    .await?
                    .ok_or_else(|| SyndicateError::BuyerNotFound(buyer_id.to_string()))
            }
        })
        .collect::<Vec<_>>();
    futures::future::try_join_all(lookups).await?;

    let horse = service
        .create_horse(
            req.name,
            req.information,
            req.total_value,
            req.installment_count,
            BillingPeriod::new(req.start_month, req.start_year),
            req.shares,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(horse)))
}

#[utoipa::path(
    get,
    path = "/api/horses",
    responses((status = 200, description = "All horses", body = [Horse]))
)]
async fn list_horses(
    State(service): State<Arc<AppService>>,
) -> Result<Json<Vec<Horse>>, ApiError> {
    Ok(Json(service.list_horses().await?))
}

#[utoipa::path(
    get,
    path = "/api/horses/{horse_id}",
    responses(
        (status = 200, description = "Horse with resolved schedule", body = HorseDetail),
        (status = 404, description = "Horse not found", body = ErrorResponse)
    )
)]
async fn get_horse(
    State(service): State<Arc<AppService>>,
    Path(horse_id): Path<Uuid>,
) -> Result<Json<HorseDetail>, ApiError> {
    let detail = service
        .horse_detail(horse_id)
        .await?
        .ok_or_else(|| SyndicateError::HorseNotFound(horse_id.to_string()))?;
    Ok(Json(detail))
}

#[utoipa::path(
    put,
    path = "/api/horses/{horse_id}/shares",
    request_body = UpdateSharesRequest,
    responses(
        (status = 200, description = "Shares replaced", body = Horse),
        (status = 400, description = "Shares do not sum to 100", body = ErrorResponse),
        (status = 404, description = "Horse not found", body = ErrorResponse)
    )
)]
async fn update_shares(
    State(service): State<Arc<AppService>>,
    Path(horse_id): Path<Uuid>,
    Json(req): Json<UpdateSharesRequest>,
) -> Result<Json<Horse>, ApiError> {
    Ok(Json(service.update_shares(horse_id, req.shares).await?))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = RecordTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = Transaction),
        (status = 400, description = "Missing type-specific field", body = ErrorResponse),
        (status = 404, description = "Unknown horse or buyer", body = ErrorResponse)
    )
)]
async fn record_transaction(
    State(service): State<Arc<AppService>>,
    Json(req): Json<RecordTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let draft = TransactionDraft {
        kind: req.kind,
        concept: req.concept,
        amount: req.amount,
        period: BillingPeriod::new(req.month, req.year),
        horse_id: req.horse_id,
        buyer_id: req.buyer_id,
        payment_date: req.payment_date,
        effective_date: req.effective_date,
        settled: req.settled,
        notes: req.notes,
    };
    let transaction = service.record_transaction(draft).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(TransactionListQuery),
    responses((status = 200, description = "Matching transactions", body = [Transaction]))
)]
async fn list_transactions(
    State(service): State<Arc<AppService>>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let filter = TransactionFilter {
        horse_id: query.horse_id,
        buyer_id: query.buyer_id,
        period: query
            .month
            .zip(query.year)
            .map(|(month, year)| BillingPeriod::new(month, year)),
        kind: query.kind,
    };
    Ok(Json(service.list_transactions(filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/transactions/{transaction_id}/settle",
    responses(
        (status = 200, description = "Transaction settled", body = Transaction),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
async fn mark_settled(
    State(service): State<Arc<AppService>>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(service.mark_settled(transaction_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/installments",
    params(InstallmentListQuery),
    responses((status = 200, description = "Matching buyer installments", body = [BuyerInstallment]))
)]
async fn list_installments(
    State(service): State<Arc<AppService>>,
    Query(query): Query<InstallmentListQuery>,
) -> Result<Json<Vec<BuyerInstallment>>, ApiError> {
    let filter = InstallmentFilter {
        horse_id: query.horse_id,
        buyer_id: query.buyer_id,
        period: query
            .month
            .zip(query.year)
            .map(|(month, year)| BillingPeriod::new(month, year)),
        status: query.status,
    };
    Ok(Json(service.list_buyer_installments(filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/installments/{buyer_installment_id}/pay",
    request_body = PayInstallmentRequest,
    responses(
        (status = 200, description = "Payment applied", body = BuyerInstallment),
        (status = 400, description = "Non-positive amount", body = ErrorResponse),
        (status = 404, description = "Installment not found", body = ErrorResponse),
        (status = 409, description = "Overpayment or already paid", body = ErrorResponse)
    )
)]
async fn pay_installment(
    State(service): State<Arc<AppService>>,
    Path(buyer_installment_id): Path<Uuid>,
    Json(req): Json<PayInstallmentRequest>,
) -> Result<Json<BuyerInstallment>, ApiError> {
    let row = service
        .pay_installment(buyer_installment_id, req.amount, req.deduct_from_balance)
        .await?;
    Ok(Json(row))
}

#[utoipa::path(
    post,
    path = "/api/installments/sweep",
    request_body = SweepRequest,
    responses((status = 200, description = "Sweep completed", body = SweepResponse))
)]
async fn sweep_overdue(
    State(service): State<Arc<AppService>>,
    Json(req): Json<SweepRequest>,
) -> Result<Json<SweepResponse>, ApiError> {
    let today = req.today.unwrap_or_else(|| Utc::now().date_naive());
    let swept = service.sweep_overdue(today).await?;
    Ok(Json(SweepResponse { swept }))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses((status = 200, description = "Audit trail", body = [AuditLogEntry]))
)]
async fn get_audit_logs(
    State(service): State<Arc<AppService>>,
) -> Result<Json<Vec<AuditLogEntry>>, ApiError> {
    Ok(Json(service.audit_entries().await?))
}
