use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::SyndicateError;
use crate::models::{PaymentStatus, ShareSpec, TransactionKind};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateBuyerRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct AdjustBalanceRequest {
    pub delta: Decimal,
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateHorseRequest {
    pub name: String,
    pub information: Option<String>,
    pub total_value: Decimal,
    pub installment_count: i64,
    pub start_month: u32,
    pub start_year: i32,
    pub shares: Vec<ShareSpec>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateSharesRequest {
    pub shares: Vec<ShareSpec>,
}

#[derive(Deserialize, ToSchema)]
pub struct RecordTransactionRequest {
    pub kind: TransactionKind,
    pub concept: String,
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub horse_id: Option<Uuid>,
    pub buyer_id: Option<Uuid>,
    pub payment_date: Option<DateTime<Utc>>,
    pub effective_date: Option<DateTime<Utc>>,
    pub settled: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct PayInstallmentRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub deduct_from_balance: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct SweepRequest {
    /// Defaults to the current date when omitted.
    pub today: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct SweepResponse {
    pub swept: u64,
}

#[derive(Deserialize, IntoParams)]
pub struct TransactionListQuery {
    pub horse_id: Option<Uuid>,
    pub buyer_id: Option<Uuid>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub kind: Option<TransactionKind>,
}

#[derive(Deserialize, IntoParams)]
pub struct InstallmentListQuery {
    pub horse_id: Option<Uuid>,
    pub buyer_id: Option<Uuid>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub status: Option<PaymentStatus>,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for SyndicateError to implement IntoResponse
pub struct ApiError(pub SyndicateError);

impl From<SyndicateError> for ApiError {
    fn from(err: SyndicateError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use SyndicateError::*;
        let status = match &self.0 {
            InvalidShareSum(_)
            | InvalidPercentage(_)
            | InvalidInstallmentCount(_)
            | MissingRequiredField { .. }
            | InvalidPeriod(_)
            | NonPositiveAmount(_)
            | NotHorseBuyer { .. }
            | InvalidEmail(_) => StatusCode::BAD_REQUEST,
            Overpayment { .. } | AlreadyPaid(_) | EmailAlreadyRegistered(_) => StatusCode::CONFLICT,
            BuyerNotFound(_) | HorseNotFound(_) | InstallmentNotFound(_)
            | TransactionNotFound(_) => StatusCode::NOT_FOUND,
            StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
