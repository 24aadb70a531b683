use utoipa::OpenApi;

use crate::{
    api::models::{
        AdjustBalanceRequest, CreateBuyerRequest, CreateHorseRequest, ErrorResponse,
        PayInstallmentRequest, RecordTransactionRequest, SweepRequest, SweepResponse,
        UpdateSharesRequest,
    },
    models::{
        AuditLogEntry, BillingPeriod, Buyer, BuyerInstallment, Horse, Installment,
        OwnershipShare, PaymentStatus, ShareSpec, Transaction, TransactionKind,
    },
    service::{BuyerBalance, HorseDetail, HorseOutstanding},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_buyer,
        super::handlers::list_buyers,
        super::handlers::get_buyer,
        super::handlers::get_buyer_balance,
        super::handlers::adjust_buyer_balance,
        super::handlers::create_horse,
        super::handlers::list_horses,
        super::handlers::get_horse,
        super::handlers::update_shares,
        super::handlers::record_transaction,
        super::handlers::list_transactions,
        super::handlers::mark_settled,
        super::handlers::list_installments,
        super::handlers::pay_installment,
        super::handlers::sweep_overdue,
        super::handlers::get_audit_logs
    ),
    components(schemas(
        CreateBuyerRequest,
        AdjustBalanceRequest,
        CreateHorseRequest,
        UpdateSharesRequest,
        RecordTransactionRequest,
        PayInstallmentRequest,
        SweepRequest,
        SweepResponse,
        ErrorResponse,
        Buyer,
        Horse,
        OwnershipShare,
        ShareSpec,
        BillingPeriod,
        Installment,
        BuyerInstallment,
        PaymentStatus,
        Transaction,
        TransactionKind,
        AuditLogEntry,
        BuyerBalance,
        HorseOutstanding,
        HorseDetail
    )),
    info(
        title = "Syndibill API",
        description = "API for billing horse syndicates and reconciling buyer balances",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
