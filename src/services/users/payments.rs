use tracing::info;

use super::UserService;
use crate::errors::{Result, TutorHubError};
use crate::models::auth::Caller;
use crate::models::users::{
    entities::{PaymentRecord, User},
    requests::RecordPaymentRequest,
};
use crate::services::guard::{Access, authorize};

pub async fn record_payment(
    service: &UserService,
    caller: Option<&Caller>,
    user_id: i64,
    payment: RecordPaymentRequest,
) -> Result<User> {
    let caller = authorize(caller, Access::Admin)?;

    // 允许负数（退款 / 工资结算），不允许为零
    if !payment.amount.is_finite() || payment.amount == 0.0 {
        return Err(TutorHubError::validation(
            "Amount must be a non-zero number",
        ));
    }

    let record = PaymentRecord {
        amount: payment.amount,
        note: payment
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        recorded_at: chrono::Utc::now(),
    };

    let user = service
        .storage
        .record_payment(user_id, record)
        .await?
        .ok_or_else(|| TutorHubError::not_found(format!("User {user_id} not found")))?;

    info!(
        "Payment of {} recorded for user {} by admin {}, balance now {}",
        payment.amount, user.username, caller.id, user.balance
    );
    Ok(user)
}
