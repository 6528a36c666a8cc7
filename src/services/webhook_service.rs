use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    ledger::PaidTransition,
    state::AppState,
    webhook::{self, PaymentEvent},
};

/// Reconcile one payment notification against the order ledger.
///
/// Only a bad signature is an error the caller sees. Everything past
/// verification is acknowledged regardless of business outcome: the provider
/// delivers at least once and retries whatever is not acknowledged, and it
/// has no business knowing whether the referenced order exists or was
/// already paid.
pub async fn handle_notification(
    state: &AppState,
    payload: &str,
    signature: Option<&str>,
) -> AppResult<()> {
    let header = signature.ok_or(AppError::SignatureInvalid)?;
    webhook::verify_signature(payload, header, &state.payment.webhook_secret, Utc::now())?;

    let event = match webhook::decode_event(payload) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(error = %err, "acknowledging undecodable webhook payload");
            return Ok(());
        }
    };

    match event {
        PaymentEvent::Ignored { event_type } => {
            tracing::debug!(%event_type, "ignoring webhook event type");
        }
        PaymentEvent::CheckoutSessionCompleted {
            client_reference_id,
        } => {
            let Some(reference) = client_reference_id else {
                tracing::warn!("completed session without client reference id");
                return Ok(());
            };
            let Ok(order_id) = Uuid::parse_str(&reference) else {
                tracing::warn!(%reference, "client reference id is not an order id");
                return Ok(());
            };

            match state.ledger.mark_paid(order_id).await? {
                PaidTransition::Applied => {
                    tracing::info!(%order_id, "order marked paid");
                }
                PaidTransition::AlreadyPaid => {
                    tracing::debug!(%order_id, "duplicate completion event for paid order");
                }
                PaidTransition::UnknownOrder => {
                    tracing::warn!(%order_id, "completion event for unknown order");
                }
            }
        }
    }

    Ok(())
}
