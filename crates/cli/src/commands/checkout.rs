//! Checkout command: pay for the cart and verify the payment.

use chrono::Utc;
use simple_cart_core::checkout::{
    CheckoutBridge, CheckoutConfig, CheckoutForm, CheckoutOutcome, HttpVerificationClient,
};
use simple_cart_core::view::SurfaceKind;

use super::Session;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::widget::TerminalPaymentWidget;

/// Shown after a verified payment, in place of the thank-you page.
const THANK_YOU: &str = "Thank you for your order!";

/// Run one checkout attempt and return the text to show afterwards.
///
/// # Errors
///
/// Returns an error if the public key is not configured, the verify URL is
/// invalid, the terminal fails, or the cart cannot be cleared after payment.
pub async fn run(config: &CliConfig, form: &CheckoutForm) -> Result<String, CliError> {
    let mut session = Session::open(config, &[SurfaceKind::Checkout]);
    let summary = session.screen();

    let checkout_config = CheckoutConfig {
        public_key: config.require_public_key()?.to_string(),
        currency: config.currency,
        delivery_fee: config.delivery_fee,
    };
    let verifier = HttpVerificationClient::new(&config.verify_url)?;
    let bridge = CheckoutBridge::new(checkout_config, TerminalPaymentWidget, verifier);

    let outcome = bridge
        .place_order(session.store(), form, Utc::now())
        .await?;

    Ok(format!("{summary}{}\n", outcome_message(&outcome)))
}

fn outcome_message(outcome: &CheckoutOutcome) -> String {
    match outcome {
        CheckoutOutcome::Confirmed { reference } => {
            format!("{THANK_YOU} Payment reference: {reference}")
        }
        CheckoutOutcome::EmptyCart => "Nothing to pay for.".to_string(),
        other => other.notice().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use simple_cart_core::PaymentReference;

    use super::*;

    #[test]
    fn test_outcome_messages() {
        let confirmed = CheckoutOutcome::Confirmed {
            reference: PaymentReference::from_provider("ORDER-42"),
        };
        assert_eq!(
            outcome_message(&confirmed),
            "Thank you for your order! Payment reference: ORDER-42"
        );
        assert_eq!(
            outcome_message(&CheckoutOutcome::Cancelled),
            "Payment window closed."
        );
        assert_eq!(
            outcome_message(&CheckoutOutcome::NetworkError {
                reference: PaymentReference::from_provider("ORDER-42"),
            }),
            "Network error verifying payment."
        );
    }
}
