//! Terminal stand-in for the hosted payment widget.
//!
//! Prints the payment request the widget would be opened with, then waits for
//! the customer to finish paying on the provider's side and report back.

use async_trait::async_trait;
use simple_cart_core::PaymentReference;
use simple_cart_core::checkout::{CheckoutError, PaymentRequest, PaymentWidget, WidgetOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Payment widget driven from stdin/stdout.
#[derive(Debug, Default)]
pub struct TerminalPaymentWidget;

#[async_trait]
impl PaymentWidget for TerminalPaymentWidget {
    async fn open(&self, request: &PaymentRequest) -> Result<WidgetOutcome, CheckoutError> {
        let payload = serde_json::to_string_pretty(request)
            .map_err(|e| CheckoutError::Widget(e.to_string()))?;

        let mut stdout = tokio::io::stdout();
        let prompt = format!(
            "Payment request:\n{payload}\n\n\
             Complete the payment, then press Enter (or paste the provider's reference).\n\
             Type 'cancel' to close the payment window.\n> "
        );
        stdout
            .write_all(prompt.as_bytes())
            .await
            .map_err(|e| CheckoutError::Widget(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| CheckoutError::Widget(e.to_string()))?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|e| CheckoutError::Widget(e.to_string()))?;

        // EOF closes the window like the close button
        if read == 0 {
            return Ok(WidgetOutcome::Closed);
        }
        Ok(interpret_answer(&line, request))
    }
}

/// Map the customer's answer to a widget outcome.
///
/// Empty input means the payment went through under the generated
/// reference; any other text except `cancel` is the reference the provider
/// reported.
fn interpret_answer(line: &str, request: &PaymentRequest) -> WidgetOutcome {
    match line.trim() {
        "" => WidgetOutcome::Completed {
            reference: request.reference.clone(),
        },
        answer if answer.eq_ignore_ascii_case("cancel") || answer.eq_ignore_ascii_case("c") => {
            WidgetOutcome::Closed
        }
        answer => WidgetOutcome::Completed {
            reference: PaymentReference::from_provider(answer),
        },
    }
}
