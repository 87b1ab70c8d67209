//! HandleWebhookEventHandler - Command handler for Stripe webhook deliveries.

use crate::domain::payment::{
    PaymentEventType, PaymentIntentObject, PaymentMethodObject, StripeEvent,
    StripeWebhookVerifier, WebhookError,
};

/// How incoming webhook payloads are authenticated.
#[derive(Debug, Clone)]
pub enum WebhookVerification {
    /// Every payload must carry a valid `Stripe-Signature`.
    Signed(StripeWebhookVerifier),

    /// Payloads are trusted as-is. Local development only.
    Unsigned,
}

impl WebhookVerification {
    /// Signed when a secret is present, unsigned otherwise.
    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret.filter(|s| !s.is_empty()) {
            Some(secret) => WebhookVerification::Signed(StripeWebhookVerifier::new(secret)),
            None => WebhookVerification::Unsigned,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, WebhookVerification::Signed(_))
    }

    /// Authenticates the payload (when signed) and parses the event.
    pub fn verify(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<StripeEvent, WebhookError> {
        match self {
            WebhookVerification::Signed(verifier) => {
                let signature = signature.ok_or(WebhookError::MissingSignature)?;
                verifier.verify_and_parse(payload, signature)
            }
            WebhookVerification::Unsigned => serde_json::from_slice(payload)
                .map_err(|e| WebhookError::ParseError(e.to_string())),
        }
    }
}

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleWebhookEventCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header, if sent.
    pub signature: Option<String>,
}

/// What the receiver did with an accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// `payment_intent.succeeded`: fulfil the order.
    PaymentSucceeded {
        payment_intent_id: String,
        payment_method: Option<String>,
    },
    /// `payment_intent.payment_failed`: ask for a new payment method.
    PaymentFailed {
        payment_intent_id: String,
        error_message: Option<String>,
    },
    /// `payment_method.attached`: the card is now saved on a customer.
    PaymentMethodAttached {
        payment_method_id: String,
        customer_id: Option<String>,
    },
    /// Any other event type.
    Ignored { event_type: String },
}

/// Handler for Stripe webhook deliveries.
///
/// Verifies the delivery according to the configured policy, then logs the
/// business reaction for the event types the checkout cares about.
pub struct HandleWebhookEventHandler {
    verification: WebhookVerification,
}

impl HandleWebhookEventHandler {
    pub fn new(verification: WebhookVerification) -> Self {
        Self { verification }
    }

    pub fn handle(&self, cmd: HandleWebhookEventCommand) -> Result<WebhookOutcome, WebhookError> {
        let event = self
            .verification
            .verify(&cmd.payload, cmd.signature.as_deref())
            .map_err(|e| {
                if e.is_authenticity_failure() {
                    tracing::warn!(error = %e, "Webhook signature verification failed");
                } else {
                    tracing::warn!(error = %e, "Webhook payload rejected");
                }
                e
            })?;

        let event_type = event.parsed_type();
        if event_type != PaymentEventType::Unknown {
            tracing::debug!(
                event_id = %event.id,
                event_type = event_type.as_str(),
                livemode = event.livemode,
                "Webhook event received"
            );
        }

        match event_type {
            PaymentEventType::PaymentIntentSucceeded => {
                let intent: PaymentIntentObject = parse_object(&event)?;
                tracing::info!(
                    payment_intent_id = %intent.id,
                    payment_method = %intent.payment_method.as_deref().unwrap_or(""),
                    "Payment succeeded"
                );
                Ok(WebhookOutcome::PaymentSucceeded {
                    payment_intent_id: intent.id,
                    payment_method: intent.payment_method,
                })
            }
            PaymentEventType::PaymentIntentPaymentFailed => {
                let intent: PaymentIntentObject = parse_object(&event)?;
                let error_message = intent.last_payment_error.and_then(|e| e.message);
                tracing::warn!(
                    payment_intent_id = %intent.id,
                    error_message = %error_message.as_deref().unwrap_or(""),
                    "Payment failed"
                );
                Ok(WebhookOutcome::PaymentFailed {
                    payment_intent_id: intent.id,
                    error_message,
                })
            }
            PaymentEventType::PaymentMethodAttached => {
                let method: PaymentMethodObject = parse_object(&event)?;
                tracing::info!(
                    payment_method = %method.id,
                    customer_id = %method.customer.as_deref().unwrap_or(""),
                    "Payment method attached to customer"
                );
                Ok(WebhookOutcome::PaymentMethodAttached {
                    payment_method_id: method.id,
                    customer_id: method.customer,
                })
            }
            PaymentEventType::Unknown => Ok(WebhookOutcome::Ignored {
                event_type: event.event_type,
            }),
        }
    }
}

fn parse_object<T: serde::de::DeserializeOwned>(event: &StripeEvent) -> Result<T, WebhookError> {
    event.deserialize_object().map_err(|e| {
        tracing::warn!(event_type = %event.event_type, error = %e, "Unexpected webhook data object");
        WebhookError::ParseError(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{compute_test_signature, StripeEventBuilder};
    use std::io;
    use std::sync::{Arc, Mutex};

    const SECRET: &str = "whsec_test_secret";

    /// Log sink shared with a `fmt` subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    /// Runs `f` with every event at every level written to the returned sink.
    fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs)
    }

    fn signed_command(event: &StripeEvent) -> HandleWebhookEventCommand {
        let payload = serde_json::to_string(event).unwrap();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(SECRET, timestamp, &payload);
        HandleWebhookEventCommand {
            payload: payload.into_bytes(),
            signature: Some(format!("t={},v1={}", timestamp, signature)),
        }
    }

    fn signed_handler() -> HandleWebhookEventHandler {
        HandleWebhookEventHandler::new(WebhookVerification::from_secret(Some(SECRET)))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Verification Policy
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn from_secret_chooses_policy() {
        assert!(WebhookVerification::from_secret(Some(SECRET)).is_signed());
        assert!(!WebhookVerification::from_secret(Some("")).is_signed());
        assert!(!WebhookVerification::from_secret(None).is_signed());
    }

    #[test]
    fn signed_policy_requires_header() {
        let event = StripeEventBuilder::new().build();
        let mut cmd = signed_command(&event);
        cmd.signature = None;

        let result = signed_handler().handle(cmd);

        assert!(matches!(result, Err(WebhookError::MissingSignature)));
    }

    #[test]
    fn signed_policy_rejects_wrong_secret() {
        let event = StripeEventBuilder::new().build();
        let payload = serde_json::to_string(&event).unwrap();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature("whsec_other", timestamp, &payload);

        let result = signed_handler().handle(HandleWebhookEventCommand {
            payload: payload.into_bytes(),
            signature: Some(format!("t={},v1={}", timestamp, signature)),
        });

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn signed_policy_rejects_tampered_payload() {
        let event = StripeEventBuilder::new()
            .object(serde_json::json!({"id": "pi_1", "payment_method": "pm_1"}))
            .build();
        let mut cmd = signed_command(&event);
        cmd.payload = String::from_utf8(cmd.payload)
            .unwrap()
            .replace("pm_1", "pm_2")
            .into_bytes();

        let result = signed_handler().handle(cmd);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn unsigned_policy_accepts_plain_json() {
        let handler = HandleWebhookEventHandler::new(WebhookVerification::Unsigned);
        let payload = serde_json::to_vec(
            &StripeEventBuilder::new()
                .event_type("payment_method.attached")
                .object(serde_json::json!({"id": "pm_1", "customer": "cus_1"}))
                .build(),
        )
        .unwrap();

        let outcome = handler
            .handle(HandleWebhookEventCommand {
                payload,
                signature: None,
            })
            .unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::PaymentMethodAttached {
                payment_method_id: "pm_1".to_string(),
                customer_id: Some("cus_1".to_string()),
            }
        );
    }

    #[test]
    fn unsigned_policy_rejects_invalid_json() {
        let handler = HandleWebhookEventHandler::new(WebhookVerification::Unsigned);

        let result = handler.handle(HandleWebhookEventCommand {
            payload: b"not json".to_vec(),
            signature: None,
        });

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Dispatch
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn payment_succeeded_names_payment_method() {
        let event = StripeEventBuilder::new()
            .event_type("payment_intent.succeeded")
            .object(serde_json::json!({
                "id": "pi_1",
                "object": "payment_intent",
                "amount": 1400,
                "currency": "usd",
                "payment_method": "pm_1"
            }))
            .build();

        let outcome = signed_handler().handle(signed_command(&event)).unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::PaymentSucceeded {
                payment_intent_id: "pi_1".to_string(),
                payment_method: Some("pm_1".to_string()),
            }
        );
    }

    #[test]
    fn payment_failed_reports_last_error_message() {
        let event = StripeEventBuilder::new()
            .event_type("payment_intent.payment_failed")
            .object(serde_json::json!({
                "id": "pi_2",
                "last_payment_error": {
                    "code": "card_declined",
                    "decline_code": "insufficient_funds",
                    "message": "Your card has insufficient funds."
                }
            }))
            .build();

        let outcome = signed_handler().handle(signed_command(&event)).unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::PaymentFailed {
                payment_intent_id: "pi_2".to_string(),
                error_message: Some("Your card has insufficient funds.".to_string()),
            }
        );
    }

    #[test]
    fn unknown_event_is_ignored() {
        let event = StripeEventBuilder::new()
            .event_type("customer.created")
            .object(serde_json::json!({"id": "cus_1"}))
            .build();

        let outcome = signed_handler().handle(signed_command(&event)).unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Ignored {
                event_type: "customer.created".to_string(),
            }
        );
    }

    #[test]
    fn known_event_with_wrong_object_shape_is_a_parse_error() {
        let event = StripeEventBuilder::new()
            .event_type("payment_intent.succeeded")
            .object(serde_json::json!({"amount": 1400}))
            .build();

        let result = signed_handler().handle(signed_command(&event));

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Logging
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn payment_succeeded_logs_one_line_naming_payment_method() {
        let event = StripeEventBuilder::new()
            .event_type("payment_intent.succeeded")
            .object(serde_json::json!({"id": "pi_1", "payment_method": "pm_1"}))
            .build();
        let cmd = signed_command(&event);

        let (result, logs) = capture_logs(|| signed_handler().handle(cmd));

        assert!(result.is_ok());
        let success_lines: Vec<String> = logs
            .lines()
            .into_iter()
            .filter(|line| line.contains("Payment succeeded"))
            .collect();
        assert_eq!(success_lines.len(), 1, "{:?}", logs.lines());
        assert!(success_lines[0].contains("payment_method=pm_1"));
    }

    #[test]
    fn unknown_event_logs_nothing() {
        let event = StripeEventBuilder::new()
            .event_type("invoice.created")
            .object(serde_json::json!({"id": "in_1"}))
            .build();
        let cmd = signed_command(&event);

        let (result, logs) = capture_logs(|| signed_handler().handle(cmd));

        assert!(matches!(result, Ok(WebhookOutcome::Ignored { .. })));
        assert!(logs.lines().is_empty(), "{:?}", logs.lines());
    }

    #[test]
    fn unknown_unsigned_event_logs_nothing() {
        let handler = HandleWebhookEventHandler::new(WebhookVerification::Unsigned);
        let payload = br#"{"id":"evt_1","type":"invoice.created","data":{"object":{"id":"in_1"}}}"#;

        let (result, logs) = capture_logs(|| {
            handler.handle(HandleWebhookEventCommand {
                payload: payload.to_vec(),
                signature: None,
            })
        });

        assert!(matches!(result, Ok(WebhookOutcome::Ignored { .. })));
        assert!(logs.lines().is_empty(), "{:?}", logs.lines());
    }
}
