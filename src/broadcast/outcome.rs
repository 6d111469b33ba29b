//! Delivery outcome classification.
//!
//! This is the only place that looks inside a transport error to decide
//! whether the recipient blocked or removed the bot.

use teloxide::{ApiError, RequestError};

/// Result of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Message accepted by Telegram.
    Delivered,
    /// Recipient blocked the bot, kicked it or no longer exists.
    Blocked,
    /// Any other failure (network, rate limit, bad content, timeout...).
    Failed,
}

/// Errors that can tell whether the recipient refused delivery.
pub trait DeliveryFailure {
    /// True when the failure means "recipient blocked/removed the bot".
    fn is_recipient_blocked(&self) -> bool;
}

impl DeliveryFailure for RequestError {
    fn is_recipient_blocked(&self) -> bool {
        match self {
            RequestError::Api(api) => is_forbidden(api),
            _ => false,
        }
    }
}

impl DeliveryFailure for anyhow::Error {
    fn is_recipient_blocked(&self) -> bool {
        self.downcast_ref::<RequestError>()
            .is_some_and(DeliveryFailure::is_recipient_blocked)
    }
}

/// Telegram reports these with status 403 ("Forbidden: ...").
fn is_forbidden(err: &ApiError) -> bool {
    match err {
        ApiError::BotBlocked
        | ApiError::BotKicked
        | ApiError::BotKickedFromSupergroup
        | ApiError::UserDeactivated
        | ApiError::CantInitiateConversation
        | ApiError::CantTalkWithBots => true,
        ApiError::Unknown(description) => description.starts_with("Forbidden"),
        other => other.to_string().starts_with("Forbidden"),
    }
}

/// Map the result of one delivery attempt to exactly one outcome.
pub fn classify<T, E: DeliveryFailure>(result: &Result<T, E>) -> DeliveryOutcome {
    match result {
        Ok(_) => DeliveryOutcome::Delivered,
        Err(e) if e.is_recipient_blocked() => DeliveryOutcome::Blocked,
        Err(_) => DeliveryOutcome::Failed,
    }
}

#[cfg(test)]
mod tests {

    use teloxide::types::Seconds;

    use super::*;

    fn api(err: ApiError) -> Result<(), RequestError> {
        Err(RequestError::Api(err))
    }

    #[test]
    fn test_success_is_delivered() {
        let ok: Result<u32, RequestError> = Ok(1);
        assert_eq!(classify(&ok), DeliveryOutcome::Delivered);
    }

    #[test]
    fn test_forbidden_is_blocked() {
        assert_eq!(classify(&api(ApiError::BotBlocked)), DeliveryOutcome::Blocked);
        assert_eq!(classify(&api(ApiError::BotKicked)), DeliveryOutcome::Blocked);
        assert_eq!(classify(&api(ApiError::UserDeactivated)), DeliveryOutcome::Blocked);
        assert_eq!(
            classify(&api(ApiError::Unknown(
                "Forbidden: bot is not a member of the channel chat".to_string()
            ))),
            DeliveryOutcome::Blocked
        );
    }

    #[test]
    fn test_other_errors_are_failed() {
        assert_eq!(classify(&api(ApiError::ChatNotFound)), DeliveryOutcome::Failed);
        assert_eq!(classify(&api(ApiError::MessageTextIsEmpty)), DeliveryOutcome::Failed);
        assert_eq!(
            classify(&api(ApiError::Unknown("Bad Request: can't parse entities".to_string()))),
            DeliveryOutcome::Failed
        );
    }

    #[test]
    fn test_unknown_error_shape_is_failed() {
        let err: Result<(), anyhow::Error> = Err(anyhow::anyhow!("connection reset"));
        assert_eq!(classify(&err), DeliveryOutcome::Failed);

        let wrapped: Result<(), anyhow::Error> =
            Err(anyhow::Error::new(RequestError::Api(ApiError::BotBlocked)));
        assert_eq!(classify(&wrapped), DeliveryOutcome::Blocked);
    }

    #[test]
    fn test_rate_limit_and_network_errors_are_failed() {
        let retry: Result<(), RequestError> =
            Err(RequestError::RetryAfter(Seconds::from_seconds(5)));
        assert_eq!(classify(&retry), DeliveryOutcome::Failed);

        let io: Result<(), RequestError> = Err(RequestError::Io(
            std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
        ));
        assert_eq!(classify(&io), DeliveryOutcome::Failed);
    }
}
