//! Sequential fan-out of one piece of content to a recipient snapshot.

use std::fmt::Display;
use std::future::Future;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{
    BroadcastTally, DeliveryFailure, DeliveryOutcome, RecipientKind, RecipientSource,
    StatusSurface, classify,
};
use crate::i18n::{get_text, get_text_with};

/// Operation-level broadcast failures. Per-recipient errors never end up here.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// The recipient list could not be read; nothing was sent.
    #[error("failed to enumerate recipients: {0}")]
    Enumeration(#[source] anyhow::Error),

    /// The run finished but its summary could not be shown.
    #[error("failed to present broadcast summary: {0}")]
    Summary(#[source] anyhow::Error),
}

/// Take one snapshot of `kind` recipients and deliver to each in order.
///
/// Every recipient gets exactly one `deliver` call. Blocked and failed
/// deliveries are counted and the run carries on.
pub async fn fanout<S, F, Fut, E>(
    source: &S,
    kind: RecipientKind,
    mut deliver: F,
) -> Result<BroadcastTally, BroadcastError>
where
    S: RecipientSource,
    F: FnMut(super::Recipient) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: DeliveryFailure + Display,
{
    let recipients = source
        .snapshot(kind)
        .await
        .map_err(BroadcastError::Enumeration)?;

    info!("Broadcasting to {} {}", recipients.len(), kind.audience());

    let mut tally = BroadcastTally::default();
    for recipient in recipients {
        let result = deliver(recipient).await;
        let outcome = classify(&result);
        match (&outcome, &result) {
            (DeliveryOutcome::Blocked, Err(e)) => debug!("{} blocked: {}", recipient.id, e),
            (DeliveryOutcome::Failed, Err(e)) => warn!("Delivery to {} failed: {}", recipient.id, e),
            _ => {}
        }
        tally.record(outcome);
    }

    info!(
        "Broadcast to {} finished: {} delivered, {} blocked, {} failed",
        kind.audience(),
        tally.delivered,
        tally.blocked,
        tally.failed
    );
    Ok(tally)
}

/// Full operator-facing run: placeholder, fan-out, summary.
///
/// On enumeration failure the placeholder is replaced by a distinct error
/// message and no delivery is attempted.
pub async fn run_broadcast<V, S, F, Fut, E>(
    surface: &V,
    source: &S,
    kind: RecipientKind,
    lang: &str,
    deliver: F,
) -> Result<BroadcastTally, BroadcastError>
where
    V: StatusSurface,
    S: RecipientSource,
    F: FnMut(super::Recipient) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: DeliveryFailure + Display,
{
    // Without a placeholder the summary is still sent, just not as an edit.
    let placeholder = match surface.show_placeholder(&get_text(lang, "broadcast.processing")).await {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Could not show broadcast placeholder: {}", e);
            None
        }
    };

    let outcome = fanout(source, kind, deliver).await;

    let text = match &outcome {
        Ok(tally) => tally.summary(lang, kind.audience()),
        Err(e) => get_text_with(lang, "broadcast.enumeration_failed", &[("error", &e.to_string())]),
    };

    let presented = match &placeholder {
        Some(handle) => surface.replace(handle, &text).await,
        None => surface.show_placeholder(&text).await.map(|_| ()),
    };

    let tally = outcome?;
    presented.map_err(BroadcastError::Summary)?;
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use parking_lot::Mutex;

    use super::super::Recipient;
    use super::*;

    #[derive(Debug)]
    enum FakeError {
        Forbidden,
        Network,
    }

    impl Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl DeliveryFailure for FakeError {
        fn is_recipient_blocked(&self) -> bool {
            matches!(self, FakeError::Forbidden)
        }
    }

    struct FakeSource(Result<Vec<i64>, &'static str>);

    impl RecipientSource for FakeSource {
        async fn snapshot(&self, kind: RecipientKind) -> anyhow::Result<Vec<Recipient>> {
            match &self.0 {
                Ok(ids) => Ok(ids.iter().map(|&id| Recipient { id, kind }).collect()),
                Err(e) => Err(anyhow::anyhow!(*e)),
            }
        }
    }

    #[derive(Default)]
    struct FakeSurface {
        messages: Mutex<Vec<String>>,
        fail_replace: bool,
        fail_first_placeholder: AtomicBool,
    }

    impl StatusSurface for FakeSurface {
        type Handle = usize;

        async fn show_placeholder(&self, text: &str) -> anyhow::Result<usize> {
            if self.fail_first_placeholder.swap(false, Ordering::SeqCst) {
                anyhow::bail!("chat not found");
            }
            let mut messages = self.messages.lock();
            messages.push(text.to_string());
            Ok(messages.len() - 1)
        }

        async fn replace(&self, handle: &usize, text: &str) -> anyhow::Result<()> {
            if self.fail_replace {
                anyhow::bail!("message to edit not found");
            }
            self.messages.lock()[*handle] = text.to_string();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_mixed_outcomes_scenario() {
        let source = FakeSource(Ok(vec![1, 2, 3]));
        let mut script: HashMap<i64, Option<FakeError>> = HashMap::from([
            (1, None),
            (2, Some(FakeError::Forbidden)),
            (3, Some(FakeError::Network)),
        ]);

        let tally = fanout(&source, RecipientKind::User, |r: Recipient| {
            let result = match script.remove(&r.id).flatten() {
                None => Ok(()),
                Some(e) => Err(e),
            };
            async move { result }
        })
        .await
        .unwrap();

        assert_eq!(
            tally,
            BroadcastTally { total: 3, delivered: 1, blocked: 1, failed: 1 }
        );
    }

    #[tokio::test]
    async fn test_visits_in_order_once_each() {
        let ids: Vec<i64> = (1..=25).rev().collect();
        let source = FakeSource(Ok(ids.clone()));
        let visited = Mutex::new(Vec::new());

        let tally = fanout(&source, RecipientKind::Chat, |r: Recipient| {
            visited.lock().push(r.id);
            let result = if r.id % 3 == 0 {
                Err(FakeError::Network)
            } else if r.id % 5 == 0 {
                Err(FakeError::Forbidden)
            } else {
                Ok(())
            };
            async move { result }
        })
        .await
        .unwrap();

        assert_eq!(*visited.lock(), ids);
        assert_eq!(tally.total, ids.len());
        assert_eq!(tally.total, tally.delivered + tally.blocked + tally.failed);
        assert_eq!(tally.failed, 8); // 3, 6, 9, 12, 15, 18, 21, 24
        assert_eq!(tally.blocked, 4); // 5, 10, 20, 25
        assert_eq!(tally.delivered, 13);
    }

    #[tokio::test]
    async fn test_empty_snapshot() {
        let source = FakeSource(Ok(vec![]));
        let surface = FakeSurface::default();

        let tally = run_broadcast(&surface, &source, RecipientKind::User, "en", |_r: Recipient| async {
            Ok::<(), FakeError>(())
        })
        .await
        .unwrap();

        assert_eq!(tally, BroadcastTally::default());
        let messages = surface.messages.lock();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("<b>Total users:</b> 0"));
    }

    #[tokio::test]
    async fn test_enumeration_failure_sends_nothing() {
        let source = FakeSource(Err("connection refused"));
        let surface = FakeSurface::default();
        let mut calls = 0;

        let result = run_broadcast(&surface, &source, RecipientKind::Chat, "en", |_r: Recipient| {
            calls += 1;
            async { Ok::<(), FakeError>(()) }
        })
        .await;

        assert!(matches!(result, Err(BroadcastError::Enumeration(_))));
        assert_eq!(calls, 0);
        let messages = surface.messages.lock();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("connection refused"));
    }

    #[tokio::test]
    async fn test_summary_failure_is_reported() {
        let source = FakeSource(Ok(vec![10, 20]));
        let surface = FakeSurface { fail_replace: true, ..Default::default() };

        let result = run_broadcast(&surface, &source, RecipientKind::User, "en", |_r: Recipient| async {
            Ok::<(), FakeError>(())
        })
        .await;

        assert!(matches!(result, Err(BroadcastError::Summary(_))));
    }

    #[tokio::test]
    async fn test_summary_sent_when_placeholder_fails() {
        let source = FakeSource(Ok(vec![1, 2, 3]));
        let surface = FakeSurface {
            fail_first_placeholder: AtomicBool::new(true),
            ..Default::default()
        };
        let delivered = Mutex::new(Vec::new());

        let tally = run_broadcast(&surface, &source, RecipientKind::User, "en", |r: Recipient| {
            delivered.lock().push(r.id);
            async { Ok::<(), FakeError>(()) }
        })
        .await
        .unwrap();

        assert_eq!(*delivered.lock(), vec![1, 2, 3]);
        assert_eq!(tally, BroadcastTally { total: 3, delivered: 3, blocked: 0, failed: 0 });
        let messages = surface.messages.lock();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("<b>Total users:</b> 3"));
    }
}
