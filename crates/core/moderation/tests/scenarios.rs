use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use warden_classifier::{
    AbstractClassifier, ChatMessage, Classifier, CompletionBackend, RetryPolicy, TransportError,
};
use warden_database::{AbstractHistory, DatabaseInfo};
use warden_models::v0::{
    Category, Evaluation, HistoryRecord, MessageLocator, PlatformMessage, Severity, SpamSubtype,
};
use warden_moderation::{
    prompts, CaseState, ChannelContext, Dispatcher, ModerationPolicy, ReferencePlatform,
    ReportState,
};

/// Classifier that always returns the same verdict
struct FixedClassifier(Evaluation);

#[async_trait]
impl AbstractClassifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Evaluation {
        self.0
    }
}

fn serious_spam() -> Evaluation {
    Evaluation::violation(
        Category::Spam,
        Some(SpamSubtype::Advertising),
        Severity::Serious,
    )
}

fn minor_spam() -> Evaluation {
    Evaluation::violation(
        Category::Spam,
        Some(SpamSubtype::Advertising),
        Severity::Minor,
    )
}

async fn seeded_platform() -> ReferencePlatform {
    let platform = ReferencePlatform::default();
    for (message_id, author, content) in [
        (10, "spammer", "buy cheap followers at example.com"),
        (11, "spammer", "followers on sale, today only"),
        (12, "other-spammer", "join my server for free nitro"),
        (13, "spammer", "last chance for cheap followers"),
    ] {
        platform
            .insert_message(PlatformMessage {
                locator: MessageLocator {
                    server_id: 1,
                    channel_id: 2,
                    message_id,
                },
                author_id: author.to_string(),
                author_name: author.to_string(),
                content: content.to_string(),
            })
            .await;
    }

    platform
}

async fn setup(classifier: Arc<dyn AbstractClassifier>) -> (Dispatcher, ReferencePlatform) {
    let platform = seeded_platform().await;
    let db = DatabaseInfo::Reference
        .connect()
        .await
        .expect("reference database");

    let dispatcher = Dispatcher::new(
        db,
        Arc::new(platform.clone()),
        classifier,
        ModerationPolicy::from_config().await,
    );

    (dispatcher, platform)
}

async fn say(
    dispatcher: &Dispatcher,
    sender: &str,
    context: ChannelContext,
    inputs: &[&str],
) -> Vec<String> {
    let mut last = vec![];
    for input in inputs {
        last = dispatcher.handle_turn(sender, context, input).await;
    }

    last
}

async fn file_spam_report(dispatcher: &Dispatcher, reporter: &str, link: &str) -> Vec<String> {
    say(
        dispatcher,
        reporter,
        ChannelContext::Direct,
        &["report", link, "spam", "no", "advertising", "no"],
    )
    .await
}

#[tokio::test]
async fn spam_report_is_handed_off_with_priority() {
    let (dispatcher, platform) = setup(Arc::new(FixedClassifier(serious_spam()))).await;

    let replies = file_spam_report(&dispatcher, "reporter", "https://chat.example/1/2/10").await;

    assert_eq!(replies, vec![prompts::report_submitted()]);
    assert_eq!(
        dispatcher.report_state("reporter").await,
        Some(ReportState::ReportComplete)
    );

    let case = dispatcher.case(1).await.expect("case was opened");
    assert_eq!(case.state, CaseState::AwaitingMod);
    assert_eq!(case.report.auto_classification, Some(serious_spam()));
    assert!((case.priority_score() - 1.1).abs() < 1e-9);

    assert_eq!(
        dispatcher
            .database()
            .fetch_history("spammer")
            .await
            .expect("history"),
        HistoryRecord::new(1, 0)
    );
    assert_eq!(
        platform.moderator_notices().await,
        vec![prompts::new_case(1, case.priority_score())]
    );

    let replies = say(&dispatcher, "reporter", ChannelContext::Direct, &["hello?"]).await;
    assert_eq!(replies, vec![prompts::report_under_review(1)]);
}

#[tokio::test]
async fn second_opinion_ends_in_permanent_ban() {
    let (dispatcher, platform) = setup(Arc::new(FixedClassifier(serious_spam()))).await;
    let policy = ModerationPolicy::from_config().await;

    file_spam_report(&dispatcher, "reporter", "/1/2/10").await;

    say(&dispatcher, "alice", ChannelContext::Moderation, &["1"]).await;
    let replies = say(&dispatcher, "alice", ChannelContext::Moderation, &["yes"]).await;
    assert_eq!(replies, vec![prompts::second_opinion_queued(1)]);

    let case = dispatcher.case(1).await.expect("case still open");
    assert_eq!(case.state, CaseState::AwaitingSecondMod);
    assert!((case.priority_score() - 11.1).abs() < 1e-9);
    assert_eq!(dispatcher.claimed_case("alice").await, None);

    let replies = say(&dispatcher, "alice", ChannelContext::Moderation, &["1"]).await;
    assert_eq!(replies, vec![prompts::second_opinion_conflict(1)]);

    say(&dispatcher, "bob", ChannelContext::Moderation, &["#1", "yes"]).await;

    assert!(dispatcher.case(1).await.is_none());
    assert_eq!(dispatcher.report_state("reporter").await, None);
    assert_eq!(
        dispatcher
            .database()
            .fetch_history("spammer")
            .await
            .expect("history"),
        HistoryRecord::new(1, 1)
    );

    let offender = platform.direct_messages("spammer").await;
    assert_eq!(
        offender,
        vec![format!(
            "{}{}",
            prompts::RESULT_PREFIX,
            policy.responses.permanent_suspension
        )]
    );

    let reporter = platform.direct_messages("reporter").await;
    assert_eq!(
        reporter,
        vec![
            prompts::violation_found(
                &serious_spam()
                    .request_second_opinion()
                    .confirm_second_opinion()
            ),
            policy.responses.report_complete.clone(),
        ]
    );
}

#[tokio::test]
async fn confirmed_spam_escalates_with_history() {
    let (dispatcher, platform) = setup(Arc::new(FixedClassifier(minor_spam()))).await;
    let policy = ModerationPolicy::from_config().await;

    for (reporter, link) in [
        ("reporter-a", "/1/2/10"),
        ("reporter-b", "/1/2/11"),
        ("reporter-c", "/1/2/13"),
    ] {
        file_spam_report(&dispatcher, reporter, link).await;

        let id = dispatcher.queue().await[0].id.to_string();
        say(
            &dispatcher,
            "alice",
            ChannelContext::Moderation,
            &[id.as_str(), "yes"],
        )
        .await;
    }

    let notices: Vec<String> = [
        &policy.responses.short_suspension,
        &policy.responses.long_suspension,
        &policy.responses.permanent_suspension,
    ]
    .iter()
    .map(|response| format!("{}{response}", prompts::RESULT_PREFIX))
    .collect();

    assert_eq!(platform.direct_messages("spammer").await, notices);
    assert_eq!(platform.deleted_messages().await.len(), 3);
    assert!(dispatcher.queue().await.is_empty());
}

#[tokio::test]
async fn queue_is_sorted_stably_and_read_only() {
    let (dispatcher, _) = setup(Arc::new(FixedClassifier(minor_spam()))).await;

    file_spam_report(&dispatcher, "reporter-a", "/1/2/10").await;
    file_spam_report(&dispatcher, "reporter-b", "/1/2/12").await;
    file_spam_report(&dispatcher, "reporter-c", "/1/2/11").await;

    let first = dispatcher.queue().await;
    let second = dispatcher.queue().await;

    let ids: Vec<u64> = first.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.priority_score, b.priority_score);
        assert_eq!(a.state, CaseState::AwaitingMod);
        assert_eq!(b.state, CaseState::AwaitingMod);
    }

    let listing = say(&dispatcher, "alice", ChannelContext::Moderation, &["moderate"]).await;
    assert!(listing[0].starts_with("Open reports by priority:\n#3 priority 0.70"));
}

#[tokio::test]
async fn concurrent_claims_have_one_winner() {
    let (dispatcher, _) = setup(Arc::new(FixedClassifier(minor_spam()))).await;

    file_spam_report(&dispatcher, "reporter", "/1/2/10").await;

    say(&dispatcher, "alice", ChannelContext::Moderation, &["1"]).await;
    let replies = say(&dispatcher, "bob", ChannelContext::Moderation, &["1"]).await;

    assert_eq!(replies, vec![prompts::case_already_claimed(1)]);
    assert_eq!(dispatcher.claimed_case("alice").await, Some(1));
    assert_eq!(dispatcher.claimed_case("bob").await, None);

    let case = dispatcher.case(1).await.expect("case");
    assert_eq!(case.state, CaseState::AwaitingModConfirm);
}

#[tokio::test]
async fn cancelled_report_never_reaches_moderation() {
    let (dispatcher, platform) = setup(Arc::new(FixedClassifier(minor_spam()))).await;

    let replies = say(
        &dispatcher,
        "reporter",
        ChannelContext::Direct,
        &["report", "/1/2/10", "spam", "yes", "cancel"],
    )
    .await;

    assert_eq!(replies, vec![prompts::report_cancelled()]);
    assert_eq!(dispatcher.report_state("reporter").await, None);
    assert!(dispatcher.queue().await.is_empty());
    assert!(platform.moderator_notices().await.is_empty());

    let replies = say(&dispatcher, "reporter", ChannelContext::Direct, &["hello"]).await;
    assert!(replies.is_empty());
}

#[tokio::test]
async fn public_messages_are_screened() {
    let (dispatcher, platform) = setup(Arc::new(FixedClassifier(serious_spam()))).await;

    let replies = say(
        &dispatcher,
        "stranger",
        ChannelContext::Public,
        &["cheap followers here"],
    )
    .await;

    assert!(replies.is_empty());
    assert_eq!(
        platform.moderator_notices().await,
        vec![prompts::public_flagged(
            "stranger",
            "cheap followers here",
            &serious_spam()
        )]
    );
}

/// Backend that is always rate limited
#[derive(Default)]
struct RateLimitedBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionBackend for RateLimitedBackend {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TransportError::RateLimited)
    }
}

/// Fallback that counts how often it runs
#[derive(Default)]
struct CountingFallback {
    calls: AtomicUsize,
}

#[async_trait]
impl AbstractClassifier for CountingFallback {
    async fn classify(&self, _text: &str) -> Evaluation {
        self.calls.fetch_add(1, Ordering::SeqCst);
        minor_spam()
    }
}

#[tokio::test]
async fn unavailable_classifier_falls_back_once() {
    let backend = Arc::new(RateLimitedBackend::default());
    let fallback = Arc::new(CountingFallback::default());
    let classifier = Classifier::new(
        Some(backend.clone()),
        fallback.clone(),
        RetryPolicy {
            max_attempts: 5,
            backoff: Duration::ZERO,
        },
    );

    let (dispatcher, _) = setup(Arc::new(classifier)).await;
    file_spam_report(&dispatcher, "reporter", "/1/2/10").await;

    assert_eq!(backend.calls.load(Ordering::SeqCst), 5);
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);

    let case = dispatcher.case(1).await.expect("case");
    assert_eq!(case.report.auto_classification, Some(minor_spam()));
}
