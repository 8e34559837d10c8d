use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::lock::Mutex;
use warden_classifier::AbstractClassifier;
use warden_database::{AbstractHistory, Database, DatabaseInfo};
use warden_models::{normalise_input, v0::Category};
use warden_result::{ErrorType, Result};

use crate::prompts::{self, HELP_KEYWORD, MODERATE_KEYWORD, REPORT_KEYWORD};
use crate::{
    priority_score, AbstractPlatform, CaseState, ModerationCase, ModerationPolicy, Report,
    ReportState,
};

/// Where an inbound message was posted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelContext {
    /// Direct conversation between a reporter and the bot
    Direct,
    /// Public group channel
    Public,
    /// Channel only moderators can see
    Moderation,
}

/// What a reporter currently has open
enum Session {
    Intake(Arc<Mutex<Report>>),
    UnderReview(u64),
}

/// Row of the moderation queue
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub id: u64,
    pub priority_score: f64,
    pub state: CaseState,
    pub category: Option<Category>,
    pub claimant_id: Option<String>,
}

/// Routes conversational turns to reports and moderation cases
pub struct Dispatcher {
    db: Database,
    platform: Arc<dyn AbstractPlatform>,
    classifier: Arc<dyn AbstractClassifier>,
    policy: ModerationPolicy,
    next_id: AtomicU64,
    sessions: Mutex<HashMap<String, Session>>,
    cases: Mutex<BTreeMap<u64, Arc<Mutex<ModerationCase>>>>,
    claims: Mutex<HashMap<String, u64>>,
}

impl Dispatcher {
    pub fn new(
        db: Database,
        platform: Arc<dyn AbstractPlatform>,
        classifier: Arc<dyn AbstractClassifier>,
        policy: ModerationPolicy,
    ) -> Dispatcher {
        Dispatcher {
            db,
            platform,
            classifier,
            policy,
            next_id: AtomicU64::new(1),
            sessions: Default::default(),
            cases: Default::default(),
            claims: Default::default(),
        }
    }

    /// Build a dispatcher from the configuration
    pub async fn from_config(
        platform: Arc<dyn AbstractPlatform>,
        classifier: Arc<dyn AbstractClassifier>,
    ) -> Result<Dispatcher> {
        let db = DatabaseInfo::Auto.connect().await.map_err(|error| {
            error!("{error}");
            create_database_error!("connect", "history")
        })?;

        Ok(Dispatcher::new(
            db,
            platform,
            classifier,
            ModerationPolicy::from_config().await,
        ))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Handle one inbound message and collect the replies for its channel
    ///
    /// Never fails: errors are logged and turned into a generic notice.
    pub async fn handle_turn(
        &self,
        sender_id: &str,
        context: ChannelContext,
        text: &str,
    ) -> Vec<String> {
        let result = match context {
            ChannelContext::Direct => self.handle_direct(sender_id, text).await,
            ChannelContext::Public => {
                self.screen_public(sender_id, text).await;
                Ok(vec![])
            }
            ChannelContext::Moderation => self.handle_moderator(sender_id, text).await,
        };

        match result {
            Ok(replies) => replies,
            Err(error) => {
                error!("Failed to handle message from {sender_id}: {error}");
                vec![prompts::internal_failure()]
            }
        }
    }

    async fn handle_direct(&self, reporter_id: &str, text: &str) -> Result<Vec<String>> {
        let input = normalise_input(text);

        let report = {
            let mut sessions = self.sessions.lock().await;
            match sessions.get(reporter_id) {
                Some(Session::Intake(report)) => report.clone(),
                Some(Session::UnderReview(id)) => {
                    return Ok(if input == HELP_KEYWORD {
                        vec![prompts::reporter_help()]
                    } else {
                        vec![prompts::report_under_review(*id)]
                    });
                }
                None => {
                    if input == HELP_KEYWORD {
                        return Ok(vec![prompts::reporter_help()]);
                    }

                    if !input.starts_with(REPORT_KEYWORD) {
                        return Ok(vec![]);
                    }

                    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                    let report = Arc::new(Mutex::new(Report::new(id, reporter_id)));
                    sessions.insert(reporter_id.to_string(), Session::Intake(report.clone()));
                    report
                }
            }
        };

        let mut report = report.lock().await;
        if report.state.is_terminal() {
            return Ok(vec![]);
        }

        let replies = report.handle_message(self.platform.as_ref(), text).await?;
        debug!("Report #{} from {reporter_id} is now {:?}", report.id, report.state);

        match report.state {
            ReportState::Cancelled => {
                self.sessions.lock().await.remove(reporter_id);
            }
            ReportState::ReportComplete => {
                if let Err(error) = self.hand_off(&mut report).await {
                    self.sessions.lock().await.remove(reporter_id);
                    return Err(error);
                }
            }
            _ => {}
        }

        Ok(replies)
    }

    /// Move a completed report into the moderation queue
    ///
    /// The reporter's session is switched to review before the case becomes
    /// visible, so a case closing right away always finds it.
    async fn hand_off(&self, report: &mut Report) -> Result<()> {
        let offender_id = report
            .reported_author_id
            .clone()
            .ok_or_else(|| create_error!(InternalError))?;

        let evaluation = self
            .classifier
            .classify(&report.classification_text())
            .await;

        let history = self.db.increment_reported(&offender_id).await?;
        if let Err(error) = self.db.flush_history().await {
            error!("Failed to persist history for report #{}: {error}", report.id);
        }

        report.auto_classification = Some(evaluation);
        report.priority_score = priority_score(&self.policy.weights, &evaluation, history);

        let id = report.id;
        let priority = report.priority_score;
        self.sessions
            .lock()
            .await
            .insert(report.reporter_id.clone(), Session::UnderReview(id));
        self.cases
            .lock()
            .await
            .insert(id, Arc::new(Mutex::new(ModerationCase::new(report.clone()))));

        info!("Report #{id} against {offender_id} queued as {evaluation} with priority {priority:.2}");

        if let Err(error) = self
            .platform
            .notify_moderators(&prompts::new_case(id, priority))
            .await
        {
            warn!("Failed to announce report #{id}: {error}");
        }

        Ok(())
    }

    /// Forward flagged public messages to the moderators
    async fn screen_public(&self, author_id: &str, text: &str) {
        if !self.policy.screen_public_messages {
            return;
        }

        let evaluation = self.classifier.classify(text).await;
        if !evaluation.is_violation() {
            return;
        }

        debug!("Public message from {author_id} flagged as {evaluation}");
        if let Err(error) = self
            .platform
            .notify_moderators(&prompts::public_flagged(author_id, text, &evaluation))
            .await
        {
            warn!("Failed to forward flagged message from {author_id}: {error}");
        }
    }

    async fn handle_moderator(&self, moderator_id: &str, text: &str) -> Result<Vec<String>> {
        let input = normalise_input(text);
        if input == HELP_KEYWORD {
            return Ok(vec![prompts::moderator_help()]);
        }

        let claimed = self.claims.lock().await.get(moderator_id).copied();
        if let Some(id) = claimed {
            if input == MODERATE_KEYWORD {
                return Ok(self.resume_case(id).await);
            }

            return self.continue_case(moderator_id, id, text).await;
        }

        if input == MODERATE_KEYWORD {
            return Ok(vec![self.render_queue().await]);
        }

        match input.trim_start_matches('#').parse::<u64>() {
            Ok(id) => self.claim_case(moderator_id, id).await,
            Err(_) => Ok(vec![]),
        }
    }

    async fn claim_case(&self, moderator_id: &str, id: u64) -> Result<Vec<String>> {
        let case = self.cases.lock().await.get(&id).cloned();
        let case = match case {
            Some(case) => case,
            None => return Ok(vec![prompts::unknown_case(id)]),
        };

        let mut case = case.lock().await;
        let history = match &case.report.reported_author_id {
            Some(offender_id) => self.db.fetch_history(offender_id).await?,
            None => Default::default(),
        };

        match case.claim(moderator_id, history) {
            Ok(replies) => {
                self.claims
                    .lock()
                    .await
                    .insert(moderator_id.to_string(), id);

                info!("Moderator {moderator_id} claimed report #{id}");
                Ok(replies)
            }
            Err(error) => match error.error_type {
                ErrorType::ReportAlreadyClaimed => Ok(vec![prompts::case_already_claimed(id)]),
                ErrorType::SecondOpinionConflict => Ok(vec![prompts::second_opinion_conflict(id)]),
                _ => Err(error),
            },
        }
    }

    async fn resume_case(&self, id: u64) -> Vec<String> {
        let case = self.cases.lock().await.get(&id).cloned();
        match case {
            Some(case) => case.lock().await.current_question().into_iter().collect(),
            None => vec![prompts::unknown_case(id)],
        }
    }

    async fn continue_case(
        &self,
        moderator_id: &str,
        id: u64,
        text: &str,
    ) -> Result<Vec<String>> {
        let case = self.cases.lock().await.get(&id).cloned();
        let case = match case {
            Some(case) => case,
            None => {
                self.claims.lock().await.remove(moderator_id);
                return Ok(vec![prompts::unknown_case(id)]);
            }
        };

        let mut case = case.lock().await;
        let replies = case
            .handle_message(
                moderator_id,
                text,
                &self.db,
                self.platform.as_ref(),
                &self.policy,
            )
            .await?;
        debug!("Report #{id} under {moderator_id} is now {:?}", case.state);

        match case.state {
            CaseState::AwaitingSecondMod => {
                self.claims.lock().await.remove(moderator_id);
            }
            CaseState::ModComplete => {
                self.claims.lock().await.remove(moderator_id);
                self.cases.lock().await.remove(&id);
                self.close_report(&case.report).await;
            }
            _ => {}
        }

        Ok(replies)
    }

    /// Forget a reporter's finished report and let them know
    async fn close_report(&self, report: &Report) {
        {
            let mut sessions = self.sessions.lock().await;
            if matches!(
                sessions.get(&report.reporter_id),
                Some(Session::UnderReview(id)) if *id == report.id
            ) {
                sessions.remove(&report.reporter_id);
            }
        }

        if let Err(error) = self
            .platform
            .send_direct(&report.reporter_id, &self.policy.responses.report_complete)
            .await
        {
            warn!("Failed to tell reporter report #{} is complete: {error}", report.id);
        }
    }

    /// Open cases, highest priority first
    ///
    /// Cases with equal priority keep their creation order.
    pub async fn queue(&self) -> Vec<QueueEntry> {
        let cases: Vec<_> = self.cases.lock().await.values().cloned().collect();

        let mut entries = Vec::with_capacity(cases.len());
        for case in cases {
            let case = case.lock().await;
            entries.push(QueueEntry {
                id: case.id(),
                priority_score: case.priority_score(),
                state: case.state,
                category: case.report.category,
                claimant_id: case.claimant_id.clone(),
            });
        }

        entries.sort_by(|a, b| {
            b.priority_score
                .partial_cmp(&a.priority_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        entries
    }

    async fn render_queue(&self) -> String {
        let entries = self.queue().await;
        if entries.is_empty() {
            return prompts::empty_queue();
        }

        let mut lines = vec!["Open reports by priority:".to_string()];
        for entry in entries {
            let category = entry
                .category
                .map(|category| format!(" [{}]", category.label()))
                .unwrap_or_default();

            lines.push(format!(
                "#{} priority {:.2}, {}{category}",
                entry.id,
                entry.priority_score,
                entry.state.describe()
            ));
        }

        lines.push("Reply with a report id to review it.".to_string());
        lines.join("\n")
    }

    /// State of the report a reporter is filing or waiting on
    pub async fn report_state(&self, reporter_id: &str) -> Option<ReportState> {
        let report = match self.sessions.lock().await.get(reporter_id) {
            Some(Session::Intake(report)) => report.clone(),
            Some(Session::UnderReview(_)) => return Some(ReportState::ReportComplete),
            None => return None,
        };

        let state = report.lock().await.state;
        Some(state)
    }

    /// Snapshot of an open case
    pub async fn case(&self, id: u64) -> Option<ModerationCase> {
        let case = self.cases.lock().await.get(&id).cloned()?;
        let case = case.lock().await.clone();
        Some(case)
    }

    /// Case a moderator is currently driving
    pub async fn claimed_case(&self, moderator_id: &str) -> Option<u64> {
        self.claims.lock().await.get(moderator_id).copied()
    }
}
