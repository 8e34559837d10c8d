use warden_database::{AbstractHistory, Database};
use warden_models::{
    normalise_input,
    v0::{
        Category, Escalation, Evaluation, HistoryRecord, PunitiveAction, Severity, SpamSubtype,
        Violation,
    },
};
use warden_result::Result;

use crate::prompts::{self, RESULT_PREFIX};
use crate::report::parse_yes_no;
use crate::{AbstractPlatform, ModerationPolicy, Report};

/// Where a case is in the moderator conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseState {
    AwaitingMod,
    AwaitingModConfirm,
    AwaitingModClassification,
    AwaitingModSubclassification,
    AwaitingModLinkInvolve,
    AwaitingModLinkLegit,
    AwaitingModLinkSerious,
    AwaitingModMinorSpam,
    AwaitingModSeverity,
    AwaitingSecondMod,
    AwaitingSecondModConfirm,
    ModComplete,
}

impl CaseState {
    /// Human readable status for queue listings
    pub fn describe(&self) -> &'static str {
        match self {
            CaseState::AwaitingMod => "awaiting a moderator",
            CaseState::AwaitingSecondMod => "awaiting a second opinion",
            CaseState::AwaitingSecondModConfirm => "second opinion in progress",
            CaseState::ModComplete => "closed",
            _ => "under review",
        }
    }
}

/// A report under moderator review
#[derive(Debug, Clone)]
pub struct ModerationCase {
    pub report: Report,
    pub state: CaseState,
    /// Moderator currently driving the case
    pub claimant_id: Option<String>,
    /// Moderator who took the first decision
    pub first_moderator_id: Option<String>,
    /// Verdict being composed
    pub eval_type: Evaluation,
    /// Action taken when the case closed
    pub action: Option<PunitiveAction>,
}

/// What a moderator answer leads to
enum Step {
    Ask(CaseState),
    Finalize,
    Reprompt,
}

impl ModerationCase {
    pub fn new(report: Report) -> ModerationCase {
        ModerationCase {
            report,
            state: CaseState::AwaitingMod,
            claimant_id: None,
            first_moderator_id: None,
            eval_type: Evaluation::Unidentified,
            action: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.report.id
    }

    pub fn priority_score(&self) -> f64 {
        self.report.priority_score
    }

    fn auto_classification(&self) -> Evaluation {
        self.report
            .auto_classification
            .unwrap_or(Evaluation::Unidentified)
    }

    /// Everything a moderator needs to judge the case
    pub fn summary(&self, history: HistoryRecord) -> String {
        let report = &self.report;
        let mut lines = vec![
            format!("Report #{} (priority {:.2})", report.id, report.priority_score),
            format!("Reporter: {}", report.reporter_id),
        ];

        if let Some(message) = &report.reported_message {
            lines.push(format!(
                "Offender: {} ({}), reported {} times, confirmed {} times",
                message.author_name,
                message.author_id,
                history.times_reported,
                history.times_confirmed
            ));
            lines.push(format!("Message:```{}```", message.content));
        }

        if let Some(category) = report.category {
            match report.spam_subtype {
                Some(subtype) => lines.push(format!(
                    "Reported as: {} ({})",
                    category.label(),
                    subtype.token()
                )),
                None => lines.push(format!("Reported as: {}", category.label())),
            }
        }

        if report.repeat_offender == Some(true) {
            lines.push("The reporter says this is a repeat offender.".to_string());
        }

        if report.block_requested {
            lines.push("The reporter asked to block this user.".to_string());
        }

        if report.evidence.len() > 1 {
            lines.push("Evidence:".to_string());
            for (index, text) in report.evidence.iter().enumerate() {
                lines.push(format!("{}. {text}", index + 1));
            }
        }

        lines.push(format!(
            "Automatic classification: `{}`",
            self.auto_classification()
        ));

        lines.join("\n")
    }

    /// Question the claimant is currently expected to answer
    pub fn current_question(&self) -> Option<String> {
        Some(match self.state {
            CaseState::AwaitingModConfirm => {
                prompts::confirm_classification(&self.auto_classification())
            }
            CaseState::AwaitingModClassification => prompts::classification_menu(),
            CaseState::AwaitingModSubclassification => prompts::subclassification_menu(),
            CaseState::AwaitingModLinkInvolve => prompts::link_involved_question(),
            CaseState::AwaitingModLinkLegit => prompts::link_legitimate_question(),
            CaseState::AwaitingModLinkSerious => prompts::serious_spam_question(),
            CaseState::AwaitingModMinorSpam => prompts::minor_spam_question(),
            CaseState::AwaitingModSeverity => prompts::severity_question(),
            CaseState::AwaitingSecondModConfirm => prompts::second_opinion_question(
                self.first_moderator_id.as_deref().unwrap_or("unknown"),
                &self.eval_type,
            ),
            CaseState::AwaitingMod | CaseState::AwaitingSecondMod | CaseState::ModComplete => {
                return None
            }
        })
    }

    /// Hand the case to a moderator
    ///
    /// Only a case waiting for its first or second moderator can be claimed,
    /// and the second opinion must come from someone else.
    pub fn claim(&mut self, moderator_id: &str, history: HistoryRecord) -> Result<Vec<String>> {
        match self.state {
            CaseState::AwaitingMod => {
                self.claimant_id = Some(moderator_id.to_string());
                self.first_moderator_id = Some(moderator_id.to_string());
                self.state = CaseState::AwaitingModConfirm;
            }
            CaseState::AwaitingSecondMod => {
                if self.first_moderator_id.as_deref() == Some(moderator_id) {
                    return Err(create_error!(SecondOpinionConflict));
                }

                self.claimant_id = Some(moderator_id.to_string());
                self.state = CaseState::AwaitingSecondModConfirm;
            }
            _ => return Err(create_error!(ReportAlreadyClaimed)),
        }

        let mut replies = vec![self.summary(history)];
        replies.extend(self.current_question());
        Ok(replies)
    }

    /// Advance the moderator conversation by one claimant message
    pub async fn handle_message(
        &mut self,
        moderator_id: &str,
        content: &str,
        db: &Database,
        platform: &dyn AbstractPlatform,
        policy: &ModerationPolicy,
    ) -> Result<Vec<String>> {
        if self.claimant_id.as_deref() != Some(moderator_id) {
            return Err(create_error!(NotClaimant));
        }

        let input = normalise_input(content);
        let answer = parse_yes_no(&input);

        let step = match self.state {
            CaseState::AwaitingModConfirm => match answer {
                Some(true) => {
                    let auto = self.auto_classification();
                    self.eval_type = if auto.is_serious() {
                        auto.request_second_opinion()
                    } else {
                        auto
                    };

                    Step::Finalize
                }
                Some(false) => Step::Ask(CaseState::AwaitingModClassification),
                None => Step::Reprompt,
            },
            CaseState::AwaitingModClassification => {
                if input == "none" {
                    self.dismiss()
                } else {
                    match Category::from_input(&input) {
                        Some(category) => {
                            self.eval_type = Evaluation::Violation(Violation::new(category));

                            if category == Category::Spam {
                                Step::Ask(CaseState::AwaitingModSubclassification)
                            } else {
                                Step::Ask(CaseState::AwaitingModSeverity)
                            }
                        }
                        None => Step::Reprompt,
                    }
                }
            }
            CaseState::AwaitingModSubclassification => match SpamSubtype::from_input(&input) {
                Some(subtype) => {
                    self.amend(|violation| violation.with_subtype(subtype));

                    match subtype {
                        SpamSubtype::Advertising | SpamSubtype::Personal | SpamSubtype::Invites => {
                            Step::Ask(CaseState::AwaitingModLinkInvolve)
                        }
                        SpamSubtype::Links => Step::Ask(CaseState::AwaitingModLinkLegit),
                        SpamSubtype::Troll | SpamSubtype::Human | SpamSubtype::Other => {
                            Step::Ask(CaseState::AwaitingModMinorSpam)
                        }
                    }
                }
                None => Step::Reprompt,
            },
            CaseState::AwaitingModLinkInvolve => match answer {
                Some(true) => Step::Ask(CaseState::AwaitingModLinkLegit),
                Some(false) => Step::Ask(CaseState::AwaitingModLinkSerious),
                None => Step::Reprompt,
            },
            CaseState::AwaitingModLinkLegit => match answer {
                Some(true) => Step::Ask(CaseState::AwaitingModLinkSerious),
                Some(false) => self.escalate(),
                None => Step::Reprompt,
            },
            CaseState::AwaitingModLinkSerious => match answer {
                Some(true) => self.escalate(),
                Some(false) => self.dismiss(),
                None => Step::Reprompt,
            },
            CaseState::AwaitingModMinorSpam => match answer {
                Some(true) => Step::Finalize,
                Some(false) => self.dismiss(),
                None => Step::Reprompt,
            },
            CaseState::AwaitingModSeverity => match Severity::from_input(&input) {
                Some(severity) => {
                    self.amend(|violation| violation.with_severity(severity));
                    Step::Finalize
                }
                None => Step::Reprompt,
            },
            CaseState::AwaitingSecondModConfirm => match answer {
                Some(true) => {
                    self.eval_type = self.eval_type.confirm_second_opinion();
                    Step::Finalize
                }
                Some(false) => self.dismiss(),
                None => Step::Reprompt,
            },
            CaseState::AwaitingMod | CaseState::AwaitingSecondMod | CaseState::ModComplete => {
                return Ok(vec![])
            }
        };

        match step {
            Step::Ask(state) => {
                self.state = state;
                Ok(self.current_question().into_iter().collect())
            }
            Step::Reprompt => Ok(self
                .current_question()
                .map(prompts::not_understood)
                .into_iter()
                .collect()),
            Step::Finalize => self.handle_moderation(db, platform, policy).await,
        }
    }

    fn amend(&mut self, change: impl FnOnce(Violation) -> Violation) {
        if let Evaluation::Violation(violation) = self.eval_type {
            self.eval_type = Evaluation::Violation(change(violation));
        }
    }

    fn escalate(&mut self) -> Step {
        self.amend(|violation| {
            violation
                .with_severity(Severity::Serious)
                .with_escalation(Escalation::SecondOpinion)
        });

        Step::Finalize
    }

    fn dismiss(&mut self) -> Step {
        self.eval_type = Evaluation::Unidentified;
        Step::Finalize
    }

    /// Act on the composed verdict
    ///
    /// A verdict still waiting on a second opinion goes back to the queue
    /// with a priority bonus instead of being applied.
    pub async fn handle_moderation(
        &mut self,
        db: &Database,
        platform: &dyn AbstractPlatform,
        policy: &ModerationPolicy,
    ) -> Result<Vec<String>> {
        let id = self.id();

        if self.eval_type.awaits_second_opinion() {
            self.report.priority_score += policy.second_opinion_bonus;
            self.claimant_id = None;
            self.state = CaseState::AwaitingSecondMod;

            let notice = prompts::second_opinion_needed(id, self.report.priority_score);
            if let Err(error) = platform.notify_moderators(&notice).await {
                warn!("Failed to announce second opinion for report #{id}: {error}");
            }

            return Ok(vec![prompts::second_opinion_queued(id)]);
        }

        let evaluation = self.eval_type;
        let mut action = PunitiveAction::NoAction;

        let reporter_notice = match (&self.report.reported_author_id, evaluation.is_violation()) {
            (Some(offender_id), true) => {
                let record = db.increment_confirmed(offender_id).await?;

                if evaluation.is_spam() {
                    action = PunitiveAction::for_confirmed_count(
                        record.times_confirmed,
                        evaluation.is_permanent_ban(),
                    );
                } else if evaluation.is_permanent_ban() {
                    action = PunitiveAction::PermanentSuspension;
                }

                if let Some(notice) = policy.offender_notice(action) {
                    let notice = format!("{RESULT_PREFIX}{notice}");
                    if let Err(error) = platform.send_direct(offender_id, &notice).await {
                        warn!("Failed to notify offender {offender_id} of report #{id}: {error}");
                    }
                }

                if action.is_suspension() {
                    if let Some(message) = &self.report.reported_message {
                        if let Err(error) = platform.delete_message(&message.locator).await {
                            info!("Could not remove message {} of report #{id}: {error}", message.locator);
                        }
                    }
                }

                prompts::violation_found(&evaluation)
            }
            _ => prompts::no_violation(&policy.responses.no_violation, self.report.category),
        };

        if let Err(error) = platform
            .send_direct(&self.report.reporter_id, &reporter_notice)
            .await
        {
            warn!("Failed to notify reporter of report #{id}: {error}");
        }

        // The verdict is already applied, so a failed flush must not reopen the case
        self.action = Some(action);
        self.state = CaseState::ModComplete;

        if let Err(error) = db.flush_history().await {
            error!("Failed to persist history after report #{id}: {error}");
        }

        info!("Report #{id} closed as {evaluation} with action {action:?}");

        Ok(vec![prompts::case_closed(
            id,
            &evaluation,
            &policy.describe(action),
        )])
    }
}
