use warden_models::{
    normalise_input,
    v0::{Category, Evaluation, MessageLocator, PlatformMessage, SpamSubtype},
};
use warden_result::{ErrorType, Result};

use crate::prompts::{self, CANCEL_KEYWORD, DONE_KEYWORD, HELP_KEYWORD};
use crate::AbstractPlatform;

/// Where a reporter is in the intake conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportState {
    Start,
    AwaitingLink,
    MessageIdentified,
    OffenderStatus,
    AwaitingSpamType,
    AwaitingOtherSpamSubtype,
    AwaitingMultiEvidence,
    ReceivedSpamType,
    ReportComplete,
    Cancelled,
}

impl ReportState {
    /// Whether the conversation accepts no further input
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportState::ReportComplete | ReportState::Cancelled)
    }
}

/// A report as collected from the reporter
#[derive(Debug, Clone)]
pub struct Report {
    /// Unique, increasing id
    pub id: u64,
    pub state: ReportState,
    /// Who filed the report, also where outcome notices go
    pub reporter_id: String,
    /// Snapshot of the reported message
    pub reported_message: Option<PlatformMessage>,
    /// Author of the reported message
    pub reported_author_id: Option<String>,
    /// Chosen category, set once during intake
    pub category: Option<Category>,
    pub spam_subtype: Option<SpamSubtype>,
    /// Reporter's claim that the offender has done this before
    pub repeat_offender: Option<bool>,
    /// Offending message texts, starting with the reported message
    pub evidence: Vec<String>,
    pub block_requested: bool,
    /// Classifier verdict, filled in at hand-off
    pub auto_classification: Option<Evaluation>,
    pub priority_score: f64,
}

/// Outcome of resolving a link sent by the reporter
enum Lookup {
    Found(PlatformMessage),
    Rejected(String),
}

pub(crate) fn parse_yes_no(input: &str) -> Option<bool> {
    match input {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

async fn lookup(platform: &dyn AbstractPlatform, content: &str, escape: &str) -> Result<Lookup> {
    let locator = match MessageLocator::find(content) {
        Some(locator) => locator,
        None => return Ok(Lookup::Rejected(prompts::unreadable_link(escape))),
    };

    match platform.fetch_message(&locator).await {
        Ok(message) => Ok(Lookup::Found(message)),
        Err(error) => match error.error_type {
            ErrorType::UnknownServer => Ok(Lookup::Rejected(prompts::unknown_server())),
            ErrorType::UnknownChannel => Ok(Lookup::Rejected(prompts::unknown_channel(escape))),
            ErrorType::UnknownMessage => Ok(Lookup::Rejected(prompts::unknown_message(escape))),
            _ => Err(error),
        },
    }
}

impl Report {
    pub fn new(id: u64, reporter_id: &str) -> Report {
        Report {
            id,
            state: ReportState::Start,
            reporter_id: reporter_id.to_string(),
            reported_message: None,
            reported_author_id: None,
            category: None,
            spam_subtype: None,
            repeat_offender: None,
            evidence: vec![],
            block_requested: false,
            auto_classification: None,
            priority_score: 0.0,
        }
    }

    /// Text the classifier should judge
    pub fn classification_text(&self) -> String {
        if !self.evidence.is_empty() {
            self.evidence.join("\n")
        } else {
            self.reported_message
                .as_ref()
                .map(|message| message.content.clone())
                .unwrap_or_default()
        }
    }

    /// Question the reporter is currently expected to answer
    pub fn current_question(&self) -> Option<String> {
        Some(match self.state {
            ReportState::Start | ReportState::AwaitingLink => prompts::link_request(),
            ReportState::MessageIdentified => prompts::category_menu(),
            ReportState::OffenderStatus => prompts::repeat_offender_question(),
            ReportState::AwaitingSpamType => prompts::spam_type_menu(),
            ReportState::AwaitingOtherSpamSubtype => prompts::multiple_evidence_question(),
            ReportState::AwaitingMultiEvidence => prompts::evidence_request(),
            ReportState::ReceivedSpamType => {
                prompts::block_question(self.spam_subtype.unwrap_or(SpamSubtype::Other))
            }
            ReportState::ReportComplete | ReportState::Cancelled => return None,
        })
    }

    /// Advance the intake conversation by one reporter message
    pub async fn handle_message(
        &mut self,
        platform: &dyn AbstractPlatform,
        content: &str,
    ) -> Result<Vec<String>> {
        if self.state.is_terminal() {
            return Ok(vec![]);
        }

        let input = normalise_input(content);
        if input == CANCEL_KEYWORD {
            self.state = ReportState::Cancelled;
            return Ok(vec![prompts::report_cancelled()]);
        }

        if input == HELP_KEYWORD && self.state != ReportState::Start {
            let mut replies = vec![prompts::reporter_help()];
            replies.extend(self.current_question());
            return Ok(replies);
        }

        match self.state {
            ReportState::Start => {
                self.state = ReportState::AwaitingLink;
                Ok(vec![prompts::greeting()])
            }
            ReportState::AwaitingLink => self.receive_link(platform, content).await,
            ReportState::MessageIdentified => Ok(self.receive_category(&input)),
            ReportState::OffenderStatus => Ok(match parse_yes_no(&input) {
                Some(repeat) => {
                    self.repeat_offender = Some(repeat);
                    self.state = ReportState::AwaitingSpamType;

                    if repeat {
                        vec![prompts::repeat_offender_noted(), prompts::spam_type_menu()]
                    } else {
                        vec![prompts::spam_type_menu()]
                    }
                }
                None => vec![prompts::not_understood(prompts::repeat_offender_question())],
            }),
            ReportState::AwaitingSpamType => Ok(self.receive_spam_type(&input)),
            ReportState::AwaitingOtherSpamSubtype => Ok(match parse_yes_no(&input) {
                Some(true) => {
                    if let Some(message) = &self.reported_message {
                        self.evidence = vec![message.content.clone()];
                    }

                    self.state = ReportState::AwaitingMultiEvidence;
                    vec![prompts::evidence_request()]
                }
                Some(false) => {
                    self.state = ReportState::ReceivedSpamType;
                    vec![prompts::block_question(SpamSubtype::Other)]
                }
                None => vec![prompts::not_understood(prompts::multiple_evidence_question())],
            }),
            ReportState::AwaitingMultiEvidence => {
                if input == DONE_KEYWORD {
                    self.state = ReportState::ReceivedSpamType;
                    Ok(vec![prompts::block_question(SpamSubtype::Other)])
                } else {
                    self.receive_evidence(platform, content).await
                }
            }
            ReportState::ReceivedSpamType => Ok(match parse_yes_no(&input) {
                Some(block) => {
                    self.block_requested = block;
                    self.state = ReportState::ReportComplete;

                    if block {
                        vec![prompts::block_noted(), prompts::report_submitted()]
                    } else {
                        vec![prompts::report_submitted()]
                    }
                }
                None => vec![prompts::not_understood(prompts::block_question(
                    self.spam_subtype.unwrap_or(SpamSubtype::Other),
                ))],
            }),
            ReportState::ReportComplete | ReportState::Cancelled => Ok(vec![]),
        }
    }

    async fn receive_link(
        &mut self,
        platform: &dyn AbstractPlatform,
        content: &str,
    ) -> Result<Vec<String>> {
        let message = match lookup(platform, content, CANCEL_KEYWORD).await? {
            Lookup::Found(message) => message,
            Lookup::Rejected(reply) => return Ok(vec![reply]),
        };

        if let Err(error) = self.check_reportable(&message) {
            return match error.error_type {
                ErrorType::CannotReportYourself => Ok(vec![prompts::cannot_report_yourself()]),
                _ => Err(error),
            };
        }

        let found = prompts::message_found(&message);
        self.reported_author_id = Some(message.author_id.clone());
        self.reported_message = Some(message);
        self.state = ReportState::MessageIdentified;

        Ok(vec![found, prompts::category_menu()])
    }

    fn check_reportable(&self, message: &PlatformMessage) -> Result<()> {
        if message.author_id == self.reporter_id {
            return Err(create_error!(CannotReportYourself));
        }

        Ok(())
    }

    fn receive_category(&mut self, input: &str) -> Vec<String> {
        match Category::from_input(input) {
            Some(Category::Spam) => {
                self.category = Some(Category::Spam);
                self.state = ReportState::OffenderStatus;
                vec![prompts::repeat_offender_question()]
            }
            Some(category) => {
                self.category = Some(category);
                self.state = ReportState::ReportComplete;
                vec![prompts::report_submitted()]
            }
            None => vec![prompts::not_understood(prompts::category_menu())],
        }
    }

    fn receive_spam_type(&mut self, input: &str) -> Vec<String> {
        let subtype = SpamSubtype::from_input(input)
            .filter(|subtype| SpamSubtype::REPORTABLE.contains(subtype));

        match subtype {
            Some(SpamSubtype::Other) => {
                self.spam_subtype = Some(SpamSubtype::Other);
                self.state = ReportState::AwaitingOtherSpamSubtype;
                vec![prompts::multiple_evidence_question()]
            }
            Some(subtype) => {
                self.spam_subtype = Some(subtype);
                self.state = ReportState::ReceivedSpamType;
                vec![prompts::block_question(subtype)]
            }
            None => vec![prompts::not_understood(prompts::spam_type_menu())],
        }
    }

    async fn receive_evidence(
        &mut self,
        platform: &dyn AbstractPlatform,
        content: &str,
    ) -> Result<Vec<String>> {
        let message = match lookup(platform, content, DONE_KEYWORD).await? {
            Lookup::Found(message) => message,
            Lookup::Rejected(reply) => return Ok(vec![reply]),
        };

        if self.reported_author_id.as_deref() != Some(message.author_id.as_str()) {
            return Ok(vec![prompts::different_offender()]);
        }

        self.evidence.push(message.content);
        Ok(vec![prompts::evidence_added(&self.evidence)])
    }
}
