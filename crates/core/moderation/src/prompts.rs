//! Text shown to reporters and moderators
//!
//! Every question is produced by a function of its inputs only, so invalid
//! answers re-emit the exact same question.

use warden_models::v0::{Category, Evaluation, PlatformMessage, SpamSubtype};

pub const REPORT_KEYWORD: &str = "report";
pub const CANCEL_KEYWORD: &str = "cancel";
pub const HELP_KEYWORD: &str = "help";
pub const DONE_KEYWORD: &str = "done";
pub const MODERATE_KEYWORD: &str = "moderate";

/// Prefix on every outcome notice sent to a reporter or offender
pub const RESULT_PREFIX: &str = "[Report Result]: ";

const NOT_UNDERSTOOD: &str = "I'm sorry, I didn't understand that. ";

pub fn greeting() -> String {
    format!(
        "Thank you for starting the reporting process. Say `{HELP_KEYWORD}` at any time for more information. \
         At any point, you can say `{CANCEL_KEYWORD}` to cancel the entire report.\n\n{}",
        link_request()
    )
}

pub fn link_request() -> String {
    "Please copy paste the link to the message you want to report.\n\
     You can obtain this link by right-clicking the message and clicking `Copy Message Link`."
        .to_string()
}

pub fn reporter_help() -> String {
    format!(
        "Use the `{REPORT_KEYWORD}` command to begin the reporting process.\n\
         Use the `{CANCEL_KEYWORD}` command to cancel the report process."
    )
}

pub fn report_cancelled() -> String {
    "Report cancelled.".to_string()
}

/// `escape` is the keyword that lets the user leave the current step
pub fn unreadable_link(escape: &str) -> String {
    format!(
        "I'm sorry, I couldn't read that link. Please try again or say `{escape}` to {}.",
        escape_action(escape)
    )
}

pub fn unknown_server() -> String {
    "I cannot accept reports of messages from servers that I'm not in. \
     Please have the server owner add me and try again."
        .to_string()
}

pub fn unknown_channel(escape: &str) -> String {
    format!(
        "It seems this channel was deleted or never existed. Please try again or say `{escape}` to {}.",
        escape_action(escape)
    )
}

pub fn unknown_message(escape: &str) -> String {
    format!(
        "It seems this message was deleted or never existed. Please try again or say `{escape}` to {}.",
        escape_action(escape)
    )
}

fn escape_action(escape: &str) -> &'static str {
    if escape == DONE_KEYWORD {
        "proceed with finishing the report"
    } else {
        "cancel"
    }
}

pub fn cannot_report_yourself() -> String {
    format!(
        "You cannot report your own message. \
         Please link a message sent by someone else or say `{CANCEL_KEYWORD}` to cancel."
    )
}

pub fn message_found(message: &PlatformMessage) -> String {
    format!(
        "I found this message:```{}: {}```",
        message.author_name, message.content
    )
}

pub fn category_menu() -> String {
    let options = Category::ALL
        .iter()
        .map(|category| format!("`{}` for {}", category.keyword(), category.label()))
        .collect::<Vec<_>>()
        .join(", ");

    format!("Please select the category of abuse by replying with one of: {options}.")
}

pub fn repeat_offender_question() -> String {
    "Is this a repeat offender? Reply with `yes` or `no`.".to_string()
}

pub fn repeat_offender_noted() -> String {
    "I have noted that this is a repeat offender.".to_string()
}

pub fn spam_type_menu() -> String {
    let options = SpamSubtype::REPORTABLE
        .iter()
        .map(|subtype| format!("`{}`", subtype.token()))
        .collect::<Vec<_>>()
        .join(", ");

    format!("What type of spam is this? Reply with one of: {options}.")
}

pub fn multiple_evidence_question() -> String {
    "Would you like to link more messages from this offender as evidence? Reply with `yes` or `no`."
        .to_string()
}

pub fn evidence_request() -> String {
    format!(
        "Please reply with a link to another offending message from the same offender. \
         Say `{DONE_KEYWORD}` when you have linked them all."
    )
}

pub fn evidence_added(evidence: &[String]) -> String {
    let listing = evidence
        .iter()
        .enumerate()
        .map(|(index, text)| format!("{}. {text}", index + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "I have added the message to the report. Offending messages so far:\n{listing}\n\
         Please reply with another link, or say `{DONE_KEYWORD}` to proceed with finishing the report."
    )
}

pub fn different_offender() -> String {
    format!(
        "That message was not sent by the reported user. \
         Please try again or say `{DONE_KEYWORD}` to proceed with finishing the report."
    )
}

pub fn block_question(subtype: SpamSubtype) -> String {
    format!(
        "I have noted that the spam type is `{}`. Would you like to block this user \
         and any future accounts they make? Reply with `yes` or `no`.",
        subtype.token()
    )
}

pub fn block_noted() -> String {
    "I have noted that you would like to block this user.".to_string()
}

pub fn report_submitted() -> String {
    "Thank you for reporting. Our content moderation team will review the message \
     and decide on the appropriate action."
        .to_string()
}

pub fn report_under_review(id: u64) -> String {
    format!("Your report #{id} is being reviewed by our moderators.")
}

pub fn not_understood(question: String) -> String {
    format!("{NOT_UNDERSTOOD}{question}")
}

pub fn moderator_help() -> String {
    format!(
        "Say `{MODERATE_KEYWORD}` to list the open reports, then reply with a report id to review it.\n\
         While reviewing a report, answer the questions I ask until the report is closed."
    )
}

pub fn new_case(id: u64, priority: f64) -> String {
    format!("New report #{id} is awaiting review (priority {priority:.2}). Reply with `{id}` to review it.")
}

pub fn unknown_case(id: u64) -> String {
    format!("There is no open report #{id}.")
}

pub fn case_already_claimed(id: u64) -> String {
    format!("Report #{id} is already being reviewed by another moderator.")
}

pub fn second_opinion_conflict(id: u64) -> String {
    format!("Report #{id} needs a second opinion from a different moderator.")
}

pub fn internal_failure() -> String {
    "Something went wrong while handling your message, please try again.".to_string()
}

pub fn empty_queue() -> String {
    "There are no open reports.".to_string()
}

pub fn confirm_classification(evaluation: &Evaluation) -> String {
    format!(
        "The automatic classification is `{evaluation}`. Do you agree? \
         Reply with `yes` to accept it or `no` to classify the report yourself."
    )
}

pub fn classification_menu() -> String {
    let options = Category::ALL
        .iter()
        .map(|category| format!("`{}`", category.keyword()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Which category does this message violate? Reply with one of: {options}, \
         or `none` if it does not violate any rule."
    )
}

pub fn subclassification_menu() -> String {
    let options = SpamSubtype::MODERATION
        .iter()
        .map(|subtype| format!("`{}`", subtype.token()))
        .collect::<Vec<_>>()
        .join(", ");

    format!("What kind of spam is this? Reply with one of: {options}.")
}

pub fn link_involved_question() -> String {
    "Does the message contain a link? Reply with `yes` or `no`.".to_string()
}

pub fn link_legitimate_question() -> String {
    "Is the link legitimate? Reply with `yes` or `no`.".to_string()
}

pub fn serious_spam_question() -> String {
    "Is this serious spam? Reply with `yes` or `no`.".to_string()
}

pub fn minor_spam_question() -> String {
    "Is this minor spam? Reply with `yes` or `no`.".to_string()
}

pub fn severity_question() -> String {
    "Is this violation `minor` or `serious`?".to_string()
}

pub fn second_opinion_question(first_moderator: &str, evaluation: &Evaluation) -> String {
    format!(
        "Moderator {first_moderator} classified this report as `{evaluation}` and asked for a second opinion. \
         Reply with `yes` to confirm a permanent ban or `no` to dismiss the report."
    )
}

pub fn second_opinion_queued(id: u64) -> String {
    format!(
        "Report #{id} needs a second opinion before a permanent action is taken. \
         It has been returned to the queue for another moderator."
    )
}

pub fn second_opinion_needed(id: u64, priority: f64) -> String {
    format!(
        "Report #{id} needs a second opinion (priority {priority:.2}). Reply with `{id}` to review it."
    )
}

pub fn case_closed(id: u64, evaluation: &Evaluation, action: &str) -> String {
    format!("Report #{id} closed as `{evaluation}`. Action taken: {action}.")
}

pub fn violation_found(evaluation: &Evaluation) -> String {
    format!("{RESULT_PREFIX}Our moderators found a violation: `{evaluation}`.")
}

pub fn no_violation(response: &str, category: Option<Category>) -> String {
    match category {
        Some(category) => format!("{RESULT_PREFIX}{response} (reported as: {})", category.label()),
        None => format!("{RESULT_PREFIX}{response}"),
    }
}

pub fn public_flagged(author: &str, content: &str, evaluation: &Evaluation) -> String {
    format!("Flagged message from {author}:```{content}```Evaluated as `{evaluation}`.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menus_list_every_option() {
        let menu = category_menu();
        for category in Category::ALL {
            assert!(menu.contains(category.keyword()));
        }

        let menu = subclassification_menu();
        for subtype in SpamSubtype::MODERATION {
            assert!(menu.contains(subtype.token()));
        }
    }

    #[test]
    fn evidence_listing_is_numbered() {
        let text = evidence_added(&["first".to_string(), "second".to_string()]);
        assert!(text.contains("1. first\n2. second"));
    }

    #[test]
    fn escape_keyword_changes_wording() {
        assert!(unknown_message(CANCEL_KEYWORD).ends_with("to cancel."));
        assert!(unknown_message(DONE_KEYWORD).contains("`done` to proceed"));
    }
}
