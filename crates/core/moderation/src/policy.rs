use std::time::Duration;

use warden_config::{config, Responses};
use warden_models::v0::PunitiveAction;

use crate::PriorityWeights;

/// Knobs of the moderation flow
#[derive(Debug, Clone)]
pub struct ModerationPolicy {
    pub weights: PriorityWeights,
    /// Added to a case's priority when it goes back for a second opinion
    pub second_opinion_bonus: f64,
    pub short_suspension: Duration,
    pub long_suspension: Duration,
    /// Run the classifier over messages posted in public channels
    pub screen_public_messages: bool,
    pub responses: Responses,
}

impl ModerationPolicy {
    pub async fn from_config() -> ModerationPolicy {
        let config = config().await;
        let moderation = config.moderation;

        ModerationPolicy {
            weights: PriorityWeights {
                auto: moderation.weights.auto,
                confirmed: moderation.weights.confirmed,
                reported: moderation.weights.reported,
            },
            second_opinion_bonus: moderation.second_opinion_bonus,
            short_suspension: Duration::from_secs(moderation.short_suspension_hours * 3600),
            long_suspension: Duration::from_secs(moderation.long_suspension_hours * 3600),
            screen_public_messages: moderation.screen_public_messages,
            responses: config.responses,
        }
    }

    /// Notice sent to the offender for the given action
    pub fn offender_notice(&self, action: PunitiveAction) -> Option<&str> {
        match action {
            PunitiveAction::NoAction => None,
            PunitiveAction::ShortSuspension => Some(&self.responses.short_suspension),
            PunitiveAction::LongSuspension => Some(&self.responses.long_suspension),
            PunitiveAction::PermanentSuspension => Some(&self.responses.permanent_suspension),
        }
    }

    /// Describe the action for the moderator closing a case
    pub fn describe(&self, action: PunitiveAction) -> String {
        match action {
            PunitiveAction::NoAction => "none".to_string(),
            PunitiveAction::ShortSuspension => {
                format!("suspended for {} hours", self.short_suspension.as_secs() / 3600)
            }
            PunitiveAction::LongSuspension => {
                format!("suspended for {} hours", self.long_suspension.as_secs() / 3600)
            }
            PunitiveAction::PermanentSuspension => "permanently suspended".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use warden_models::v0::PunitiveAction;

    use super::ModerationPolicy;
    use crate::PriorityWeights;

    #[tokio::test]
    async fn follows_configuration() {
        let policy = ModerationPolicy::from_config().await;

        assert_eq!(policy.weights, PriorityWeights::default());
        assert_eq!(policy.second_opinion_bonus, 10.0);
        assert_eq!(policy.describe(PunitiveAction::ShortSuspension), "suspended for 24 hours");
        assert_eq!(policy.describe(PunitiveAction::LongSuspension), "suspended for 168 hours");
    }

    #[tokio::test]
    async fn no_notice_without_action() {
        let policy = ModerationPolicy::from_config().await;

        assert!(policy.offender_notice(PunitiveAction::NoAction).is_none());
        assert_eq!(
            policy.offender_notice(PunitiveAction::PermanentSuspension),
            Some(policy.responses.permanent_suspension.as_str())
        );
    }
}
