use std::fmt;

use super::{Category, Severity, SpamSubtype};

auto_derived_copy!(
    /// Pending or confirmed escalation attached to a violation
    #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
    #[derive(Default)]
    pub enum Escalation {
        /// Nothing beyond the violation itself
        #[default]
        None,
        /// Waiting for a second moderator to corroborate
        SecondOpinion,
        /// A second moderator agreed, the offender is banned outright
        PermanentBan,
    }

    /// A violation as built up by the classifier or by a moderator
    pub struct Violation {
        /// Category of the violation
        pub category: Category,
        /// Spam subtype, only present for spam
        pub subtype: Option<SpamSubtype>,
        /// Severity, absent while a moderator has not judged it yet
        pub severity: Option<Severity>,
        /// Escalation marker
        pub escalation: Escalation,
    }

    /// Verdict on a piece of content
    ///
    /// Renders to the composed evaluation string used across the moderation
    /// flow, e.g. `violation_spam_links_serious` or `unidentified`.
    #[cfg_attr(feature = "serde", serde(tag = "type"))]
    pub enum Evaluation {
        /// No violation found
        Unidentified,
        /// Violation found
        Violation(Violation),
    }
);

impl Violation {
    pub fn new(category: Category) -> Violation {
        Violation {
            category,
            subtype: None,
            severity: None,
            escalation: Escalation::None,
        }
    }

    pub fn with_subtype(mut self, subtype: SpamSubtype) -> Violation {
        if self.category == Category::Spam {
            self.subtype = Some(subtype);
        }

        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Violation {
        self.severity = Some(severity);
        self
    }

    pub fn with_escalation(mut self, escalation: Escalation) -> Violation {
        self.escalation = escalation;
        self
    }
}

impl Evaluation {
    /// Shorthand for a violation with the given category, subtype and severity
    pub fn violation(
        category: Category,
        subtype: Option<SpamSubtype>,
        severity: Severity,
    ) -> Evaluation {
        let mut violation = Violation::new(category).with_severity(severity);
        if let Some(subtype) = subtype {
            violation = violation.with_subtype(subtype);
        }

        Evaluation::Violation(violation)
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, Evaluation::Violation(_))
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Evaluation::Violation(violation) => Some(violation.category),
            Evaluation::Unidentified => None,
        }
    }

    pub fn subtype(&self) -> Option<SpamSubtype> {
        match self {
            Evaluation::Violation(violation) => violation.subtype,
            Evaluation::Unidentified => None,
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            Evaluation::Violation(violation) => violation.severity,
            Evaluation::Unidentified => None,
        }
    }

    pub fn escalation(&self) -> Escalation {
        match self {
            Evaluation::Violation(violation) => violation.escalation,
            Evaluation::Unidentified => Escalation::None,
        }
    }

    pub fn is_serious(&self) -> bool {
        self.severity() == Some(Severity::Serious)
    }

    pub fn is_spam(&self) -> bool {
        self.category() == Some(Category::Spam)
    }

    /// Whether this evaluation still waits on a second moderator
    pub fn awaits_second_opinion(&self) -> bool {
        self.escalation() == Escalation::SecondOpinion
    }

    /// Whether a second moderator confirmed a permanent ban
    pub fn is_permanent_ban(&self) -> bool {
        self.escalation() == Escalation::PermanentBan
    }

    /// Mark this evaluation as needing a second opinion
    ///
    /// Has no effect on an unidentified evaluation.
    pub fn request_second_opinion(self) -> Evaluation {
        self.escalate(Escalation::SecondOpinion)
    }

    /// Replace a pending second opinion marker with a permanent ban
    pub fn confirm_second_opinion(self) -> Evaluation {
        if self.awaits_second_opinion() {
            self.escalate(Escalation::PermanentBan)
        } else {
            self
        }
    }

    fn escalate(self, escalation: Escalation) -> Evaluation {
        match self {
            Evaluation::Violation(violation) => {
                Evaluation::Violation(violation.with_escalation(escalation))
            }
            Evaluation::Unidentified => Evaluation::Unidentified,
        }
    }

    /// Confidence component used by the priority score
    pub fn auto_score(&self) -> f64 {
        match self {
            Evaluation::Unidentified => 0.0,
            Evaluation::Violation(violation) => match violation.severity {
                Some(Severity::Serious) => 1.0,
                Some(Severity::Minor) | None => 0.5,
            },
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Unidentified => f.write_str("unidentified"),
            Evaluation::Violation(violation) => {
                write!(f, "violation_{}", violation.category)?;

                if let Some(subtype) = violation.subtype {
                    write!(f, "_{subtype}")?;
                }

                if let Some(severity) = violation.severity {
                    write!(f, "_{severity}")?;
                }

                match violation.escalation {
                    Escalation::None => Ok(()),
                    Escalation::SecondOpinion => f.write_str("_second"),
                    Escalation::PermanentBan => f.write_str("_permban"),
                }
            }
        }
    }
}
