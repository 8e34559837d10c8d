auto_derived_copy!(
    /// Action taken against an offender once spam is confirmed
    #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
    pub enum PunitiveAction {
        /// Nothing is done
        NoAction,
        /// Short timed suspension
        ShortSuspension,
        /// Longer timed suspension
        LongSuspension,
        /// Account is suspended for good
        PermanentSuspension,
    }
);

impl PunitiveAction {
    /// Pick the action from the offender's confirmed violation count,
    /// taken after the current violation has been counted
    pub fn for_confirmed_count(times_confirmed: u64, permanent_ban: bool) -> PunitiveAction {
        if permanent_ban {
            return PunitiveAction::PermanentSuspension;
        }

        match times_confirmed {
            0 => PunitiveAction::NoAction,
            1 => PunitiveAction::ShortSuspension,
            2 => PunitiveAction::LongSuspension,
            _ => PunitiveAction::PermanentSuspension,
        }
    }

    /// Whether the offender loses access in any way
    pub fn is_suspension(&self) -> bool {
        !matches!(self, PunitiveAction::NoAction)
    }
}
