use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

/// One screen of the onboarding wizard, in canonical order.
///
/// The order is fixed here and nowhere else: data collection first, the photo
/// after every data step, confirmation last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum Step {
    #[strum(serialize = "welcome")]
    Welcome,
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "socials")]
    Socials,
    #[strum(serialize = "about-you")]
    AboutYou,
    #[strum(serialize = "questions")]
    Questions,
    #[strum(serialize = "referrals")]
    Referrals,
    #[strum(serialize = "photo")]
    Photo,
    #[strum(serialize = "confirmation")]
    Confirmation,
}

impl Step {
    pub const FIRST: Step = Step::Welcome;

    pub fn next(self) -> Option<Step> {
        match self {
            Step::Welcome => Some(Step::Name),
            Step::Name => Some(Step::Socials),
            Step::Socials => Some(Step::AboutYou),
            Step::AboutYou => Some(Step::Questions),
            Step::Questions => Some(Step::Referrals),
            Step::Referrals => Some(Step::Photo),
            Step::Photo => Some(Step::Confirmation),
            Step::Confirmation => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        Step::iter().find(|candidate| candidate.next() == Some(self))
    }

    /// Route path, e.g. `/about-you`. Welcome is served at `/`.
    pub fn route(self) -> String {
        match self {
            Step::Welcome => "/".to_string(),
            other => format!("/{}", other.as_ref()),
        }
    }

    pub fn from_route(route: &str) -> Option<Step> {
        let trimmed = route.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Step::Welcome);
        }
        let name = trimmed.strip_prefix('/')?;
        Step::iter().find(|step| step.as_ref() == name)
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_order() {
        let mut order = vec![Step::FIRST];
        while let Some(next) = order.last().and_then(|s| s.next()) {
            order.push(next);
        }
        assert_eq!(order, Step::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_previous_inverts_next() {
        for step in Step::iter() {
            if let Some(next) = step.next() {
                assert_eq!(next.previous(), Some(step));
            }
        }
        assert_eq!(Step::Welcome.previous(), None);
        assert!(Step::Confirmation.is_terminal());
    }

    #[test]
    fn test_routes_round_trip() {
        assert_eq!(Step::Welcome.route(), "/");
        assert_eq!(Step::AboutYou.route(), "/about-you");
        assert_eq!(Step::Referrals.route(), "/referrals");
        for step in Step::iter() {
            assert_eq!(Step::from_route(&step.route()), Some(step));
        }
        assert_eq!(Step::from_route("/photo/"), Some(Step::Photo));
        assert_eq!(Step::from_route("/unknown"), None);
        assert_eq!(Step::from_route("photo"), None);
    }
}
