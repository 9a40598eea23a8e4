use thiserror::Error;

use super::Step;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("cannot advance from {from}: current step is {current}")]
    NotCurrent { from: Step, current: Step },

    #[error("{0} is the last step")]
    AtEnd(Step),
}

/// History-backed navigator. The only component that knows step ordering
/// (through [`Step::next`]); back pops the history like the host's back button.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Vec<Step>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            history: vec![Step::FIRST],
        }
    }

    pub fn current(&self) -> Step {
        self.history.last().copied().unwrap_or(Step::FIRST)
    }

    pub fn history(&self) -> &[Step] {
        &self.history
    }

    /// Pushes the step after `from`. `from` must be the current step.
    pub fn advance(&mut self, from: Step) -> Result<Step, NavigationError> {
        let current = self.current();
        if from != current {
            return Err(NavigationError::NotCurrent { from, current });
        }
        let next = from.next().ok_or(NavigationError::AtEnd(from))?;
        self.history.push(next);
        log::info!("navigate {} -> {}", from.route(), next.route());
        Ok(next)
    }

    /// Pops one history entry; at the first step this is a no-op.
    pub fn back(&mut self) -> Step {
        if self.history.len() > 1 {
            let left = self.history.pop();
            log::info!(
                "navigate back {} -> {}",
                left.map(Step::route).unwrap_or_default(),
                self.current().route()
            );
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_welcome() {
        assert_eq!(Navigator::new().current(), Step::Welcome);
    }

    #[test]
    fn test_advance_and_back() {
        let mut nav = Navigator::new();
        assert_eq!(nav.advance(Step::Welcome), Ok(Step::Name));
        assert_eq!(nav.advance(Step::Name), Ok(Step::Socials));
        assert_eq!(nav.back(), Step::Name);
        assert_eq!(nav.back(), Step::Welcome);
        assert_eq!(nav.back(), Step::Welcome);
    }

    #[test]
    fn test_advance_requires_current_step() {
        let mut nav = Navigator::new();
        assert_eq!(
            nav.advance(Step::Name),
            Err(NavigationError::NotCurrent {
                from: Step::Name,
                current: Step::Welcome
            })
        );
        assert_eq!(nav.history(), &[Step::Welcome]);
    }

    #[test]
    fn test_no_advance_past_confirmation() {
        let mut nav = Navigator::new();
        let mut step = Step::Welcome;
        while let Ok(next) = nav.advance(step) {
            step = next;
        }
        assert_eq!(step, Step::Confirmation);
        assert_eq!(nav.advance(Step::Confirmation), Err(NavigationError::AtEnd(Step::Confirmation)));
    }
}
