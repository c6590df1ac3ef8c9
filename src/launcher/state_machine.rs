use thiserror::Error;

/// Launcher lifecycle. `StoppedByUser` and `StoppedByChild` are both
/// terminal: the first ends the process, the second only records that the
/// server closed on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    CheckingVersion,
    Installing,
    Running,
    StoppedByUser,
    StoppedByChild,
    Failed,
}

#[derive(Error, Debug)]
pub enum TransitionError {
    #[error("invalid phase transition: {0:?} -> {1:?}")]
    InvalidTransition(Phase, Phase),
}

pub struct PhaseTracker {
    pub phase: Phase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self { phase: Phase::Idle }
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_transition(&self, to: &Phase) -> bool {
        matches!(
            (&self.phase, to),
            (Phase::Idle, Phase::CheckingVersion)
                | (Phase::CheckingVersion, Phase::Installing)
                | (Phase::Installing, Phase::Running)
                | (Phase::Running, Phase::StoppedByUser)
                | (Phase::Running, Phase::StoppedByChild)
                | (Phase::CheckingVersion, Phase::Failed)
                | (Phase::Installing, Phase::Failed)
                | (Phase::Running, Phase::Failed)
        )
    }

    pub fn transition(&mut self, to: Phase) -> Result<(), TransitionError> {
        if self.can_transition(&to) {
            tracing::debug!("phase transition: {:?} -> {:?}", self.phase, to);
            self.phase = to;
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition(self.phase.clone(), to))
        }
    }
}
