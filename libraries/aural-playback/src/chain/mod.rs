//! Request chains
//!
//! A chain is an ordered list of plain step functions sharing one
//! [`RequestContext`]. Each step either passes control on or concludes the
//! chain early. Chains that suspend (gap, transcoding) are resumed later at
//! a named step with the same context.

mod completed;
mod start;
mod stop;

use crate::{context::RequestContext, delegate::PlaybackDelegate};
use tracing::{debug, error};

/// How a chain execution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every step ran
    Completed,
    /// Waiting on a gap timer or transcoder; will resume on an event
    Suspended,
    /// Concluded early with nothing to do (not an error)
    Halted,
    /// Concluded early because the request could not be satisfied
    Failed,
}

/// What a single step decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    Continue,
    Suspend,
    Halt,
    Fail,
}

impl From<ChainOutcome> for StepOutcome {
    fn from(outcome: ChainOutcome) -> Self {
        match outcome {
            ChainOutcome::Completed => Self::Continue,
            ChainOutcome::Suspended => Self::Suspend,
            ChainOutcome::Halted => Self::Halt,
            ChainOutcome::Failed => Self::Fail,
        }
    }
}

pub(crate) type StepFn = fn(&mut PlaybackDelegate, &mut RequestContext) -> StepOutcome;

pub(crate) struct ChainStep {
    pub name: &'static str,
    pub run: StepFn,
}

pub(crate) struct PlaybackChain {
    pub name: &'static str,
    pub steps: &'static [ChainStep],
}

impl PlaybackChain {
    pub(crate) fn execute(
        &self,
        delegate: &mut PlaybackDelegate,
        ctx: &mut RequestContext,
    ) -> ChainOutcome {
        self.run_from(0, delegate, ctx)
    }

    /// Resume a suspended request at the step called `step`
    pub(crate) fn execute_from(
        &self,
        step: &str,
        delegate: &mut PlaybackDelegate,
        ctx: &mut RequestContext,
    ) -> ChainOutcome {
        match self.steps.iter().position(|s| s.name == step) {
            Some(index) => self.run_from(index, delegate, ctx),
            None => {
                error!("Chain {} has no step named {}", self.name, step);
                ChainOutcome::Failed
            }
        }
    }

    fn run_from(
        &self,
        first: usize,
        delegate: &mut PlaybackDelegate,
        ctx: &mut RequestContext,
    ) -> ChainOutcome {
        for step in &self.steps[first..] {
            let outcome = (step.run)(delegate, ctx);
            debug!(chain = self.name, step = step.name, ?outcome, "chain step");
            match outcome {
                StepOutcome::Continue => {}
                StepOutcome::Suspend => return ChainOutcome::Suspended,
                StepOutcome::Halt => return ChainOutcome::Halted,
                StepOutcome::Fail => return ChainOutcome::Failed,
            }
        }
        ChainOutcome::Completed
    }

    #[cfg(test)]
    pub(crate) fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name).collect()
    }
}

/// Step the start chain resumes at once a gap has elapsed
pub(crate) const RESUME_AFTER_GAP: &str = "resolve_transcoding";

/// Step the start chain resumes at once transcoding has produced a file
pub(crate) const RESUME_AFTER_TRANSCODING: &str = "prepare_track";

pub(crate) static START: PlaybackChain = PlaybackChain {
    name: "start",
    steps: &[
        ChainStep { name: "check_interrupt", run: start::check_interrupt },
        ChainStep { name: "validate", run: start::validate },
        ChainStep { name: "cancel_stale_transcoding", run: start::cancel_stale_transcoding },
        ChainStep { name: "save_outgoing_profile", run: start::save_outgoing_profile },
        ChainStep { name: "halt_current", run: start::halt_current },
        ChainStep { name: "apply_profile", run: start::apply_profile },
        ChainStep { name: "begin_session", run: start::begin_session },
        ChainStep { name: "resolve_gap", run: start::resolve_gap },
        ChainStep { name: "resolve_transcoding", run: start::resolve_transcoding },
        ChainStep { name: "prepare_track", run: start::prepare_track },
        ChainStep { name: "start_playback", run: start::start_playback },
        ChainStep { name: "notify_transition", run: start::notify_transition },
    ],
};

pub(crate) static STOP: PlaybackChain = PlaybackChain {
    name: "stop",
    steps: &[
        ChainStep { name: "cancel_transcoding", run: stop::cancel_transcoding },
        ChainStep { name: "save_profile", run: stop::save_profile },
        ChainStep { name: "halt", run: stop::halt },
        ChainStep { name: "notify_transition", run: stop::notify_transition },
    ],
};

pub(crate) static COMPLETED: PlaybackChain = PlaybackChain {
    name: "completed",
    steps: &[
        ChainStep { name: "save_completed_profile", run: completed::save_completed_profile },
        ChainStep { name: "resolve_subsequent", run: completed::resolve_subsequent },
        ChainStep { name: "delay_after_completion", run: completed::delay_after_completion },
        ChainStep { name: "dispatch", run: completed::dispatch },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_points_exist_in_start_chain() {
        let names = START.step_names();
        assert!(names.contains(&RESUME_AFTER_GAP));
        assert!(names.contains(&RESUME_AFTER_TRANSCODING));
    }

    #[test]
    fn validation_precedes_halting() {
        let names = START.step_names();
        let validate = names.iter().position(|n| *n == "validate");
        let halt = names.iter().position(|n| *n == "halt_current");
        assert!(validate < halt);
    }

    #[test]
    fn gap_precedes_transcoding_precedes_playback() {
        let names = START.step_names();
        let at = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert!(at("resolve_gap") < at("resolve_transcoding"));
        assert!(at("resolve_transcoding") < at("prepare_track"));
        assert!(at("prepare_track") < at("start_playback"));
    }
}
