use crate::engine::{Engine, ResolutionStart, StepEvent};
use crate::error::SimError;
use crate::table::BucketTable;
use tracing::debug;

/// Run state owned solely by the controller; the engine and table are
/// state-machine-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimState {
    Idle,
    RunningInsertion,
    InsertionComplete,
    RunningResolution,
    ResolutionComplete,
}

/// Read-only consumer of step events. Receives each event exactly once,
/// together with a view of the table after the step, and must not mutate
/// engine or table state.
pub trait Renderer {
    fn render(&mut self, event: &StepEvent, table: &BucketTable);

    /// Called when a phase starts with zero steps, so a renderer can show
    /// "nothing to resolve" instead of waiting for a tick that never renders.
    fn empty_resolution(&mut self) {}
}

/// Tick-driven two-phase animation. An external scheduler (the presentation
/// layer) calls `tick` at its own cadence; each tick performs at most one
/// bounded unit of work and returns. The controller has no notion of
/// wall-clock time.
#[derive(Debug)]
pub struct AnimationController {
    engine: Engine,
    state: AnimState,
}

impl AnimationController {
    pub fn new(engine: Engine) -> Self {
        AnimationController {
            engine,
            state: AnimState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> AnimState {
        self.state
    }

    /// Read access to the table for rendering between ticks.
    #[inline]
    pub fn table(&self) -> &BucketTable {
        self.engine.table()
    }

    #[inline]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Begin (or restart) the insertion phase. Resets table, statistics and
    /// the step cursor. Rejected while a phase is running.
    pub fn start_insertion(&mut self) -> Result<(), SimError> {
        match self.state {
            AnimState::Idle | AnimState::InsertionComplete | AnimState::ResolutionComplete => {
                self.engine.reset();
                self.state = AnimState::RunningInsertion;
                debug!("insertion phase started");
                Ok(())
            }
            from => Err(SimError::InvalidTransition {
                from,
                requested: "start_insertion",
            }),
        }
    }

    /// Begin the resolution phase from a completed insertion phase, taking
    /// the occupied-bucket snapshot. Rejected in any other state.
    pub fn start_resolution(&mut self) -> Result<ResolutionStart, SimError> {
        match self.state {
            AnimState::InsertionComplete => {
                let start = self.engine.begin_resolution();
                self.state = AnimState::RunningResolution;
                debug!(?start, "resolution phase started");
                Ok(start)
            }
            from => Err(SimError::InvalidTransition {
                from,
                requested: "start_resolution",
            }),
        }
    }

    /// Consume at most one step event and forward it to the renderer. A tick
    /// that finds no step remaining performs the running-to-complete
    /// transition instead; ticks outside a running phase are no-ops.
    /// Returns the state after the tick.
    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> AnimState {
        match self.state {
            AnimState::RunningInsertion => match self.engine.step_insertion() {
                Some(event) => renderer.render(&event, self.engine.table()),
                None => {
                    self.state = AnimState::InsertionComplete;
                    debug!(stats = ?self.engine.stats(), "insertion phase complete");
                }
            },
            AnimState::RunningResolution => match self.engine.step_resolution() {
                Some(event) => renderer.render(&event, self.engine.table()),
                None => {
                    self.state = AnimState::ResolutionComplete;
                    debug!("resolution phase complete");
                }
            },
            AnimState::Idle | AnimState::InsertionComplete | AnimState::ResolutionComplete => {}
        }
        self.state
    }

    /// Drive the current phase to completion, one tick at a time.
    /// Convenience for non-animated callers; the bounded-work-per-tick
    /// guarantee is unchanged.
    pub fn run_to_completion<R: Renderer>(&mut self, renderer: &mut R) -> AnimState {
        while matches!(
            self.state,
            AnimState::RunningInsertion | AnimState::RunningResolution
        ) {
            let before = self.state;
            if self.tick(renderer) != before {
                break;
            }
        }
        self.state
    }
}
