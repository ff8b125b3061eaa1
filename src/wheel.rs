//! Picker wheel physics.
//!
//! The wheel spins with a random launch velocity that decays geometrically
//! every animation frame. Frames are not driven by a timer: the host hands
//! the wheel a [`FrameScheduler`] and calls [`Wheel::on_frame`] whenever the
//! frame it asked for comes due. Once the velocity drops under
//! [`STOP_VELOCITY`] the wheel settles, picks the segment under the pointer
//! and reports it through the settle callback.

use crate::error::SpinError;
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Velocity multiplier applied after every frame.
pub const FRICTION: f64 = 0.985;

/// Launch velocity range in radians per frame (upper bound exclusive).
pub const MIN_LAUNCH_VELOCITY: f64 = 0.25;
pub const MAX_LAUNCH_VELOCITY: f64 = 0.55;

/// A spin settles once its velocity falls below this many radians per frame.
pub const STOP_VELOCITY: f64 = 0.0005;

/// Host capability to run the wheel again before the next repaint.
///
/// At most one frame is pending at any time. Implementations only arrange
/// the call; the host invokes [`Wheel::on_frame`] when it comes due.
pub trait FrameScheduler {
    type Handle;

    fn request_frame(&mut self) -> Self::Handle;
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Index of the segment under the pointer for a rotation `offset`.
///
/// Segment 0 is drawn starting due right and segments run in the drawing
/// direction, while the pointer sits at the top. The angle under the
/// pointer is therefore the offset swept backwards, less a quarter turn.
pub fn winner_index(offset: f64, n: usize) -> usize {
    assert!(n > 0, "winner_index needs at least one segment");
    let normalized = (TAU - offset.rem_euclid(TAU)).rem_euclid(TAU);
    let adjusted = (normalized - FRAC_PI_2).rem_euclid(TAU);
    let step = TAU / n as f64;
    (adjusted / step).floor() as usize % n
}

#[derive(Debug, Clone)]
struct Spin {
    candidates: Vec<String>,
    velocity: f64,
}

type SettleCallback = Box<dyn FnMut(&str) + Send>;

pub struct Wheel<S: FrameScheduler> {
    offset: f64,
    spin: Option<Spin>,
    scheduler: S,
    pending: Option<S::Handle>,
    on_settled: SettleCallback,
}

impl<S: FrameScheduler> Wheel<S> {
    pub fn new<F>(scheduler: S, on_settled: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        Wheel {
            offset: 0.0,
            spin: None,
            scheduler,
            pending: None,
            on_settled: Box::new(on_settled),
        }
    }

    /// Creates an idle wheel already rotated to `offset`, so consecutive
    /// spins continue where the previous one stopped.
    pub fn with_offset<F>(scheduler: S, offset: f64, on_settled: F) -> Result<Self, SpinError>
    where
        F: FnMut(&str) + Send + 'static,
    {
        if !offset.is_finite() {
            return Err(SpinError::InvalidOffset);
        }
        let mut wheel = Self::new(scheduler, on_settled);
        wheel.offset = offset;
        Ok(wheel)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn velocity(&self) -> f64 {
        self.spin.as_ref().map_or(0.0, |s| s.velocity)
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Starts a spin over `candidates` with a random launch velocity.
    pub fn start_spin<R: Rng + ?Sized>(
        &mut self,
        candidates: &[String],
        rng: &mut R,
    ) -> Result<(), SpinError> {
        self.check_can_start(candidates)?;
        let velocity = rng.gen_range(MIN_LAUNCH_VELOCITY..MAX_LAUNCH_VELOCITY);
        self.start_spin_with_velocity(candidates, velocity)
    }

    /// Starts a spin with a fixed launch velocity, which must be finite and
    /// positive.
    ///
    /// The candidate list is copied: the winner is always drawn from the
    /// list as it was at this call, whatever the caller does with it later.
    pub fn start_spin_with_velocity(
        &mut self,
        candidates: &[String],
        velocity: f64,
    ) -> Result<(), SpinError> {
        self.check_can_start(candidates)?;
        if !(velocity.is_finite() && velocity > 0.0) {
            return Err(SpinError::InvalidVelocity);
        }
        self.spin = Some(Spin {
            candidates: candidates.to_vec(),
            velocity,
        });
        self.pending = Some(self.scheduler.request_frame());
        tracing::trace!(candidates = candidates.len(), velocity, "spin started");
        Ok(())
    }

    fn check_can_start(&self, candidates: &[String]) -> Result<(), SpinError> {
        if self.spin.is_some() {
            return Err(SpinError::AlreadySpinning);
        }
        if candidates.is_empty() {
            return Err(SpinError::EmptyCandidates);
        }
        Ok(())
    }

    /// Per-frame callback. Advances the rotation and returns the winner on
    /// the frame the wheel settles. Frames arriving while idle do nothing.
    pub fn on_frame(&mut self) -> Option<String> {
        self.pending = None;
        let spin = self.spin.as_mut()?;

        self.offset += spin.velocity;
        spin.velocity *= FRICTION;

        if spin.velocity >= STOP_VELOCITY {
            self.pending = Some(self.scheduler.request_frame());
            return None;
        }

        let spin = self.spin.take()?;
        let index = winner_index(self.offset, spin.candidates.len());
        let winner = spin.candidates[index].clone();
        tracing::debug!(offset = self.offset, index, winner = %winner, "wheel settled");
        (self.on_settled)(&winner);
        Some(winner)
    }

    /// Stops the wheel and withdraws any pending frame. No settle callback
    /// fires for an interrupted spin.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.spin = None;
    }
}

impl<S: FrameScheduler> Drop for Wheel<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Scheduler for hosts that deliver frames themselves in a loop, such as the
/// server replaying a whole spin at once. It only counts requests.
#[derive(Debug, Default)]
pub struct SyncScheduler {
    requested: usize,
}

impl SyncScheduler {
    /// Total frames requested over the scheduler's lifetime.
    pub fn requested(&self) -> usize {
        self.requested
    }
}

impl FrameScheduler for SyncScheduler {
    type Handle = usize;

    fn request_frame(&mut self) -> usize {
        self.requested += 1;
        self.requested
    }

    fn cancel_frame(&mut self, _handle: usize) {}
}

/// Outcome of a spin run to rest, with the offset after every frame so a
/// client can replay the animation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTrace {
    pub winner: String,
    pub start_offset: f64,
    pub launch_velocity: f64,
    pub frames: Vec<f64>,
}

impl SpinTrace {
    pub fn final_offset(&self) -> f64 {
        self.frames.last().copied().unwrap_or(self.start_offset)
    }
}

/// Runs one complete spin from `start_offset` using a random launch
/// velocity. Every spin terminates since the velocity decays geometrically.
pub fn run_to_rest<R: Rng + ?Sized>(
    candidates: &[String],
    start_offset: f64,
    rng: &mut R,
) -> Result<SpinTrace, SpinError> {
    if candidates.is_empty() {
        return Err(SpinError::EmptyCandidates);
    }
    let velocity = rng.gen_range(MIN_LAUNCH_VELOCITY..MAX_LAUNCH_VELOCITY);
    run_to_rest_with_velocity(candidates, start_offset, velocity)
}

pub fn run_to_rest_with_velocity(
    candidates: &[String],
    start_offset: f64,
    velocity: f64,
) -> Result<SpinTrace, SpinError> {
    let mut wheel = Wheel::with_offset(SyncScheduler::default(), start_offset, |_| {})?;
    wheel.start_spin_with_velocity(candidates, velocity)?;

    let mut frames = Vec::new();
    loop {
        let settled = wheel.on_frame();
        frames.push(wheel.offset());
        if let Some(winner) = settled {
            return Ok(SpinTrace {
                winner,
                start_offset,
                launch_velocity: velocity,
                frames,
            });
        }
    }
}
