//! Host-side frame loop.
//!
//! [`FrameLoop`] plays the role of the page that embeds a canvas: it owns the
//! engine and its [`Raster`], runs `update` then `render` once per frame (or
//! every n-th frame in preview mode), forwards pointer and touch input, and
//! applies debounced resizes. Time is passed in explicitly so the loop runs
//! the same under a real clock, a test, or a scripted replay.

use std::time::{Duration, Instant};

use canvas_lab_core::surface::clamp_extent;
use canvas_lab_core::{Engine, EngineError, PointerKind, Raster, Rgba, Seed, Surface};

use crate::EngineKind;

/// Resize requests closer together than this are coalesced.
pub const DEFAULT_RESIZE_DELAY: Duration = Duration::from_millis(150);

/// Frames between updates in preview mode.
pub const PREVIEW_INTERVAL: u32 = 3;

/// How often a frame actually advances the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cadence {
    /// Every frame.
    #[default]
    Full,
    /// Every n-th frame (counting from 1); 0 behaves like 1.
    Throttled(u32),
}

impl Cadence {
    /// The reduced rate used for gallery previews.
    pub const PREVIEW: Cadence = Cadence::Throttled(PREVIEW_INTERVAL);

    /// `Full` for intervals of 0 or 1, `Throttled(n)` otherwise.
    pub fn every(n: usize) -> Self {
        match n {
            0 | 1 => Cadence::Full,
            n => Cadence::Throttled(u32::try_from(n).unwrap_or(u32::MAX)),
        }
    }

    /// Whether frame number `frame` (1-based) runs the engine.
    pub fn runs(self, frame: u64) -> bool {
        match self {
            Cadence::Full => true,
            Cadence::Throttled(n) => frame % u64::from(n.max(1)) == 0,
        }
    }
}

/// Coalesces bursts of resize requests.
///
/// Only the most recent request survives, and only once `delay` has passed
/// without a newer one.
#[derive(Debug, Clone)]
pub struct ResizeDebounce {
    delay: Duration,
    pending: Option<((usize, usize), Instant)>,
}

impl Default for ResizeDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DELAY)
    }
}

impl ResizeDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a request, restarting the delay.
    pub fn request(&mut self, width: usize, height: usize, now: Instant) {
        self.pending = Some(((width, height), now));
    }

    /// The pending size if the delay has elapsed since the last request.
    pub fn poll(&mut self, now: Instant) -> Option<(usize, usize)> {
        let (_, at) = self.pending?;
        if now.saturating_duration_since(at) < self.delay {
            return None;
        }
        self.pending.take().map(|(size, _)| size)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Drives one engine against one raster.
pub struct FrameLoop<E: Engine> {
    engine: E,
    raster: Raster,
    cadence: Cadence,
    debounce: ResizeDebounce,
    frame: u64,
    state: LoopState,
}

impl<E: Engine> FrameLoop<E> {
    /// A stopped-until-started loop over a black `width × height` raster.
    pub fn new(engine: E, width: usize, height: usize, cadence: Cadence) -> Self {
        Self {
            engine,
            raster: Raster::filled(clamp_extent(width), clamp_extent(height), Rgba::BLACK),
            cadence,
            debounce: ResizeDebounce::default(),
            frame: 0,
            state: LoopState::Idle,
        }
    }

    pub fn with_resize_delay(mut self, delay: Duration) -> Self {
        self.debounce = ResizeDebounce::new(delay);
        self
    }

    /// Initializes the engine against the raster. Only the first call does
    /// anything.
    pub fn start(&mut self) {
        if self.state != LoopState::Idle {
            return;
        }
        log::debug!(
            "frame loop: starting on {}x{} ({:?})",
            self.raster.width(),
            self.raster.height(),
            self.cadence
        );
        self.engine.init(&mut self.raster);
        self.state = LoopState::Running;
    }

    /// Advances the frame counter and, if the cadence allows, runs
    /// `update` then `render`. Returns whether the engine ran.
    pub fn frame(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.frame += 1;
        if !self.cadence.runs(self.frame) {
            return false;
        }
        self.engine.update();
        self.engine.render(&mut self.raster);
        true
    }

    /// Like [`frame`](Self::frame), applying any debounced resize that is due
    /// at `now` first.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.poll_resize(now);
        self.frame()
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.state == LoopState::Running {
            self.engine.on_mouse_move(x, y);
        }
    }

    pub fn pointer_click(&mut self, x: f64, y: f64) {
        if self.state == LoopState::Running {
            self.engine.on_mouse_click(x, y);
        }
    }

    /// A touch drag both moves and clicks, so dragging a finger paints.
    pub fn touch_move(&mut self, x: f64, y: f64) {
        self.pointer_move(x, y);
        self.pointer_click(x, y);
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.pointer_click(x, y);
    }

    /// Queues a resize; it takes effect once the debounce delay has passed.
    pub fn request_resize(&mut self, width: usize, height: usize, now: Instant) {
        self.debounce.request(width, height, now);
    }

    /// Applies a pending resize if it is due. Returns whether one was applied.
    pub fn poll_resize(&mut self, now: Instant) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        match self.debounce.poll(now) {
            Some((w, h)) => {
                self.apply_resize(w, h);
                true
            }
            None => false,
        }
    }

    /// Recreates the raster cleared to black and hard-resets the engine.
    fn apply_resize(&mut self, width: usize, height: usize) {
        log::debug!("frame loop: resize to {width}x{height}");
        self.raster = Raster::filled(clamp_extent(width), clamp_extent(height), Rgba::BLACK);
        self.engine.resize(width, height);
    }

    /// Destroys the engine once and drops any pending resize. Later frames
    /// and input are ignored.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.debounce.cancel();
        self.engine.destroy();
        self.state = LoopState::Stopped;
        log::debug!("frame loop: stopped after {} frames", self.frame);
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames seen since `start`, including skipped ones.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }
}

impl FrameLoop<EngineKind> {
    /// Builds and runs the loop a [`Seed`] describes: scripted pointer events
    /// are delivered before the frame they are keyed to.
    pub fn replay(seed: &Seed) -> Result<Self, EngineError> {
        seed.validate()?;
        let engine = EngineKind::from_name(&seed.engine, &seed.engine_params())?;
        let cadence = Cadence::every(seed.cadence);
        let mut host = FrameLoop::new(engine, seed.width, seed.height, cadence);
        host.start();
        for frame in 0..seed.frames {
            for event in seed.events_at(frame) {
                match event.kind {
                    PointerKind::Move => host.pointer_move(event.x, event.y),
                    PointerKind::Click => host.pointer_click(event.x, event.y),
                }
            }
            host.frame();
        }
        Ok(host)
    }
}
