//! Tick scheduler (component C8): independent update and render loops with
//! target-rate control, pause, a tick cap, and measured UPS/FPS (§4.8, §5).
//!
//! Three threads, matching the source's own loop/cycle-actor split:
//! an update-loop thread, a render-loop thread, and a counter thread that
//! recomputes the cached UPS/FPS roughly once a millisecond. Per §5, all
//! per-tick mutation of movers/producers happens inline inside the update
//! thread's callback — pathfinding and steering hold no locks against any
//! other mover's update during that same tick.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use sf_core::{EngineConfig, Tick};
use tracing::debug;

/// A running (or stopped) scheduler. Dropping this without calling
/// [`stop_and_join`](Self::stop_and_join) leaves the background threads
/// detached — they still observe `running` going false if the handle is
/// dropped after [`stop`](Self::stop), but callers that want a clean
/// shutdown should call `stop_and_join` explicitly (§5: "`Stop()` must join
/// the loop threads").
pub struct TickScheduler {
    running: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    render_frames: Arc<AtomicU64>,
    measured_ups: Arc<AtomicU32>,
    measured_fps: Arc<AtomicU32>,
    last_adjustment: Arc<Mutex<Instant>>,
    rate_adjustment_hold: Duration,
    update_thread: Option<JoinHandle<()>>,
    render_thread: Option<JoinHandle<()>>,
    counter_thread: Option<JoinHandle<()>>,
}

impl TickScheduler {
    /// Start all three loops. `on_update` is invoked once per update tick
    /// (with the tick number just reached) on the update thread; `on_render`
    /// is invoked once per render frame on the render thread. Both must be
    /// `Send + 'static` since they move onto their own OS thread — per §5,
    /// they hold no cross-thread locks, so the caller's closure should own
    /// (or `Arc<Mutex<_>>`-guard) whatever engine state it touches.
    ///
    /// The scheduler starts running but **paused** (§4.8/§8: "Starting
    /// paused: no movers move until Pause is toggled") — call
    /// [`resume`](Self::resume) or [`toggle_pause`](Self::toggle_pause) to
    /// let ticks flow.
    pub fn start<U, R>(config: EngineConfig, mut on_update: U, mut on_render: R) -> Self
    where
        U: FnMut(Tick) + Send + 'static,
        R: FnMut() + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let paused = Arc::new(AtomicBool::new(true));
        let ticks = Arc::new(AtomicU64::new(0));
        let render_frames = Arc::new(AtomicU64::new(0));
        let measured_ups = Arc::new(AtomicU32::new(0));
        let measured_fps = Arc::new(AtomicU32::new(0));
        let last_adjustment = Arc::new(Mutex::new(Instant::now()));

        let tick_cap = config.tick_cap;
        let update_interval = config.update_interval();
        let render_interval = config.render_interval();

        let update_thread = {
            let running = Arc::clone(&running);
            let paused = Arc::clone(&paused);
            let ticks = Arc::clone(&ticks);
            thread::spawn(move || {
                let mut next_at = Instant::now();
                while running.load(Ordering::SeqCst) {
                    if paused.load(Ordering::SeqCst) {
                        thread::sleep(Duration::from_millis(5));
                        next_at = Instant::now();
                        continue;
                    }
                    let now = Instant::now();
                    if now < next_at {
                        thread::sleep(next_at - now);
                        continue;
                    }
                    next_at += update_interval;

                    let tick_num = ticks.fetch_add(1, Ordering::SeqCst) + 1;
                    on_update(Tick(tick_num));

                    if tick_cap != 0 && tick_num >= tick_cap {
                        debug!(tick_cap, "tick cap reached, stopping update loop");
                        running.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            })
        };

        let render_thread = {
            let running = Arc::clone(&running);
            let render_frames = Arc::clone(&render_frames);
            thread::spawn(move || {
                let mut next_at = Instant::now();
                while running.load(Ordering::SeqCst) {
                    let now = Instant::now();
                    if now < next_at {
                        thread::sleep(next_at - now);
                        continue;
                    }
                    next_at += render_interval;
                    // Rendering is never blocked by pause (§4.8).
                    on_render();
                    render_frames.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        let counter_thread = {
            let running = Arc::clone(&running);
            let ticks = Arc::clone(&ticks);
            let render_frames = Arc::clone(&render_frames);
            let measured_ups = Arc::clone(&measured_ups);
            let measured_fps = Arc::clone(&measured_fps);
            thread::spawn(move || {
                let mut window_start = Instant::now();
                let mut ticks_at_window_start = 0u64;
                let mut frames_at_window_start = 0u64;
                while running.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(1));
                    let elapsed = window_start.elapsed();
                    if elapsed >= Duration::from_secs(1) {
                        let ticks_now = ticks.load(Ordering::SeqCst);
                        let frames_now = render_frames.load(Ordering::SeqCst);
                        let secs = elapsed.as_secs_f64();
                        measured_ups.store(
                            (((ticks_now - ticks_at_window_start) as f64) / secs) as u32,
                            Ordering::SeqCst,
                        );
                        measured_fps.store(
                            (((frames_now - frames_at_window_start) as f64) / secs) as u32,
                            Ordering::SeqCst,
                        );
                        ticks_at_window_start = ticks_now;
                        frames_at_window_start = frames_now;
                        window_start = Instant::now();
                    }
                }
                // Loop has stopped; the cached rates should read zero rather
                // than a stale last measurement.
                measured_ups.store(0, Ordering::SeqCst);
                measured_fps.store(0, Ordering::SeqCst);
            })
        };

        Self {
            running,
            paused,
            ticks,
            render_frames,
            measured_ups,
            measured_fps,
            last_adjustment,
            rate_adjustment_hold: config.rate_adjustment_hold,
            update_thread: Some(update_thread),
            render_thread: Some(render_thread),
            counter_thread: Some(counter_thread),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn toggle_pause(&self) {
        let was_paused = self.paused.load(Ordering::SeqCst);
        self.paused.store(!was_paused, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn measured_ups(&self) -> u32 {
        self.measured_ups.load(Ordering::SeqCst)
    }

    pub fn measured_fps(&self) -> u32 {
        self.measured_fps.load(Ordering::SeqCst)
    }

    /// Record that target rates were just adjusted, opening a hold window
    /// during which automatic rate correction must not touch the interval
    /// (§4.8). This scheduler has no automatic corrector yet — callers that
    /// add one must consult [`in_adjustment_hold`](Self::in_adjustment_hold)
    /// before nudging the interval.
    pub fn mark_rate_adjusted(&self) {
        *self.last_adjustment.lock().expect("adjustment mutex poisoned") = Instant::now();
    }

    pub fn in_adjustment_hold(&self) -> bool {
        self.last_adjustment.lock().expect("adjustment mutex poisoned").elapsed() < self.rate_adjustment_hold
    }

    /// `Quit`/`Stop`: terminate all loops at their next interval check.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Stop and block until every loop thread has exited (§5: "`Stop()`
    /// must join the loop threads").
    pub fn stop_and_join(mut self) {
        self.stop();
        if let Some(h) = self.update_thread.take() {
            let _ = h.join();
        }
        if let Some(h) = self.render_thread.take() {
            let _ = h.join();
        }
        if let Some(h) = self.counter_thread.take() {
            let _ = h.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use sf_core::EngineConfig;

    use super::TickScheduler;

    fn fast_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.target_ups = 500;
        config.target_fps = 500;
        config
    }

    #[test]
    fn starts_paused_and_ticks_only_after_resume() {
        let ticks_seen = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks_seen);
        let scheduler = TickScheduler::start(
            fast_config(),
            move |_tick| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            || {},
        );

        assert!(scheduler.is_paused());
        thread::sleep(Duration::from_millis(50));
        assert_eq!(ticks_seen.load(Ordering::SeqCst), 0, "no ticks should run before resume");

        scheduler.resume();
        thread::sleep(Duration::from_millis(50));
        assert!(ticks_seen.load(Ordering::SeqCst) > 0, "ticks should flow once resumed");

        scheduler.stop_and_join();
    }

    #[test]
    fn pause_halts_further_ticks_and_drops_measured_ups_to_zero() {
        let scheduler = TickScheduler::start(fast_config(), |_tick| {}, || {});
        scheduler.resume();
        thread::sleep(Duration::from_millis(1_100));
        assert!(scheduler.ticks() > 0, "should have accumulated ticks while running");

        scheduler.pause();
        let ticks_at_pause = scheduler.ticks();
        thread::sleep(Duration::from_millis(1_100));
        assert_eq!(scheduler.ticks(), ticks_at_pause, "tick counter must not move while paused");
        assert_eq!(scheduler.measured_ups(), 0, "measured UPS should decay to 0 once paused long enough");

        scheduler.stop_and_join();
    }
}
