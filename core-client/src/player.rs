//! Playback Engine
//!
//! Timer-driven playback state machine. There is no audio pipeline here:
//! the engine models position, queue and repeat semantics, and reports
//! playback interactions (play, pause, skip, ...) to the backend. Hosts
//! render whatever [`PlaybackState`] says.
//!
//! Interaction reporting is fire-and-forget: a failed report is logged and
//! never disturbs playback.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::gateway::Gateway;
use crate::types::{InteractionKind, Track, TrackId};

/// Wall-clock period of the internal position timer.
const TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Seconds of playback each timer tick represents.
const TICK_SECONDS: f64 = 0.1;
/// At the head of the queue, `play_previous` restarts the current track
/// when more than this many seconds have elapsed.
const PREVIOUS_RESTART_THRESHOLD: f64 = 3.0;

const DEFAULT_VOLUME: f64 = 0.7;

/// Snapshot of everything a host needs to render the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub position_seconds: f64,
    pub duration_seconds: f64,
    /// Linear volume in `[0.0, 1.0]`.
    pub volume: f64,
    pub queue: Vec<Track>,
    /// Index of the current track within the queue, when it came from one.
    pub queue_index: Option<usize>,
    pub repeat_enabled: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            volume: DEFAULT_VOLUME,
            queue: Vec::new(),
            queue_index: None,
            repeat_enabled: false,
        }
    }
}

struct EngineInner {
    gateway: Arc<dyn Gateway>,
    state: Mutex<PlaybackState>,
    ticker: std::sync::Mutex<Option<CancellationToken>>,
    timer_enabled: bool,
}

/// Drives [`PlaybackState`] forward. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct PlaybackEngine {
    inner: Arc<EngineInner>,
}

type Emissions = Vec<(TrackId, InteractionKind)>;

impl PlaybackEngine {
    /// Engine with the internal 100 ms position timer.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self::build(gateway, true)
    }

    /// Engine without the internal timer; the host drives the clock by
    /// calling [`tick`](Self::tick) itself.
    pub fn without_timer(gateway: Arc<dyn Gateway>) -> Self {
        Self::build(gateway, false)
    }

    fn build(gateway: Arc<dyn Gateway>, timer_enabled: bool) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                gateway,
                state: Mutex::new(PlaybackState::default()),
                ticker: std::sync::Mutex::new(None),
                timer_enabled,
            }),
        }
    }

    /// Current snapshot.
    pub async fn state(&self) -> PlaybackState {
        self.inner.state.lock().await.clone()
    }

    /// Start playing a track.
    ///
    /// When `queue` is given it replaces the current queue; either way the
    /// queue index is re-derived from the track's position in the queue.
    pub async fn play_track(&self, track: Track, queue: Option<Vec<Track>>) {
        let emissions = {
            let mut state = self.inner.state.lock().await;
            if let Some(queue) = queue {
                state.queue = queue;
            }
            state.queue_index = state.queue.iter().position(|t| t.id == track.id);
            if state.queue_index.is_none() && !state.queue.is_empty() {
                debug!(track = %track.id, "Track played outside the queue");
            }
            Self::start_track(&mut state, track)
        };
        self.arm_ticker();
        self.emit_all(emissions).await;
    }

    /// Pause when playing, resume when paused. Does nothing while idle.
    pub async fn toggle_play_pause(&self) {
        let (emissions, now_playing) = {
            let mut state = self.inner.state.lock().await;
            let Some(track) = state.current_track.clone() else {
                return;
            };
            state.is_playing = !state.is_playing;
            let kind = if state.is_playing {
                InteractionKind::Resume
            } else {
                InteractionKind::Pause
            };
            (vec![(track.id, kind)], state.is_playing)
        };
        if now_playing {
            self.arm_ticker();
        } else {
            self.disarm_ticker();
        }
        self.emit_all(emissions).await;
    }

    /// Advance the playback clock by `delta` seconds.
    ///
    /// Driven by the internal timer in 0.1 s steps; public so hosts with
    /// their own clock (and tests) can step it directly. No-op while
    /// paused or idle.
    pub async fn tick(&self, delta: f64) {
        let (emissions, still_playing) = {
            let mut state = self.inner.state.lock().await;
            if !state.is_playing || state.current_track.is_none() {
                return;
            }

            state.position_seconds += delta;
            // A non-positive duration ends immediately, so the position
            // invariant holds even for tracks the backend sent without one.
            if state.position_seconds < state.duration_seconds {
                return;
            }
            state.position_seconds = state.duration_seconds;
            let emissions = Self::finish_track(&mut state);
            (emissions, state.is_playing)
        };
        if !still_playing {
            self.disarm_ticker();
        }
        self.emit_all(emissions).await;
    }

    /// Jump to the next queue entry. Does nothing past the end of the
    /// queue.
    pub async fn play_next(&self) {
        let emissions = {
            let mut state = self.inner.state.lock().await;
            let next = state.queue_index.map_or(0, |i| i + 1);
            if next >= state.queue.len() {
                return;
            }
            let mut emissions: Emissions = Vec::new();
            if let Some(current) = &state.current_track {
                emissions.push((current.id.clone(), InteractionKind::Skip));
            }
            let track = state.queue[next].clone();
            state.queue_index = Some(next);
            emissions.extend(Self::start_track(&mut state, track));
            emissions
        };
        self.arm_ticker();
        self.emit_all(emissions).await;
    }

    /// Go back one queue entry. At the head of the queue, restarts the
    /// current track instead when more than three seconds in (so a single
    /// tap cannot double-back-skip); otherwise does nothing.
    pub async fn play_previous(&self) {
        let (emissions, restarted) = {
            let mut state = self.inner.state.lock().await;
            let Some(current) = state.current_track.clone() else {
                return;
            };

            if let Some(index) = state.queue_index.filter(|i| *i > 0) {
                let mut emissions: Emissions =
                    vec![(current.id, InteractionKind::Previous)];
                let track = state.queue[index - 1].clone();
                state.queue_index = Some(index - 1);
                emissions.extend(Self::start_track(&mut state, track));
                (emissions, false)
            } else if state.position_seconds > PREVIOUS_RESTART_THRESHOLD {
                state.position_seconds = 0.0;
                (vec![(current.id, InteractionKind::Seek)], true)
            } else {
                return;
            }
        };
        if !restarted {
            self.arm_ticker();
        }
        self.emit_all(emissions).await;
    }

    /// Move the playhead, clamped to `[0, duration]`. Does nothing while
    /// idle.
    pub async fn seek(&self, position_seconds: f64) {
        let emissions = {
            let mut state = self.inner.state.lock().await;
            let Some(track) = state.current_track.clone() else {
                return;
            };
            state.position_seconds = position_seconds.clamp(0.0, state.duration_seconds);
            vec![(track.id, InteractionKind::Seek)]
        };
        self.emit_all(emissions).await;
    }

    /// Set the volume, clamped to `[0, 1]`.
    pub async fn change_volume(&self, volume: f64) {
        let mut state = self.inner.state.lock().await;
        state.volume = volume.clamp(0.0, 1.0);
    }

    pub async fn toggle_repeat(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        state.repeat_enabled = !state.repeat_enabled;
        state.repeat_enabled
    }

    /// Append a track to the queue without affecting what is playing.
    pub async fn add_to_queue(&self, track: Track) {
        let mut state = self.inner.state.lock().await;
        state.queue.push(track);
    }

    /// Empty the queue. The current track keeps playing but loses its
    /// queue position.
    pub async fn clear_queue(&self) {
        let mut state = self.inner.state.lock().await;
        state.queue.clear();
        state.queue_index = None;
    }

    /// Stop playback and return to the idle state. The queue and volume
    /// survive.
    pub async fn stop(&self) {
        self.disarm_ticker();
        let mut state = self.inner.state.lock().await;
        state.current_track = None;
        state.is_playing = false;
        state.position_seconds = 0.0;
        state.duration_seconds = 0.0;
        state.queue_index = None;
    }

    /// Make `track` current and (re)start playback. Caller still holds the
    /// state lock.
    fn start_track(state: &mut PlaybackState, track: Track) -> Emissions {
        debug!(track = %track.id, title = %track.title, "Starting track");
        state.duration_seconds = f64::from(track.duration_seconds);
        state.position_seconds = 0.0;
        state.is_playing = true;
        let emissions = vec![(track.id.clone(), InteractionKind::Play)];
        state.current_track = Some(track);
        emissions
    }

    /// End-of-track transition: repeat, advance, or stop.
    fn finish_track(state: &mut PlaybackState) -> Emissions {
        let current = state
            .current_track
            .clone()
            .expect("finish_track requires a current track");
        let mut emissions: Emissions = vec![(current.id.clone(), InteractionKind::Completed)];

        if state.repeat_enabled {
            state.position_seconds = 0.0;
            emissions.push((current.id, InteractionKind::Repeat));
            return emissions;
        }

        let next = state.queue_index.map_or(0, |i| i + 1);
        if next < state.queue.len() {
            emissions.push((current.id, InteractionKind::Skip));
            let track = state.queue[next].clone();
            state.queue_index = Some(next);
            emissions.extend(Self::start_track(state, track));
        } else {
            state.is_playing = false;
        }
        emissions
    }

    fn arm_ticker(&self) {
        if !self.inner.timer_enabled {
            return;
        }
        let token = CancellationToken::new();
        {
            let mut slot = self.inner.ticker.lock().expect("ticker lock poisoned");
            if let Some(previous) = slot.replace(token.clone()) {
                previous.cancel();
            }
        }

        let engine = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => engine.tick(TICK_SECONDS).await,
                }
            }
        });
    }

    fn disarm_ticker(&self) {
        if let Some(token) = self
            .inner
            .ticker
            .lock()
            .expect("ticker lock poisoned")
            .take()
        {
            token.cancel();
        }
    }

    async fn emit_all(&self, emissions: Emissions) {
        for (track, kind) in emissions {
            if let Err(e) = self.inner.gateway.send_interaction(&track, kind).await {
                warn!(
                    track = %track,
                    interaction = %kind,
                    "Failed to report playback interaction: {}", e
                );
            }
        }
    }
}
