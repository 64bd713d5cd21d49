use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::artifact::{ArtifactMetadata, DecodedAudio, RecordedArtifact};
use crate::models::config::SessionConfig;
use crate::models::error::SessionError;
use crate::models::frame::SampleFrame;
use crate::models::state::SessionPhase;
use crate::session::resources::ResourceBundle;
use crate::session::task::PeriodicTask;
use crate::time_format;
use crate::traits::capture::{CaptureDevice, CaptureProvider};
use crate::traits::decoder::AudioDecoder;
use crate::traits::delegate::SessionDelegate;
use crate::traits::encoder::ArtifactCallback;
use crate::traits::environment::{ArtifactSaver, HostEnvironment};
use crate::traits::playback::PlaybackEngine;

/// External services the session calls through, all opaque contracts.
#[derive(Clone)]
pub struct SessionServices {
    pub provider: Arc<dyn CaptureProvider>,
    pub decoder: Arc<dyn AudioDecoder>,
    pub playback: Arc<dyn PlaybackEngine>,
    pub saver: Arc<dyn ArtifactSaver>,
    pub environment: Arc<dyn HostEnvironment>,
}

/// Mutable session state, protected by `parking_lot::Mutex`.
struct Inner {
    phase: SessionPhase,
    /// Bumped on every clear. Asynchronous continuations (device grant,
    /// artifact delivery, decode completion) carry the generation they were
    /// issued under and are dropped if it no longer matches, so a cleared or
    /// restarted session cannot be resurrected by a late callback.
    generation: u64,
    bundle: ResourceBundle,
    sample_frame: SampleFrame,
    elapsed_recording: Duration,
    /// Timestamp of the last elapsed-time accumulation; `None` while paused.
    tick_anchor: Option<Instant>,
    capture_mime: Option<String>,
    duration_secs: f64,
    playback_position_secs: f64,
    processing: bool,
    cleared: bool,
    error: Option<SessionError>,
    // Single-slot handles: at most one instance of each loop can exist.
    sampling_task: Option<PeriodicTask>,
    ticker_task: Option<PeriodicTask>,
    clock_task: Option<PeriodicTask>,
}

impl Inner {
    fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            generation: 0,
            bundle: ResourceBundle::default(),
            sample_frame: SampleFrame::empty(),
            elapsed_recording: Duration::ZERO,
            tick_anchor: None,
            capture_mime: None,
            duration_secs: 0.0,
            playback_position_secs: 0.0,
            processing: false,
            cleared: true,
            error: None,
            sampling_task: None,
            ticker_task: None,
            clock_task: None,
        }
    }
}

struct Shared {
    state: Mutex<Inner>,
    delegate: Mutex<Option<Arc<dyn SessionDelegate>>>,
    services: SessionServices,
    config: SessionConfig,
}

/// Recording/playback session orchestrator.
///
/// Owns the resource bundle and all loop handles; drives the state machine
/// described on [`SessionPhase`]. The capture-device grant and the decode
/// step are genuinely asynchronous and handled as continuations; everything
/// else runs as short non-blocking steps.
///
/// Locking discipline: the state lock is never held across a call that can
/// re-enter the session (encoder stop/discard, delegate notification, task
/// cancellation). Resources are always detached from the bundle under the
/// lock and released after it is dropped. Encoder pause/resume are the one
/// exception kept under the lock: per the
/// [`MediaEncoder`](crate::traits::encoder::MediaEncoder) contract they are
/// plain control calls that never reach the artifact continuation.
pub struct VisualizerSession {
    shared: Arc<Shared>,
}

impl VisualizerSession {
    pub fn new(services: SessionServices) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(Inner::new()),
                delegate: Mutex::new(None),
                services,
                config: SessionConfig::default(),
            }),
        }
    }

    pub fn with_config(services: SessionServices, config: SessionConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(Inner::new()),
                delegate: Mutex::new(None),
                services,
                config,
            }),
        })
    }

    pub fn set_delegate(&self, delegate: Arc<dyn SessionDelegate>) {
        *self.shared.delegate.lock() = Some(delegate);
    }

    // --- Commands ---

    /// Begin a new capture. No-op while a capture is already live; otherwise
    /// forces a full clear, then requests the device asynchronously.
    pub fn start_recording(&self) {
        if self.shared.state.lock().phase.is_capture_active() {
            return;
        }
        Self::clear_internal(&self.shared);

        let generation = {
            let mut s = self.shared.state.lock();
            s.cleared = false;
            s.generation
        };
        self.shared.services.environment.set_unload_guard(true);
        if let Some(delegate) = Self::delegate(&self.shared) {
            delegate.on_start_recording();
        }

        log::debug!("requesting capture device");
        let shared = Arc::clone(&self.shared);
        self.shared
            .services
            .provider
            .request_device(Box::new(move |grant| match grant {
                Ok(device) => Self::begin_capture(&shared, generation, device),
                Err(error) => {
                    log::error!("capture device request failed: {error}");
                    if shared.state.lock().generation == generation {
                        Self::store_error(&shared, error);
                    }
                }
            }));
    }

    /// Pause or resume the active phase.
    ///
    /// While a capture is live this toggles recording pause; otherwise, with
    /// a decoded recording available, it toggles playback. With neither it is
    /// a no-op.
    pub fn toggle_pause_resume(&self) {
        let shared = &self.shared;
        let mut s = shared.state.lock();
        match s.phase {
            SessionPhase::Recording => {
                let now = Instant::now();
                if let Some(anchor) = s.tick_anchor.take() {
                    s.elapsed_recording += now - anchor;
                }
                if let Some(encoder) = s.bundle.encoder.as_mut() {
                    encoder.pause();
                }
                s.phase = SessionPhase::RecordingPaused;
                let sampling = s.sampling_task.take();
                drop(s);
                drop(sampling);
                log::debug!("recording paused");
                if let Some(delegate) = Self::delegate(shared) {
                    delegate.on_paused_recording();
                }
            }
            SessionPhase::RecordingPaused => {
                if let Some(encoder) = s.bundle.encoder.as_mut() {
                    encoder.resume();
                }
                // Re-anchor so the paused interval is never counted.
                s.tick_anchor = Some(Instant::now());
                s.phase = SessionPhase::Recording;
                drop(s);
                Self::start_sampling_loop(shared);
                log::debug!("recording resumed");
                if let Some(delegate) = Self::delegate(shared) {
                    delegate.on_resumed_recording();
                }
            }
            SessionPhase::Playing => {
                let clock = s.clock_task.take();
                let position = s.bundle.player.as_mut().map(|player| {
                    player.pause();
                    player.position_secs()
                });
                if let Some(position) = position {
                    s.playback_position_secs = position;
                }
                s.phase = SessionPhase::PlaybackPaused;
                drop(s);
                drop(clock);
                if let Some(delegate) = Self::delegate(shared) {
                    delegate.on_paused_audio_playback();
                }
            }
            SessionPhase::PlaybackReady | SessionPhase::PlaybackPaused => {
                if s.bundle.decoded.is_none() || s.processing {
                    return;
                }
                let resumed = s.playback_position_secs != 0.0;
                let play_result = match s.bundle.player.as_mut() {
                    Some(player) => player.play(),
                    None => return,
                };
                match play_result {
                    Ok(()) => {
                        s.phase = SessionPhase::Playing;
                        drop(s);
                        Self::start_playback_clock(shared);
                        if let Some(delegate) = Self::delegate(shared) {
                            if resumed {
                                delegate.on_resumed_audio_playback();
                            } else {
                                delegate.on_start_audio_playback();
                            }
                        }
                    }
                    Err(error) => {
                        drop(s);
                        log::error!("playback start failed: {error}");
                        if let Some(delegate) = Self::delegate(shared) {
                            delegate.on_error_playing_audio(&error);
                        }
                        Self::store_error(shared, error);
                    }
                }
            }
            SessionPhase::Idle | SessionPhase::Processing => {}
        }
    }

    /// Stop a live capture. No-op unless recording (paused or not).
    ///
    /// Returns once capture has stopped; the finished artifact arrives
    /// asynchronously and only then does the session become playback-ready.
    pub fn stop_recording(&self) {
        let shared = &self.shared;
        let (capture, sampling, ticker) = {
            let mut s = shared.state.lock();
            if !s.phase.is_capture_active() {
                return;
            }
            let capture = s.bundle.take_capture();
            let sampling = s.sampling_task.take();
            let ticker = s.ticker_task.take();
            s.phase = SessionPhase::Processing;
            s.processing = true;
            s.elapsed_recording = Duration::ZERO;
            s.tick_anchor = None;
            (capture, sampling, ticker)
        };
        drop(sampling);
        drop(ticker);
        if let Some(delegate) = Self::delegate(shared) {
            delegate.on_stop_recording();
        }
        log::debug!("capture stopped; awaiting final artifact");
        capture.finish();
    }

    /// Tear down every live resource and reset the session to its initial
    /// state. Reachable from every phase; idempotent.
    pub fn clear_canvas(&self) {
        Self::clear_internal(&self.shared);
    }

    /// Hand the recorded artifact to the save service. No-op when no capture
    /// has completed.
    pub fn save_audio_file(&self) {
        let (bytes, mime) = {
            let s = self.shared.state.lock();
            match s.bundle.artifact.as_ref() {
                Some(artifact) => (artifact.bytes.clone(), artifact.mime_type.clone()),
                None => return,
            }
        };
        let filename = format!(
            "recorded_audio{}",
            time_format::file_extension_from_mime(&mime)
        );
        log::debug!("saving artifact as {filename}");
        self.shared.services.saver.save(&bytes, &filename);
    }

    /// Move the playback cursor, clamped to the recording's duration. No-op
    /// unless a decoded recording exists.
    pub fn set_current_audio_time(&self, secs: f64) {
        let mut s = self.shared.state.lock();
        if !s.phase.is_playback_phase() {
            return;
        }
        let clamped = secs.clamp(0.0, s.duration_secs);
        if let Some(player) = s.bundle.player.as_mut() {
            player.seek_to(clamped);
        }
        s.playback_position_secs = clamped;
    }

    // --- Read accessors ---

    pub fn phase(&self) -> SessionPhase {
        self.shared.state.lock().phase
    }

    pub fn is_recording_in_progress(&self) -> bool {
        self.shared.state.lock().phase.is_capture_active()
    }

    pub fn is_paused_recording(&self) -> bool {
        self.shared.state.lock().phase.is_recording_paused()
    }

    pub fn is_processing_recorded_audio(&self) -> bool {
        self.shared.state.lock().processing
    }

    pub fn is_available_recorded_audio(&self) -> bool {
        let s = self.shared.state.lock();
        s.bundle.decoded.is_some() && !s.processing
    }

    pub fn is_paused_recorded_audio(&self) -> bool {
        !self.shared.state.lock().phase.is_playing()
    }

    pub fn is_cleared(&self) -> bool {
        self.shared.state.lock().cleared
    }

    /// The current amplitude snapshot (overwrite semantics).
    pub fn audio_data(&self) -> SampleFrame {
        self.shared.state.lock().sample_frame.clone()
    }

    /// Elapsed recording time, accumulated by the ticker at its resolution.
    pub fn recording_time(&self) -> Duration {
        self.shared.state.lock().elapsed_recording
    }

    pub fn formatted_recording_time(&self) -> String {
        time_format::format_recording_time(self.recording_time().as_millis())
    }

    /// Display duration of the decoded recording (skew-compensated).
    pub fn duration_secs(&self) -> f64 {
        self.shared.state.lock().duration_secs
    }

    pub fn formatted_duration(&self) -> String {
        time_format::format_duration_time(self.duration_secs())
    }

    pub fn current_audio_time(&self) -> f64 {
        self.shared.state.lock().playback_position_secs
    }

    pub fn formatted_current_audio_time(&self) -> String {
        time_format::format_recorded_audio_time(self.current_audio_time())
    }

    pub fn error(&self) -> Option<SessionError> {
        self.shared.state.lock().error.clone()
    }

    pub fn artifact_metadata(&self) -> Option<ArtifactMetadata> {
        self.shared
            .state
            .lock()
            .bundle
            .artifact
            .as_ref()
            .map(|artifact| artifact.metadata.clone())
    }

    // --- Internal helpers ---

    fn delegate(shared: &Arc<Shared>) -> Option<Arc<dyn SessionDelegate>> {
        shared.delegate.lock().clone()
    }

    /// Store an error after running the clear path, so the host never sees
    /// stale waveform/cursor state next to it. The error survives the clear.
    fn store_error(shared: &Arc<Shared>, error: SessionError) {
        log::error!("session error: {error}");
        Self::clear_internal(shared);
        shared.state.lock().error = Some(error);
    }

    fn clear_internal(shared: &Arc<Shared>) {
        let (bundle, sampling, ticker, clock, was_cleared) = {
            let mut s = shared.state.lock();
            s.generation = s.generation.wrapping_add(1);
            let bundle = std::mem::take(&mut s.bundle);
            let sampling = s.sampling_task.take();
            let ticker = s.ticker_task.take();
            let clock = s.clock_task.take();
            let was_cleared = s.cleared;
            s.phase = SessionPhase::Idle;
            s.sample_frame = SampleFrame::empty();
            s.elapsed_recording = Duration::ZERO;
            s.tick_anchor = None;
            s.capture_mime = None;
            s.duration_secs = 0.0;
            s.playback_position_secs = 0.0;
            s.processing = false;
            s.error = None;
            s.cleared = true;
            (bundle, sampling, ticker, clock, was_cleared)
        };
        drop(sampling);
        drop(ticker);
        drop(clock);
        bundle.teardown();
        if !was_cleared {
            shared.services.environment.set_unload_guard(false);
        }
        if let Some(delegate) = Self::delegate(shared) {
            delegate.on_clear_canvas();
        }
        log::debug!("session cleared");
    }

    /// Device-grant continuation: build the resource bundle in dependency
    /// order (device → graph → sample accumulator → encoder) and start the
    /// recording loops.
    fn begin_capture(shared: &Arc<Shared>, generation: u64, mut device: Box<dyn CaptureDevice>) {
        if shared.state.lock().generation != generation {
            log::warn!("capture grant arrived for a cleared session; releasing device");
            device.stop_tracks();
            return;
        }

        let mut graph = match shared.services.provider.build_graph(device.as_ref()) {
            Ok(graph) => graph,
            Err(error) => {
                device.stop_tracks();
                Self::store_error(shared, error);
                return;
            }
        };

        let artifact_shared = Arc::clone(shared);
        let on_artifact: ArtifactCallback =
            Box::new(move |bytes| Self::handle_artifact(&artifact_shared, generation, bytes));
        let mut encoder = match shared
            .services
            .provider
            .build_encoder(device.as_ref(), on_artifact)
        {
            Ok(encoder) => encoder,
            Err(error) => {
                graph.detach();
                device.stop_tracks();
                Self::store_error(shared, error);
                return;
            }
        };

        encoder.start();
        let mime = encoder.mime_type();
        let bins = graph.bin_count();

        {
            let mut s = shared.state.lock();
            if s.generation != generation {
                // Cleared while the grant was in flight.
                drop(s);
                encoder.discard();
                graph.detach();
                device.stop_tracks();
                return;
            }
            s.phase = SessionPhase::Recording;
            s.tick_anchor = Some(Instant::now());
            s.capture_mime = Some(mime);
            s.bundle.device = Some(device);
            s.bundle.graph = Some(graph);
            s.bundle.scratch = vec![0; bins];
            s.bundle.encoder = Some(encoder);
        }
        log::debug!("capture started");
        Self::start_sampling_loop(shared);
        Self::start_ticker(shared);
    }

    /// Artifact continuation: reject empty captures, then hand the blob to
    /// the decoder.
    fn handle_artifact(shared: &Arc<Shared>, generation: u64, bytes: Vec<u8>) {
        let mime = {
            let s = shared.state.lock();
            if s.generation != generation {
                log::warn!(
                    "artifact arrived for a cleared session; dropping {} bytes",
                    bytes.len()
                );
                return;
            }
            s.capture_mime.clone().unwrap_or_default()
        };

        if bytes.is_empty() {
            // Device/encoder race where no audio was actually captured.
            Self::store_error(shared, SessionError::EmptyArtifact);
            return;
        }

        log::debug!("artifact received ({} bytes, {mime})", bytes.len());
        let artifact = RecordedArtifact::new(bytes.clone(), mime);
        {
            // Re-verified in the critical section that installs the artifact:
            // a clear can land between the two locks, and a cleared session
            // never retains stale bytes.
            let mut s = shared.state.lock();
            if s.generation != generation {
                log::warn!("dropping artifact for a cleared session");
                return;
            }
            s.bundle.artifact = Some(artifact);
        }

        let decode_shared = Arc::clone(shared);
        shared.services.decoder.decode(
            bytes,
            Box::new(move |result| Self::handle_decoded(&decode_shared, generation, result)),
        );
    }

    /// Decode continuation: install the decoded buffer and a playback handle,
    /// or surface the failure.
    fn handle_decoded(
        shared: &Arc<Shared>,
        generation: u64,
        result: Result<DecodedAudio, SessionError>,
    ) {
        if shared.state.lock().generation != generation {
            return;
        }
        let decoded = match result {
            Ok(decoded) => decoded,
            Err(error) => {
                Self::store_error(shared, error);
                return;
            }
        };
        let player = match shared.services.playback.create_player(&decoded) {
            Ok(player) => player,
            Err(error) => {
                Self::store_error(shared, error);
                return;
            }
        };

        let mut s = shared.state.lock();
        if s.generation != generation {
            return;
        }
        s.duration_secs = decoded.display_duration();
        s.bundle.decoded = Some(decoded);
        s.bundle.player = Some(player);
        s.playback_position_secs = 0.0;
        s.processing = false;
        s.error = None;
        s.phase = SessionPhase::PlaybackReady;
        drop(s);
        log::debug!("artifact decoded; playback ready");
    }

    /// Per-frame amplitude sampling while capture is active and unpaused.
    fn start_sampling_loop(shared: &Arc<Shared>) {
        let old = shared.state.lock().sampling_task.take();
        drop(old);

        let state = Arc::clone(shared);
        let task = PeriodicTask::spawn(
            "amplitude-sampling",
            shared.config.frame_interval,
            move || {
                let mut s = state.state.lock();
                if s.phase != SessionPhase::Recording {
                    return ControlFlow::Continue(());
                }
                let bundle = &mut s.bundle;
                match bundle.graph.as_mut() {
                    Some(graph) => graph.sample(&mut bundle.scratch),
                    None => return ControlFlow::Continue(()),
                }
                let frame = SampleFrame::new(s.bundle.scratch.clone());
                s.sample_frame = frame;
                ControlFlow::Continue(())
            },
        );

        shared.state.lock().sampling_task = Some(task);
    }

    /// Fixed-interval elapsed-time accumulation. Re-anchors on every tick, so
    /// delayed ticks never desynchronize elapsed time from the wall clock;
    /// gated on the phase so paused intervals are never counted.
    fn start_ticker(shared: &Arc<Shared>) {
        let old = shared.state.lock().ticker_task.take();
        drop(old);

        let state = Arc::clone(shared);
        let task = PeriodicTask::spawn("elapsed-ticker", shared.config.tick_interval, move || {
            let mut s = state.state.lock();
            if s.phase == SessionPhase::Recording {
                let now = Instant::now();
                if let Some(anchor) = s.tick_anchor.replace(now) {
                    s.elapsed_recording += now - anchor;
                }
            }
            ControlFlow::Continue(())
        });

        shared.state.lock().ticker_task = Some(task);
    }

    /// Per-frame playback position polling while audio is playing. Ends its
    /// own loop when the stream finishes, firing the end notification exactly
    /// once.
    fn start_playback_clock(shared: &Arc<Shared>) {
        let old = shared.state.lock().clock_task.take();
        drop(old);

        let state = Arc::clone(shared);
        let task = PeriodicTask::spawn("playback-clock", shared.config.frame_interval, move || {
            let mut s = state.state.lock();
            if s.phase != SessionPhase::Playing {
                return ControlFlow::Continue(());
            }
            let polled = s.bundle.player.as_mut().map(|player| {
                let ended = player.has_ended();
                if ended {
                    player.pause();
                    player.seek_to(0.0);
                }
                (ended, player.position_secs())
            });
            let Some((ended, position)) = polled else {
                return ControlFlow::Break(());
            };
            if ended {
                s.playback_position_secs = 0.0;
                s.phase = SessionPhase::PlaybackReady;
                drop(s);
                log::debug!("playback ended");
                if let Some(delegate) = VisualizerSession::delegate(&state) {
                    delegate.on_end_audio_playback();
                }
                return ControlFlow::Break(());
            }
            s.playback_position_secs = position;
            ControlFlow::Continue(())
        });

        shared.state.lock().clock_task = Some(task);
    }
}

impl Drop for VisualizerSession {
    /// Destroying the host mid-session must leak nothing: run the full clear
    /// path, which cancels every scheduled task and releases the bundle.
    fn drop(&mut self) {
        Self::clear_internal(&self.shared);
    }
}
