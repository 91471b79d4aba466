//! Media Synchronizer
//!
//! Per-card state machine pairing a looping silent video with a looping
//! narration track.
//!
//! ```text
//! Idle --activate--> Loading --data ready--> Playing
//!                      ^  |                    |
//!                      |  +--play rejected-----+
//!                      |                       |
//!                   activate            deactivate/unmount
//!                      |                       v
//!                      +------------------- Stopped
//! ```
//!
//! Activation always starts both tracks from zero. While playing, a video
//! loop wraparound rewinds the narration, and a periodic check bounds drift.
//! Both follow-ups assume one looping clip; a clip sequence only gets the
//! rewind.

use super::media::{known_duration, MediaElement, PlayRejection};
use crate::config::PlaybackConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Loading,
    Playing,
    Stopped,
}

/// What moved the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Activated,
    DataReady,
    UserGesture,
    PlayRejected,
    Deactivated,
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SyncPhase,
    pub to: SyncPhase,
    pub trigger: Trigger,
}

/// Per-activation bookkeeping, cleared whenever the card goes inactive
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SyncState {
    pub last_video_time: Option<f64>,
    /// Time (ms) at which the next drift check is due
    pub pending_resync_deadline: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftCorrection {
    pub audio_was: f64,
    pub audio_now: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncTuning {
    pub loop_threshold_secs: f64,
    pub drift_check_interval_ms: f64,
    pub drift_tolerance_secs: f64,
}

impl Default for SyncTuning {
    fn default() -> Self {
        Self::from(&PlaybackConfig::default())
    }
}

impl From<&PlaybackConfig> for SyncTuning {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            loop_threshold_secs: config.loop_threshold_secs,
            drift_check_interval_ms: f64::from(config.drift_check_interval_ms),
            drift_tolerance_secs: config.drift_tolerance_secs,
        }
    }
}

pub struct MediaSynchronizer<M: MediaElement> {
    audio: M,
    video: Option<M>,
    voiceover_url: String,
    phase: SyncPhase,
    state: SyncState,
    tuning: SyncTuning,
    last_transition: Option<Transition>,
    /// Narration follows the video's loop; false for clip sequences
    follows_video: bool,
    /// When the current activation began; older rejections are stale
    activated_at_ms: f64,
    unmounted: bool,
}

impl<M: MediaElement> MediaSynchronizer<M> {
    pub fn new(audio: M, video: Option<M>, voiceover_url: impl Into<String>, tuning: SyncTuning) -> Self {
        Self {
            audio,
            video,
            voiceover_url: voiceover_url.into(),
            phase: SyncPhase::Idle,
            state: SyncState::default(),
            tuning,
            last_transition: None,
            follows_video: true,
            activated_at_ms: f64::NEG_INFINITY,
            unmounted: false,
        }
    }

    /// The video is a sequence of clips: rewind it on activation but skip
    /// loop resync and drift correction
    pub fn clip_sequence(mut self) -> Self {
        self.follows_video = false;
        self
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn last_transition(&self) -> Option<Transition> {
        self.last_transition
    }

    pub fn audio(&self) -> &M {
        &self.audio
    }

    pub fn video(&self) -> Option<&M> {
        self.video.as_ref()
    }

    /// Narration actually audible
    pub fn is_audible(&self) -> bool {
        self.phase == SyncPhase::Playing && !self.audio.is_paused()
    }

    fn transition(&mut self, to: SyncPhase, trigger: Trigger) {
        let from = self.phase;
        self.phase = to;
        self.last_transition = Some(Transition { from, to, trigger });
        if from != to {
            log::debug!("[SYNC] {:?} -> {:?} on {:?}", from, to, trigger);
        }
    }

    /// The card became active. Attaches the narration on first use, then
    /// starts immediately if the audio is already buffered.
    pub fn activate(&mut self, now_ms: f64) -> SyncPhase {
        if self.unmounted {
            return self.phase;
        }
        if self.audio.source().as_deref() != Some(self.voiceover_url.as_str()) {
            self.audio.attach_source(&self.voiceover_url);
        }
        self.state = SyncState::default();
        self.activated_at_ms = now_ms;
        self.transition(SyncPhase::Loading, Trigger::Activated);
        if self.audio.has_enough_data() {
            self.start_playback(now_ms, Trigger::DataReady);
        }
        self.phase
    }

    /// The audio element signalled it can play through
    pub fn on_data_ready(&mut self, now_ms: f64) -> SyncPhase {
        if self.phase == SyncPhase::Loading && !self.unmounted {
            self.start_playback(now_ms, Trigger::DataReady);
        }
        self.phase
    }

    /// Retry a blocked start from a user gesture
    pub fn retry(&mut self, now_ms: f64) -> SyncPhase {
        if self.phase == SyncPhase::Loading && !self.unmounted {
            self.start_playback(now_ms, Trigger::UserGesture);
        }
        self.phase
    }

    fn start_playback(&mut self, now_ms: f64, trigger: Trigger) {
        self.audio.set_current_time(0.0);
        if let Some(video) = &self.video {
            video.set_current_time(0.0);
        }
        match self.audio.play() {
            Ok(()) => {
                self.state = SyncState {
                    last_video_time: self.video.as_ref().map(|v| v.current_time()),
                    pending_resync_deadline: Some(now_ms + self.tuning.drift_check_interval_ms),
                };
                self.transition(SyncPhase::Playing, trigger);
            }
            Err(e) => {
                log::warn!("[SYNC] play request failed, waiting for a gesture: {}", e);
            }
        }
    }

    /// The platform rejected a play request after it was issued. A request
    /// from before the current activation is ignored.
    pub fn on_play_rejected(&mut self, rejection: &PlayRejection) -> SyncPhase {
        if rejection.issued_at_ms < self.activated_at_ms {
            log::debug!("[SYNC] dropping rejection from an earlier activation: {}", rejection.error);
            return self.phase;
        }
        log::warn!("[SYNC] play rejected: {}", rejection.error);
        if self.phase == SyncPhase::Playing {
            self.state.pending_resync_deadline = None;
            self.transition(SyncPhase::Loading, Trigger::PlayRejected);
        }
        self.phase
    }

    /// Another card took over. Pauses and rewinds synchronously. Returns
    /// whether anything observable changed, so repeated calls are no-ops.
    pub fn deactivate(&mut self) -> bool {
        self.stop(Trigger::Deactivated)
    }

    /// Terminal stop
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.stop(Trigger::Unmounted);
        if self.phase != SyncPhase::Stopped {
            self.transition(SyncPhase::Stopped, Trigger::Unmounted);
        }
        self.unmounted = true;
    }

    fn stop(&mut self, trigger: Trigger) -> bool {
        let mut changed = false;
        if !self.audio.is_paused() {
            self.audio.pause();
            changed = true;
        }
        if self.audio.current_time() != 0.0 {
            self.audio.set_current_time(0.0);
            changed = true;
        }
        self.state = SyncState::default();
        if matches!(self.phase, SyncPhase::Loading | SyncPhase::Playing) {
            self.transition(SyncPhase::Stopped, trigger);
            changed = true;
        }
        changed
    }

    /// Video playhead moved. Detects the loop wraparound and rewinds the
    /// narration, restarting it if it stalled. Returns true on a resync.
    pub fn on_video_time(&mut self, video_time: f64) -> bool {
        if self.phase != SyncPhase::Playing || !self.follows_video {
            return false;
        }
        let Some(duration) = self.video.as_ref().and_then(|v| known_duration(v)) else {
            return false;
        };
        let threshold = self.tuning.loop_threshold_secs;
        let wrapped = matches!(
            self.state.last_video_time,
            Some(prev) if prev >= duration - threshold && video_time < threshold
        );
        self.state.last_video_time = Some(video_time);
        if !wrapped {
            return false;
        }

        log::debug!("[SYNC] video looped, rewinding narration");
        self.audio.set_current_time(0.0);
        if self.audio.is_paused() {
            if let Err(e) = self.audio.play() {
                log::warn!("[SYNC] narration restart failed: {}", e);
            }
        }
        true
    }

    /// Periodic drift check. Runs at most once per interval; when the
    /// narration is further than the tolerance from `video mod audio
    /// duration` it is moved there.
    pub fn on_drift_tick(&mut self, now_ms: f64) -> Option<DriftCorrection> {
        if self.phase != SyncPhase::Playing || !self.follows_video {
            return None;
        }
        let interval = self.tuning.drift_check_interval_ms;
        if let Some(deadline) = self.state.pending_resync_deadline {
            // Timers fire a little early now and then.
            if now_ms + interval / 4.0 < deadline {
                return None;
            }
        }
        self.state.pending_resync_deadline = Some(now_ms + interval);

        let video = self.video.as_ref()?;
        let audio_duration = known_duration(&self.audio)?;
        let expected = video.current_time().rem_euclid(audio_duration);
        let actual = self.audio.current_time();
        if (actual - expected).abs() <= self.tuning.drift_tolerance_secs {
            return None;
        }
        log::debug!("[SYNC] drift {:.2}s, seeking narration {:.2} -> {:.2}", actual - expected, actual, expected);
        self.audio.set_current_time(expected);
        Some(DriftCorrection { audio_was: actual, audio_now: expected })
    }

    /// Manual play/pause of the narration only. A blocked start is retried.
    /// Inactive cards ignore it; only activation may start them.
    /// Returns whether the narration is now playing.
    pub fn user_toggle(&mut self, now_ms: f64) -> bool {
        if self.unmounted || matches!(self.phase, SyncPhase::Idle | SyncPhase::Stopped) {
            log::debug!("[SYNC] toggle ignored while {:?}", self.phase);
            return false;
        }
        if self.audio.is_paused() {
            if self.phase == SyncPhase::Loading {
                self.retry(now_ms);
            } else if let Err(e) = self.audio.play() {
                log::warn!("[SYNC] manual play failed: {}", e);
            }
        } else {
            self.audio.pause();
        }
        !self.audio.is_paused()
    }

    pub fn set_volume(&self, volume: f64) {
        self.audio.set_volume(volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;
    use crate::playback::media::{looping_video, FakeMedia};

    fn rejection(issued_at_ms: f64) -> PlayRejection {
        PlayRejection { issued_at_ms, error: PlaybackError::Blocked("NotAllowedError".into()) }
    }

    const URL: &str = "voice.mp3";

    fn synchronizer(audio: &FakeMedia, video: Option<&FakeMedia>) -> MediaSynchronizer<FakeMedia> {
        MediaSynchronizer::new(audio.clone(), video.cloned(), URL, SyncTuning::default())
    }

    #[test]
    fn activation_attaches_source_and_waits_for_data() {
        let audio = FakeMedia::new(12.0);
        let mut sync = synchronizer(&audio, None);

        assert_eq!(sync.activate(0.0), SyncPhase::Loading);
        assert_eq!(audio.source().as_deref(), Some(URL));
        assert_eq!(audio.play_calls(), 0);

        audio.set_ready(true);
        assert_eq!(sync.on_data_ready(10.0), SyncPhase::Playing);
        assert!(audio.is_playing());
        assert_eq!(sync.state().pending_resync_deadline, Some(2010.0));
    }

    #[test]
    fn buffered_audio_starts_immediately_from_zero() {
        let audio = FakeMedia::ready(12.0);
        let video = looping_video(8.0);
        audio.advance_to(5.0);
        video.advance_to(3.0);
        let mut sync = synchronizer(&audio, Some(&video));

        assert_eq!(sync.activate(0.0), SyncPhase::Playing);
        assert_eq!(audio.current_time(), 0.0);
        assert_eq!(video.current_time(), 0.0);
        assert_eq!(
            sync.last_transition(),
            Some(Transition { from: SyncPhase::Loading, to: SyncPhase::Playing, trigger: Trigger::DataReady })
        );
    }

    #[test]
    fn source_is_attached_once() {
        let audio = FakeMedia::ready(12.0);
        let mut sync = synchronizer(&audio, None);
        sync.activate(0.0);
        sync.deactivate();
        sync.activate(100.0);
        assert_eq!(audio.source().as_deref(), Some(URL));
    }

    #[test]
    fn blocked_play_stays_loading_until_gesture() {
        let audio = FakeMedia::ready(12.0);
        audio.block_play(true);
        let mut sync = synchronizer(&audio, None);

        assert_eq!(sync.activate(0.0), SyncPhase::Loading);
        assert!(!audio.is_playing());

        // Still Loading: the next data signal or a gesture tries again
        assert_eq!(sync.on_data_ready(20.0), SyncPhase::Loading);
        audio.block_play(false);
        assert_eq!(sync.retry(50.0), SyncPhase::Playing);
        assert_eq!(
            sync.last_transition().map(|t| t.trigger),
            Some(Trigger::UserGesture)
        );
    }

    #[test]
    fn async_rejection_returns_to_loading() {
        let audio = FakeMedia::ready(12.0);
        let mut sync = synchronizer(&audio, None);
        sync.activate(0.0);

        let phase = sync.on_play_rejected(&rejection(5.0));
        assert_eq!(phase, SyncPhase::Loading);
        assert_eq!(sync.state().pending_resync_deadline, None);
    }

    #[test]
    fn data_ready_retries_a_blocked_start() {
        let audio = FakeMedia::ready(12.0);
        audio.block_play(true);
        let mut sync = synchronizer(&audio, None);
        sync.activate(0.0);

        audio.block_play(false);
        assert_eq!(sync.on_data_ready(30.0), SyncPhase::Playing);
        assert_eq!(sync.last_transition().map(|t| t.trigger), Some(Trigger::DataReady));
    }

    #[test]
    fn rejection_from_earlier_activation_is_ignored() {
        let audio = FakeMedia::ready(12.0);
        let mut sync = synchronizer(&audio, None);
        sync.activate(0.0);
        sync.deactivate();
        assert_eq!(sync.activate(500.0), SyncPhase::Playing);

        // Issued by the first activation, settled after the second
        assert_eq!(sync.on_play_rejected(&rejection(0.0)), SyncPhase::Playing);
        assert!(sync.state().pending_resync_deadline.is_some());

        assert_eq!(sync.on_play_rejected(&rejection(520.0)), SyncPhase::Loading);
    }

    #[test]
    fn deactivate_pauses_rewinds_and_is_idempotent() {
        let audio = FakeMedia::ready(12.0);
        let mut sync = synchronizer(&audio, None);
        sync.activate(0.0);
        audio.advance_to(4.2);

        assert!(sync.deactivate());
        assert_eq!(sync.phase(), SyncPhase::Stopped);
        assert!(!audio.is_playing());
        assert_eq!(audio.current_time(), 0.0);
        assert_eq!(sync.state(), SyncState::default());

        let seeks = audio.seeks();
        assert!(!sync.deactivate());
        assert_eq!(audio.seeks(), seeks);
    }

    #[test]
    fn deactivating_idle_card_changes_nothing() {
        let audio = FakeMedia::new(12.0);
        let mut sync = synchronizer(&audio, None);
        assert!(!sync.deactivate());
        assert_eq!(sync.phase(), SyncPhase::Idle);
        assert_eq!(audio.seeks(), 0);
    }

    #[test]
    fn stopped_card_restarts_from_zero() {
        let audio = FakeMedia::ready(12.0);
        let mut sync = synchronizer(&audio, None);
        sync.activate(0.0);
        audio.advance_to(6.0);
        // Manual pause mid-clip, then scroll away and back
        sync.user_toggle(1000.0);
        sync.deactivate();
        audio.advance_to(6.0);

        assert_eq!(sync.activate(5000.0), SyncPhase::Playing);
        assert_eq!(audio.current_time(), 0.0);
    }

    #[test]
    fn video_wraparound_rewinds_narration() {
        let audio = FakeMedia::ready(12.0);
        let video = looping_video(8.0);
        let mut sync = synchronizer(&audio, Some(&video));
        sync.activate(0.0);

        assert!(!sync.on_video_time(7.5));
        audio.advance_to(7.6);
        assert!(!sync.on_video_time(7.8));
        assert!(sync.on_video_time(0.1));
        assert_eq!(audio.current_time(), 0.0);
    }

    #[test]
    fn wraparound_restarts_stalled_narration() {
        let audio = FakeMedia::ready(12.0);
        let video = looping_video(8.0);
        let mut sync = synchronizer(&audio, Some(&video));
        sync.activate(0.0);
        audio.stall();

        sync.on_video_time(7.9);
        assert!(sync.on_video_time(0.05));
        assert!(audio.is_playing());
    }

    #[test]
    fn ordinary_seek_backwards_is_not_a_loop() {
        let audio = FakeMedia::ready(12.0);
        let video = looping_video(8.0);
        let mut sync = synchronizer(&audio, Some(&video));
        sync.activate(0.0);

        sync.on_video_time(4.0);
        assert!(!sync.on_video_time(0.1));
    }

    #[test]
    fn unknown_video_duration_skips_loop_detection() {
        let audio = FakeMedia::ready(12.0);
        let video = looping_video(f64::NAN);
        let mut sync = synchronizer(&audio, Some(&video));
        sync.activate(0.0);
        sync.on_video_time(100.0);
        assert!(!sync.on_video_time(0.1));
    }

    #[test]
    fn drift_check_runs_once_per_interval() {
        let audio = FakeMedia::ready(10.0);
        let video = looping_video(8.0);
        let mut sync = synchronizer(&audio, Some(&video));
        sync.activate(0.0);

        video.advance_to(5.0);
        audio.advance_to(2.0);
        assert_eq!(sync.on_drift_tick(100.0), None, "not due yet");

        let correction = sync.on_drift_tick(2000.0).expect("correction due");
        assert_eq!(correction, DriftCorrection { audio_was: 2.0, audio_now: 5.0 });
        assert_eq!(audio.current_time(), 5.0);
        assert_eq!(sync.state().pending_resync_deadline, Some(4000.0));
    }

    #[test]
    fn drift_expected_wraps_by_audio_duration() {
        let audio = FakeMedia::ready(6.0);
        let video = looping_video(20.0);
        let mut sync = synchronizer(&audio, Some(&video));
        sync.activate(0.0);

        video.advance_to(14.0);
        audio.advance_to(0.5);
        let correction = sync.on_drift_tick(2000.0).unwrap();
        assert!((correction.audio_now - 2.0).abs() < 1e-9);
    }

    #[test]
    fn small_drift_is_tolerated() {
        let audio = FakeMedia::ready(10.0);
        let video = looping_video(8.0);
        let mut sync = synchronizer(&audio, Some(&video));
        sync.activate(0.0);
        video.advance_to(3.0);
        audio.advance_to(3.8);
        assert_eq!(sync.on_drift_tick(2000.0), None);
    }

    #[test]
    fn no_drift_checks_while_inactive() {
        let audio = FakeMedia::ready(10.0);
        let video = looping_video(8.0);
        let mut sync = synchronizer(&audio, Some(&video));
        video.advance_to(5.0);
        assert_eq!(sync.on_drift_tick(10_000.0), None);
    }

    #[test]
    fn unmount_is_terminal() {
        let audio = FakeMedia::ready(12.0);
        let mut sync = synchronizer(&audio, None);
        sync.activate(0.0);
        sync.unmount();
        assert_eq!(sync.phase(), SyncPhase::Stopped);
        assert!(!audio.is_playing());

        assert_eq!(sync.activate(100.0), SyncPhase::Stopped);
        assert!(!audio.is_playing());
    }

    #[test]
    fn user_toggle_cannot_start_an_inactive_card() {
        let audio = FakeMedia::ready(12.0);
        let mut sync = synchronizer(&audio, None);
        assert!(!sync.user_toggle(0.0));
        assert_eq!(audio.play_calls(), 0);

        sync.activate(10.0);
        sync.deactivate();
        let plays = audio.play_calls();
        assert!(!sync.user_toggle(20.0));
        assert_eq!(audio.play_calls(), plays);
        assert_eq!(sync.phase(), SyncPhase::Stopped);
    }

    #[test]
    fn clip_sequence_rewinds_video_without_resync() {
        let audio = FakeMedia::ready(10.0);
        let video = looping_video(8.0);
        video.advance_to(5.0);
        let mut sync = synchronizer(&audio, Some(&video)).clip_sequence();

        assert_eq!(sync.activate(0.0), SyncPhase::Playing);
        assert_eq!(video.current_time(), 0.0);

        // A clip boundary looks like a wraparound but is not one
        sync.on_video_time(7.9);
        audio.advance_to(4.0);
        assert!(!sync.on_video_time(0.1));
        assert_eq!(audio.current_time(), 4.0);
        assert_eq!(sync.on_drift_tick(5000.0), None);
    }

    #[test]
    fn user_toggle_does_not_touch_phase() {
        let audio = FakeMedia::ready(12.0);
        let mut sync = synchronizer(&audio, None);
        sync.activate(0.0);

        assert!(!sync.user_toggle(10.0));
        assert_eq!(sync.phase(), SyncPhase::Playing);
        assert!(sync.user_toggle(20.0));
    }
}
