use crate::config::LoopPreset;
use crate::error::ChordSyncError;
use crate::playback::driver::MediaDriver;
use std::sync::Arc;
use tokio::sync::watch::{self, Receiver, Sender};

/// Playback rates the player will accept; everything else snaps to the
/// nearest member.
pub const SUPPORTED_RATES: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

pub const DEFAULT_VOLUME: u8 = 100;

/// Transport lifecycle of a media source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// No source, or the driver has not signaled readiness yet
    Unready,
    /// Duration known, nothing rolling
    Ready,
    Playing,
    Paused,
}

/// Operator-defined loop window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoopRegion {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub enabled: bool,
}

/// Playback state machine, driven by the media driver's callbacks and by
/// user actions between ticks.
///
/// The mutators below are the sole write surface; both the periodic tick
/// and discrete user actions go through them synchronously.
pub struct Player {
    transport: Transport,
    source_id: Option<String>,
    current_time: f64,
    duration: f64,
    volume: u8,
    last_volume: u8, // restored on unmute
    is_muted: bool,
    rate: f64,
    loop_region: LoopRegion,
    driver: Option<Box<dyn MediaDriver>>,
    position_sender: Arc<Sender<f64>>, // notify position changes
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        let (position_sender, _) = watch::channel(0.0);
        Self {
            transport: Transport::Unready,
            source_id: None,
            current_time: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME,
            last_volume: DEFAULT_VOLUME,
            is_muted: false,
            rate: 1.0,
            loop_region: LoopRegion::default(),
            driver: None,
            position_sender: Arc::new(position_sender),
        }
    }

    pub fn attach_driver(&mut self, driver: Box<dyn MediaDriver>) {
        self.driver = Some(driver);
    }

    pub fn detach_driver(&mut self) -> Option<Box<dyn MediaDriver>> {
        self.driver.take()
    }

    /// Watch the media position as it advances.
    pub fn subscribe_position(&self) -> Receiver<f64> {
        self.position_sender.subscribe()
    }

    pub const fn transport(&self) -> Transport {
        self.transport
    }

    pub const fn is_playing(&self) -> bool {
        matches!(self.transport, Transport::Playing)
    }

    pub const fn current_time(&self) -> f64 {
        self.current_time
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn volume(&self) -> u8 {
        self.volume
    }

    pub const fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub const fn rate(&self) -> f64 {
        self.rate
    }

    pub const fn loop_region(&self) -> LoopRegion {
        self.loop_region
    }

    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    /// A new source invalidates all position state.
    pub fn set_source(&mut self, source_id: impl Into<String>) {
        let source_id = source_id.into();
        log::info!("new media source {source_id}");
        self.source_id = Some(source_id);
        self.current_time = 0.0;
        self.duration = 0.0;
        self.transport = Transport::Unready;
        let _ = self.position_sender.send(0.0);
    }

    /// Driver callback: the source is loaded and its duration known.
    /// Current volume and rate are pushed down at this point.
    pub fn on_ready(&mut self, duration: f64) {
        log::info!("media ready, duration {duration:.2}s");
        self.duration = duration.max(0.0);
        if self.transport == Transport::Unready {
            self.transport = Transport::Ready;
        }
        let volume = if self.is_muted { 0 } else { self.volume };
        if let Some(driver) = self.driver.as_deref_mut() {
            driver.set_volume(volume);
            driver.set_rate(self.rate);
        }
    }

    /// Driver callback: periodic position report.
    ///
    /// While looping with both bounds set, a tick at or past the loop end
    /// seeks back to the loop start instead of storing the overshot time,
    /// so the stored time never advances past the end of the loop.
    pub fn on_time_tick(&mut self, seconds: f64) {
        if self.loop_region.enabled {
            if let (Some(start), Some(end)) = (self.loop_region.start, self.loop_region.end) {
                if seconds >= end {
                    log::debug!("loop wrap at {seconds:.2}s, seeking back to {start:.2}s");
                    if let Some(driver) = self.driver.as_deref_mut() {
                        driver.seek(start);
                    }
                    return;
                }
            }
        }
        self.current_time = seconds;
        let _ = self.position_sender.send(seconds);
    }

    /// Driver callback: playback started or stopped outside our control.
    pub fn on_state_change(&mut self, playing: bool) {
        if self.transport == Transport::Unready {
            return;
        }
        self.transport = if playing {
            Transport::Playing
        } else {
            Transport::Paused
        };
    }

    /// Driver callback: a playback error. The code passes through
    /// unmodified for the surrounding UI to interpret; no retry here.
    pub fn on_error(&self, code: i32) -> ChordSyncError {
        log::error!("media driver reported error code {code}");
        ChordSyncError::DriverError(code)
    }

    pub fn play(&mut self) {
        match self.transport {
            Transport::Unready => log::debug!("play ignored, media not ready"),
            Transport::Playing => {}
            Transport::Ready | Transport::Paused => {
                if let Some(driver) = self.driver.as_deref_mut() {
                    driver.play();
                }
                self.transport = Transport::Playing;
            }
        }
    }

    pub fn pause(&mut self) {
        if self.transport == Transport::Playing {
            if let Some(driver) = self.driver.as_deref_mut() {
                driver.pause();
            }
            self.transport = Transport::Paused;
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Volume 0 implies muted; any other value unmutes and is remembered
    /// for the next unmute.
    pub fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(100);
        if volume == 0 {
            self.is_muted = true;
        } else {
            self.is_muted = false;
            self.last_volume = volume;
        }
        self.volume = volume;
        if let Some(driver) = self.driver.as_deref_mut() {
            driver.set_volume(volume);
        }
    }

    pub fn toggle_mute(&mut self) {
        if self.is_muted {
            let restored = if self.last_volume == 0 {
                DEFAULT_VOLUME
            } else {
                self.last_volume
            };
            self.is_muted = false;
            self.volume = restored;
            if let Some(driver) = self.driver.as_deref_mut() {
                driver.unmute();
                driver.set_volume(restored);
            }
        } else {
            self.is_muted = true;
            if let Some(driver) = self.driver.as_deref_mut() {
                driver.mute();
            }
        }
    }

    /// Unsupported rates snap to the nearest member of [`SUPPORTED_RATES`].
    pub fn set_rate(&mut self, rate: f64) {
        let snapped = snap_rate(rate);
        if (snapped - rate).abs() > f64::EPSILON {
            log::debug!("rate {rate} snapped to {snapped}");
        }
        self.rate = snapped;
        if let Some(driver) = self.driver.as_deref_mut() {
            driver.set_rate(snapped);
        }
    }

    /// Seek clamped into `[0, duration]`.
    pub fn seek(&mut self, seconds: f64) {
        let target = seconds.clamp(0.0, self.duration);
        if let Some(driver) = self.driver.as_deref_mut() {
            driver.seek(target);
        }
        self.current_time = target;
        let _ = self.position_sender.send(target);
    }

    pub fn seek_relative(&mut self, delta: f64) {
        self.seek(self.current_time + delta);
    }

    /// Loop bounds clamp so that `start <= end` always holds.
    pub fn set_loop_start(&mut self, seconds: f64) {
        let upper = self.loop_region.end.unwrap_or(self.known_end());
        self.loop_region.start = Some(seconds.clamp(0.0, upper));
    }

    pub fn set_loop_end(&mut self, seconds: f64) {
        let lower = self.loop_region.start.unwrap_or(0.0);
        self.loop_region.end = Some(seconds.clamp(lower, self.known_end()));
    }

    pub fn set_loop_region(&mut self, start: f64, end: f64) {
        self.set_loop_start(start.min(end));
        self.set_loop_end(end);
    }

    pub fn apply_preset(&mut self, preset: &LoopPreset) {
        log::info!("applying loop preset {:?}", preset.name);
        self.set_loop_region(preset.start, preset.end);
        self.loop_region.enabled = true;
    }

    pub fn toggle_loop(&mut self) {
        self.loop_region.enabled = !self.loop_region.enabled;
    }

    /// Clears both bounds and disables looping in one step.
    pub fn clear_loop(&mut self) {
        self.loop_region = LoopRegion::default();
    }

    fn known_end(&self) -> f64 {
        if self.duration > 0.0 {
            self.duration
        } else {
            f64::INFINITY
        }
    }
}

fn snap_rate(rate: f64) -> f64 {
    SUPPORTED_RATES
        .iter()
        .copied()
        .min_by(|a, b| (a - rate).abs().total_cmp(&(b - rate).abs()))
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum DriverCall {
        Play,
        Pause,
        Seek(f64),
        SetVolume(u8),
        SetRate(f64),
        Mute,
        Unmute,
    }

    #[derive(Default)]
    struct RecordingDriver {
        calls: Rc<RefCell<Vec<DriverCall>>>,
    }

    impl MediaDriver for RecordingDriver {
        fn play(&mut self) {
            self.calls.borrow_mut().push(DriverCall::Play);
        }
        fn pause(&mut self) {
            self.calls.borrow_mut().push(DriverCall::Pause);
        }
        fn seek(&mut self, seconds: f64) {
            self.calls.borrow_mut().push(DriverCall::Seek(seconds));
        }
        fn set_volume(&mut self, volume: u8) {
            self.calls.borrow_mut().push(DriverCall::SetVolume(volume));
        }
        fn set_rate(&mut self, rate: f64) {
            self.calls.borrow_mut().push(DriverCall::SetRate(rate));
        }
        fn mute(&mut self) {
            self.calls.borrow_mut().push(DriverCall::Mute);
        }
        fn unmute(&mut self) {
            self.calls.borrow_mut().push(DriverCall::Unmute);
        }
    }

    fn player_with_driver() -> (Player, Rc<RefCell<Vec<DriverCall>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut player = Player::new();
        player.attach_driver(Box::new(RecordingDriver {
            calls: calls.clone(),
        }));
        (player, calls)
    }

    #[test]
    fn test_ready_pushes_volume_and_rate() {
        let (mut player, calls) = player_with_driver();
        player.set_source("song-1");
        assert_eq!(player.transport(), Transport::Unready);
        player.on_ready(180.0);
        assert_eq!(player.transport(), Transport::Ready);
        assert_eq!(player.duration(), 180.0);
        assert_eq!(
            calls.borrow().as_slice(),
            &[DriverCall::SetVolume(100), DriverCall::SetRate(1.0)]
        );
    }

    #[test]
    fn test_new_source_resets_position_state() {
        let (mut player, _calls) = player_with_driver();
        player.on_ready(180.0);
        player.on_time_tick(42.0);
        player.play();
        player.set_source("song-2");
        assert_eq!(player.transport(), Transport::Unready);
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.duration(), 0.0);
    }

    #[test]
    fn test_play_requires_ready() {
        let (mut player, calls) = player_with_driver();
        player.play();
        assert_eq!(player.transport(), Transport::Unready);
        assert!(calls.borrow().is_empty());
        player.on_ready(60.0);
        player.toggle_play();
        assert!(player.is_playing());
        player.toggle_play();
        assert_eq!(player.transport(), Transport::Paused);
        assert!(calls.borrow().contains(&DriverCall::Play));
        assert!(calls.borrow().contains(&DriverCall::Pause));
    }

    #[test]
    fn test_loop_wrap_never_stores_overshoot() {
        let (mut player, calls) = player_with_driver();
        player.on_ready(120.0);
        player.set_loop_region(30.0, 40.0);
        player.toggle_loop();
        player.on_time_tick(35.0);
        assert_eq!(player.current_time(), 35.0);
        player.on_time_tick(40.1);
        // overshoot is replaced by a seek to the loop start
        assert_eq!(player.current_time(), 35.0);
        assert_eq!(*calls.borrow().last().unwrap(), DriverCall::Seek(30.0));
        // the driver's post-seek tick is stored normally
        player.on_time_tick(30.0);
        assert_eq!(player.current_time(), 30.0);
    }

    #[test]
    fn test_loop_disabled_stores_any_time() {
        let (mut player, _calls) = player_with_driver();
        player.on_ready(120.0);
        player.set_loop_region(30.0, 40.0);
        player.on_time_tick(55.0);
        assert_eq!(player.current_time(), 55.0);
    }

    #[test]
    fn test_loop_bounds_keep_invariant() {
        let mut player = Player::new();
        player.on_ready(100.0);
        player.set_loop_end(50.0);
        player.set_loop_start(80.0);
        let region = player.loop_region();
        assert_eq!(region.start, Some(50.0));
        player.set_loop_end(200.0);
        assert_eq!(player.loop_region().end, Some(100.0));
        player.clear_loop();
        assert_eq!(player.loop_region(), LoopRegion::default());
    }

    #[test]
    fn test_volume_zero_mutes_and_unmute_restores() {
        let (mut player, calls) = player_with_driver();
        player.set_volume(70);
        assert!(!player.is_muted());
        player.set_volume(0);
        assert!(player.is_muted());
        player.toggle_mute();
        assert!(!player.is_muted());
        assert_eq!(player.volume(), 70);
        assert!(calls.borrow().contains(&DriverCall::Unmute));
        assert!(calls.borrow().contains(&DriverCall::SetVolume(70)));
    }

    #[test]
    fn test_volume_clamped_to_100() {
        let mut player = Player::new();
        player.set_volume(250);
        assert_eq!(player.volume(), 100);
    }

    #[test]
    fn test_rate_snaps_to_supported_set() {
        let (mut player, calls) = player_with_driver();
        player.set_rate(1.3);
        assert_eq!(player.rate(), 1.25);
        player.set_rate(10.0);
        assert_eq!(player.rate(), 2.0);
        player.set_rate(0.0);
        assert_eq!(player.rate(), 0.25);
        assert!(calls.borrow().contains(&DriverCall::SetRate(1.25)));
    }

    #[test]
    fn test_seek_clamps_into_duration() {
        let (mut player, calls) = player_with_driver();
        player.on_ready(90.0);
        player.seek(300.0);
        assert_eq!(player.current_time(), 90.0);
        player.seek_relative(-500.0);
        assert_eq!(player.current_time(), 0.0);
        assert!(calls.borrow().contains(&DriverCall::Seek(90.0)));
    }

    #[test]
    fn test_mutators_work_without_driver() {
        let mut player = Player::new();
        player.on_ready(60.0);
        player.play();
        player.set_volume(30);
        player.set_rate(1.5);
        player.seek(10.0);
        assert!(player.is_playing());
        assert_eq!(player.volume(), 30);
        assert_eq!(player.rate(), 1.5);
        assert_eq!(player.current_time(), 10.0);
    }

    #[test]
    fn test_position_subscription_sees_ticks() {
        let mut player = Player::new();
        player.on_ready(60.0);
        let receiver = player.subscribe_position();
        player.on_time_tick(12.5);
        assert_eq!(*receiver.borrow(), 12.5);
    }

    #[test]
    fn test_driver_error_passes_through() {
        let player = Player::new();
        let error = player.on_error(150);
        assert!(matches!(error, ChordSyncError::DriverError(150)));
    }
}
