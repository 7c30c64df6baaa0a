//! Session lifecycle for the built-in controller: owns the device handle,
//! the periodic input/motion ticks and the rumble test loop, and wires the
//! normalizers, haptic mapper and pointer bridge together.
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::{DeviceProfile, HapticProfile};
use crate::drivers::deck::driver::Driver;
use crate::drivers::deck::hid_report::{PackedInputDataReport, LIZARD_SLEEP_SEC};

use super::haptics::HapticCurveMapper;
use super::motion::normalize_motion;
use super::normalize::StateNormalizer;
use super::pointer::{uinput::VirtualPointer, PointerBridge};
use super::state::{ButtonFlags, CanonicalControllerState, MotionSample};

/// Interval between input normalization ticks
const INPUT_TICK: Duration = Duration::from_millis(4);
/// Interval between motion normalization ticks
const MOTION_TICK: Duration = Duration::from_millis(10);
/// Interval between rumble test toggles
const RUMBLE_TOGGLE: Duration = Duration::from_millis(100);
/// Size of the [SessionCommand] buffer
const BUFFER_SIZE: usize = 2048;
/// Max commands drained per device loop iteration
const MAX_COMMANDS: u8 = 64;

/// Commands handled by the device task.
#[derive(Debug, Clone, Copy)]
pub enum SessionCommand {
    SetVibration { large_motor: u8, small_motor: u8 },
    SetVibrationStrength(f64),
    SetLizardButtons(bool),
    Stop,
}

/// State published to the downstream consumer.
#[derive(Debug, Clone, Copy)]
pub enum ControllerUpdate {
    Inputs(CanonicalControllerState),
    Motion(MotionSample),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Closed,
    Opening,
    Open,
}

/// Controller session. Opens the hidraw device, runs the device poll loop and
/// the two normalization ticks, and forwards vibration requests to the haptic
/// mapper. If the device fails to open the session stays [SessionState::Closed]
/// and every operation is a no-op.
pub struct Session {
    device_path: String,
    profile: DeviceProfile,
    state: SessionState,
    updates: mpsc::Sender<ControllerUpdate>,
    command_tx: mpsc::Sender<SessionCommand>,
    command_rx: Option<mpsc::Receiver<SessionCommand>>,
    /// Latest raw report slot: single writer (device task), read by both ticks
    latest: Arc<Mutex<Option<PackedInputDataReport>>>,
    /// Externally forced button bits OR-ed into every normalized state
    injected: Arc<Mutex<ButtonFlags>>,
    lizard_mouse: Arc<AtomicBool>,
    device_task: Option<JoinHandle<()>>,
    input_task: Option<JoinHandle<()>>,
    motion_task: Option<JoinHandle<()>>,
    rumble_task: Option<JoinHandle<()>>,
}

impl Session {
    pub fn new(
        device_path: String,
        profile: DeviceProfile,
        updates: mpsc::Sender<ControllerUpdate>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(BUFFER_SIZE);
        Self {
            device_path,
            profile,
            state: SessionState::default(),
            updates,
            command_tx,
            command_rx: Some(command_rx),
            latest: Arc::new(Mutex::new(None)),
            injected: Arc::new(Mutex::new(ButtonFlags::empty())),
            lizard_mouse: Arc::new(AtomicBool::new(false)),
            device_task: None,
            input_task: None,
            motion_task: None,
            rumble_task: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Open the device and start the device poll loop and both ticks. An open
    /// failure is logged and leaves the session closed and inert.
    pub async fn open(&mut self) {
        if self.state != SessionState::Closed {
            return;
        }
        let Some(command_rx) = self.command_rx.take() else {
            log::warn!("Session was already closed and cannot be reopened");
            return;
        };
        self.state = SessionState::Opening;

        let path = self.device_path.clone();
        let driver = match tokio::task::spawn_blocking(move || Driver::new(path)).await {
            Ok(Ok(driver)) => driver,
            Ok(Err(e)) => {
                log::error!("Failed to open controller device: {e:?}");
                self.state = SessionState::Closed;
                return;
            }
            Err(e) => {
                log::error!("Failed to join device open task: {e:?}");
                self.state = SessionState::Closed;
                return;
            }
        };
        log::debug!("Opened controller device {}", self.device_path);

        // Blocking device task: polls reports into the latest-report slot and
        // services vibration/lizard commands.
        let latest = self.latest.clone();
        let haptic_profile = self.profile.haptics;
        self.device_task = Some(tokio::task::spawn_blocking(move || {
            device_loop(driver, command_rx, latest, haptic_profile);
        }));

        self.input_task = Some(self.spawn_input_tick());
        self.motion_task = Some(self.spawn_motion_tick());

        self.state = SessionState::Open;
    }

    /// Stop the ticks and the rumble loop, then the device task, releasing
    /// the device handle last.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        let ticks = [
            self.input_task.take(),
            self.motion_task.take(),
            self.rumble_task.take(),
        ];
        for task in ticks.into_iter().flatten() {
            task.abort();
            let _ = task.await;
        }

        let _ = self.command_tx.send(SessionCommand::Stop).await;
        if let Some(task) = self.device_task.take() {
            if let Err(e) = task.await {
                log::debug!("Device task ended with error: {e:?}");
            }
        }

        self.state = SessionState::Closed;
        log::debug!("Controller session closed");
    }

    /// Forward a vibration request to the haptic mapper.
    pub async fn set_vibration(&self, large_motor: u8, small_motor: u8) {
        if self.state != SessionState::Open {
            return;
        }
        let cmd = SessionCommand::SetVibration {
            large_motor,
            small_motor,
        };
        if self.command_tx.send(cmd).await.is_err() {
            log::debug!("Dropped vibration request; device task is gone");
        }
    }

    /// Set the global vibration strength (0.0..=1.0) and play a single rumble
    /// pulse as feedback.
    pub async fn set_vibration_strength(&mut self, value: f64) {
        if self.state != SessionState::Open {
            return;
        }
        let cmd = SessionCommand::SetVibrationStrength(value.clamp(0.0, 1.0));
        if self.command_tx.send(cmd).await.is_err() {
            log::debug!("Dropped vibration strength change; device task is gone");
        }
        self.rumble(1);
    }

    /// Play the rumble test pattern: alternate max/zero vibration every
    /// 100ms, 2 * repeat times, on an independent cancellable task.
    pub fn rumble(&mut self, repeat: u32) {
        if self.state != SessionState::Open {
            return;
        }
        if let Some(task) = self.rumble_task.take() {
            task.abort();
        }

        let tx = self.command_tx.clone();
        self.rumble_task = Some(tokio::spawn(async move {
            for i in 0..repeat * 2 {
                let level = if i % 2 == 0 { u8::MAX } else { 0 };
                let cmd = SessionCommand::SetVibration {
                    large_motor: level,
                    small_motor: level,
                };
                if tx.send(cmd).await.is_err() {
                    break;
                }
                tokio::time::sleep(RUMBLE_TOGGLE).await;
            }
        }));
    }

    /// Externally force button bits into every published state (e.g.
    /// synthetic combo buttons).
    pub fn set_injected_buttons(&self, mask: ButtonFlags) {
        if let Ok(mut injected) = self.injected.lock() {
            *injected = mask;
        }
    }

    /// Gate the legacy mouse pass-through (trackpad clicks injecting
    /// synthetic mouse buttons).
    pub fn set_lizard_mouse(&self, enabled: bool) {
        self.lizard_mouse.store(enabled, Ordering::Relaxed);
    }

    /// Gate the legacy button pass-through (the controller's built-in input
    /// mappings).
    pub async fn set_lizard_buttons(&self, enabled: bool) {
        if self.state != SessionState::Open {
            return;
        }
        let cmd = SessionCommand::SetLizardButtons(enabled);
        if self.command_tx.send(cmd).await.is_err() {
            log::debug!("Dropped lizard buttons change; device task is gone");
        }
    }

    fn spawn_input_tick(&self) -> JoinHandle<()> {
        let latest = self.latest.clone();
        let injected = self.injected.clone();
        let lizard_mouse = self.lizard_mouse.clone();
        let updates = self.updates.clone();
        let thresholds = self.profile.thresholds;

        tokio::spawn(async move {
            let mut normalizer = StateNormalizer::new(thresholds);
            let mut bridge = match VirtualPointer::new() {
                Ok(pointer) => Some(PointerBridge::new(pointer)),
                Err(e) => {
                    log::warn!("Failed to create virtual pointer; legacy mouse pass-through disabled: {e:?}");
                    None
                }
            };

            let mut interval = tokio::time::interval(INPUT_TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;

                let Some(report) = snapshot(&latest) else {
                    continue;
                };
                let injected_mask = injected.lock().map(|mask| *mask).unwrap_or_default();
                let Some(state) = normalizer.update(&report, injected_mask) else {
                    continue;
                };

                if lizard_mouse.load(Ordering::Relaxed) {
                    if let Some(bridge) = bridge.as_mut() {
                        bridge.update(state.left_pad_click, state.right_pad_click);
                    }
                }

                if updates.send(ControllerUpdate::Inputs(state)).await.is_err() {
                    log::debug!("Update channel closed; stopping input tick");
                    break;
                }
            }
        })
    }

    fn spawn_motion_tick(&self) -> JoinHandle<()> {
        let latest = self.latest.clone();
        let updates = self.updates.clone();
        let profile = self.profile.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(MOTION_TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;

                let Some(report) = snapshot(&latest) else {
                    continue;
                };
                let sample = normalize_motion(&report, &profile);

                if updates
                    .send(ControllerUpdate::Motion(sample))
                    .await
                    .is_err()
                {
                    log::debug!("Update channel closed; stopping motion tick");
                    break;
                }
            }
        })
    }
}

/// Copy the latest report out from under the slot lock. Readers always see a
/// complete report; the lock is held only for the copy.
fn snapshot(latest: &Arc<Mutex<Option<PackedInputDataReport>>>) -> Option<PackedInputDataReport> {
    latest.lock().ok().and_then(|slot| *slot)
}

/// Device poll loop. Runs on a blocking task: reads input reports into the
/// latest-report slot (last writer wins, no queue) and drains session
/// commands between reads. Returns when stopped or on a read failure.
fn device_loop(
    mut driver: Driver,
    mut command_rx: mpsc::Receiver<SessionCommand>,
    latest: Arc<Mutex<Option<PackedInputDataReport>>>,
    haptic_profile: HapticProfile,
) {
    let mut haptics = HapticCurveMapper::new(haptic_profile);
    let mut strength: f64 = 1.0;
    let mut lizard_buttons = false;
    let mut last_mappings_clear = Instant::now();

    // Start with the built-in mappings disabled; the driver owns the inputs
    if let Err(e) = driver.set_lizard_mode(false) {
        log::debug!("Failed to clear built-in mappings: {e:?}");
    }

    loop {
        match driver.read_report() {
            Ok(Some(report)) => {
                if let Ok(mut slot) = latest.lock() {
                    *slot = Some(report);
                }
            }
            Ok(None) => (),
            Err(e) => {
                log::error!("Failed to read input report: {e:?}");
                break;
            }
        }

        // Keyboard emulation re-enables itself after a few seconds, so it has
        // to be cleared again periodically while pass-through is off.
        if !lizard_buttons && last_mappings_clear.elapsed().as_secs() >= LIZARD_SLEEP_SEC {
            if let Err(e) = driver.set_lizard_mode(false) {
                log::debug!("Failed to clear built-in mappings: {e:?}");
            }
            last_mappings_clear = Instant::now();
        }

        let mut commands_processed = 0;
        loop {
            match command_rx.try_recv() {
                Ok(SessionCommand::SetVibration {
                    large_motor,
                    small_motor,
                }) => {
                    haptics.set_vibration(large_motor, small_motor, strength, &mut driver);
                }
                Ok(SessionCommand::SetVibrationStrength(value)) => {
                    strength = value.clamp(0.0, 1.0);
                }
                Ok(SessionCommand::SetLizardButtons(enabled)) => {
                    lizard_buttons = enabled;
                    if let Err(e) = driver.set_lizard_mode(enabled) {
                        log::debug!("Failed to set built-in mappings: {e:?}");
                    }
                }
                Ok(SessionCommand::Stop) => {
                    log::debug!("Stopping device loop");
                    return;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Command channel disconnected; stopping device loop");
                    return;
                }
            }

            commands_processed += 1;
            if commands_processed >= MAX_COMMANDS {
                break;
            }
        }
    }
}
