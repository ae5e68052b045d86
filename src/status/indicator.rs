use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::PlaybackState;
use crate::status::led::{Led, LedDriver};

type SharedDriver = Arc<Mutex<Box<dyn LedDriver>>>;

/// Granularity at which the blink thread notices it should stop.
const STOP_POLL: Duration = Duration::from_millis(20);

/// Mirrors playback state on three LEDs: green blinks while playing,
/// yellow is solid while paused, red is solid otherwise.
pub struct StatusIndicator {
    driver: SharedDriver,
    blink_interval: Duration,
    blinking: Arc<AtomicBool>,
    blink_thread: Option<thread::JoinHandle<()>>,
}

impl StatusIndicator {
    pub fn new(driver: Box<dyn LedDriver>, blink_interval: Duration) -> Self {
        Self {
            driver: Arc::new(Mutex::new(driver)),
            blink_interval,
            blinking: Arc::new(AtomicBool::new(false)),
            blink_thread: None,
        }
    }

    pub fn show(&mut self, state: PlaybackState) {
        log::debug!("Status LEDs showing {:?}", state);
        match state {
            PlaybackState::Playing => {
                set_leds(&self.driver, &[(Led::Red, false), (Led::Yellow, false)]);
                self.start_blinking();
            }
            PlaybackState::Paused => {
                self.stop_blinking();
                set_leds(&self.driver, &[(Led::Red, false), (Led::Yellow, true), (Led::Green, false)]);
            }
            PlaybackState::Stopped | PlaybackState::Empty => {
                self.stop_blinking();
                set_leds(&self.driver, &[(Led::Red, true), (Led::Yellow, false), (Led::Green, false)]);
            }
        }
    }

    pub fn is_blinking(&self) -> bool {
        self.blink_thread.is_some()
    }

    fn start_blinking(&mut self) {
        if self.blink_thread.is_some() {
            return;
        }

        self.blinking.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.blinking);
        let driver = Arc::clone(&self.driver);
        let interval = self.blink_interval;

        let spawned = thread::Builder::new()
            .name("status-led-blink".to_string())
            .spawn(move || {
                let mut lit = false;
                while running.load(Ordering::SeqCst) {
                    lit = !lit;
                    set_leds(&driver, &[(Led::Green, lit)]);

                    let deadline = Instant::now() + interval;
                    while running.load(Ordering::SeqCst) && Instant::now() < deadline {
                        thread::sleep(STOP_POLL.min(interval));
                    }
                }
                log::debug!("LED blink thread exiting");
            });

        match spawned {
            Ok(handle) => self.blink_thread = Some(handle),
            Err(e) => {
                log::error!("Failed to spawn LED blink thread: {}", e);
                self.blinking.store(false, Ordering::SeqCst);
            }
        }
    }

    fn stop_blinking(&mut self) {
        self.blinking.store(false, Ordering::SeqCst);
        if let Some(handle) = self.blink_thread.take() {
            if let Err(e) = handle.join() {
                log::warn!("LED blink thread didn't join cleanly: {:?}", e);
            }
        }
    }
}

impl Drop for StatusIndicator {
    fn drop(&mut self) {
        self.stop_blinking();
        let all_off: Vec<(Led, bool)> = Led::ALL.iter().map(|&led| (led, false)).collect();
        set_leds(&self.driver, &all_off);
    }
}

fn set_leds(driver: &SharedDriver, states: &[(Led, bool)]) {
    let mut driver = match driver.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    for &(led, on) in states {
        if let Err(e) = driver.set(led, on) {
            log::warn!("Failed to set LED {:?}: {}", led, e);
        }
    }
}
