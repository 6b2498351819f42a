//! Supervised monitor threads.

use super::{dispatch_notification, MonitorError, NotificationSource};
use crate::config::MonitorConfig;
use crate::ports::NetQuery;
use lnn_bus::EventBus;
use lnn_telemetry::{metric_inc, MONITOR_HEALTHY, MONITOR_RESTARTS};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};

/// Observable state of one monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorHealth {
    /// Receiving notifications.
    Running,
    /// Waiting to restart after a read error.
    Backoff {
        /// Restart attempt about to happen (1-based).
        attempt: u32,
    },
    /// Gave up after exhausting restarts.
    Failed,
    /// Stopped normally.
    Stopped,
}

/// Handle to a supervised monitor thread.
pub struct MonitorHandle {
    name: String,
    health: Arc<Mutex<MonitorHealth>>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Monitor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current health.
    pub fn health(&self) -> MonitorHealth {
        *self.health.lock()
    }

    /// Ask the monitor to stop after its current read returns.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Wait for the monitor thread to exit and return its final health.
    pub fn join(mut self) -> MonitorHealth {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!(monitor = %self.name, "Monitor thread panicked");
                return MonitorHealth::Failed;
            }
        }
        self.health()
    }
}

struct Supervisor {
    source: Box<dyn NotificationSource>,
    name: String,
    policy: MonitorConfig,
    net: Arc<dyn NetQuery>,
    bus: Arc<EventBus>,
    health: Arc<Mutex<MonitorHealth>>,
    stop: Arc<AtomicBool>,
}

impl Supervisor {
    fn set_health(&self, health: MonitorHealth) {
        *self.health.lock() = health;
        let up = if health == MonitorHealth::Running { 1.0 } else { 0.0 };
        MONITOR_HEALTHY
            .with_label_values(&[self.name.as_str()])
            .set(up);
    }

    fn stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Read until the source errors. `Ok` means a normal stop.
    ///
    /// `delivered` is set once any batch has been read.
    fn pump(&mut self, delivered: &mut bool) -> Result<(), MonitorError> {
        loop {
            if self.stopping() {
                return Ok(());
            }
            let batch = match self.source.next_batch() {
                Ok(batch) => batch,
                Err(MonitorError::Closed) => return Ok(()),
                Err(e) => return Err(e),
            };
            *delivered = true;
            for notification in &batch {
                dispatch_notification(notification, &*self.net, &self.bus);
            }
        }
    }

    fn run(mut self) {
        let mut attempt = 0u32;
        loop {
            self.set_health(MonitorHealth::Running);
            let mut delivered = false;
            let err = match self.pump(&mut delivered) {
                Ok(()) => {
                    info!(monitor = %self.name, "Monitor stopped");
                    self.set_health(MonitorHealth::Stopped);
                    return;
                }
                Err(e) => e,
            };
            // The restart budget counts consecutive failures only.
            if delivered {
                attempt = 0;
            }

            // Reopen until it succeeds or restarts run out.
            let mut last_err = err;
            loop {
                attempt += 1;
                if !self.policy.allows_restart(attempt) || self.stopping() {
                    error!(monitor = %self.name, error = %last_err, "Monitor failed");
                    self.set_health(MonitorHealth::Failed);
                    return;
                }

                let delay = self.policy.backoff(attempt);
                warn!(
                    monitor = %self.name,
                    error = %last_err,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Monitor read failed, restarting"
                );
                self.set_health(MonitorHealth::Backoff { attempt });
                thread::sleep(delay);
                metric_inc!(MONITOR_RESTARTS, &[self.name.as_str()]);

                match self.source.open() {
                    Ok(()) => break,
                    Err(e) => last_err = e,
                }
            }
        }
    }
}

/// Open every source in order and start one supervised thread per source.
///
/// Fails fast if a required source cannot open; monitors already started
/// are stopped. Optional sources that fail to open are skipped.
pub fn start_monitors(
    sources: Vec<Box<dyn NotificationSource>>,
    policy: &MonitorConfig,
    net: Arc<dyn NetQuery>,
    bus: Arc<EventBus>,
) -> Result<Vec<MonitorHandle>, MonitorError> {
    let mut handles: Vec<MonitorHandle> = Vec::new();

    for mut source in sources {
        let name = source.name().to_string();
        if let Err(e) = source.open() {
            if source.required() {
                error!(monitor = %name, error = %e, "Required monitor failed to start");
                for handle in &handles {
                    handle.stop();
                }
                return Err(MonitorError::StartFailed {
                    name,
                    reason: e.to_string(),
                });
            }
            warn!(monitor = %name, error = %e, "Optional monitor skipped");
            continue;
        }

        let health = Arc::new(Mutex::new(MonitorHealth::Running));
        let stop = Arc::new(AtomicBool::new(false));
        let supervisor = Supervisor {
            source,
            name: name.clone(),
            policy: policy.clone(),
            net: net.clone(),
            bus: bus.clone(),
            health: health.clone(),
            stop: stop.clone(),
        };

        let spawned = thread::Builder::new()
            .name(format!("lnn-monitor-{name}"))
            .spawn(move || supervisor.run());
        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                for handle in &handles {
                    handle.stop();
                }
                return Err(MonitorError::StartFailed {
                    name,
                    reason: e.to_string(),
                });
            }
        };

        info!(monitor = %name, "Monitor started");
        handles.push(MonitorHandle {
            name,
            health,
            stop,
            thread: Some(thread),
        });
    }

    Ok(handles)
}
