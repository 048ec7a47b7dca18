//! Concurrency Supervisor (C10): owns every long-lived periodic task,
//! coordinates graceful shutdown, and reconciles running state against a
//! reloaded configuration. Generalizes the teacher's `state.rs`
//! `Mutex<Option<JoinHandle<()>>>` single-task pattern into a named-component
//! registry, since this service runs several independent periodic loops
//! instead of one.

use crate::config::Config;
use crate::fingerprint::scanner::FingerprintCache;
use crate::monitors;
use crate::netscan::{self, CycleConfig};
use crate::store::DbPool;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const LOCAL_JOIN_TIMEOUT: Duration = Duration::from_secs(1);
const GLOBAL_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

const NETWORK_SCANNER: &str = "network_scanner";
const INTERNET_HEALTH: &str = "internet_health";
const WEBSITES: &str = "websites";
const SECURITY: &str = "security";

struct ComponentHandle {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owns the set of running background tasks. All public methods lock the
/// internal registry briefly and return; none hold it across an await.
pub struct Supervisor {
    pool: DbPool,
    global_stop_tx: watch::Sender<bool>,
    global_stop_rx: watch::Receiver<bool>,
    components: std::sync::Mutex<HashMap<&'static str, ComponentHandle>>,
}

impl Supervisor {
    pub fn new(pool: DbPool) -> Self {
        let (global_stop_tx, global_stop_rx) = watch::channel(false);
        Self {
            pool,
            global_stop_tx,
            global_stop_rx,
            components: std::sync::Mutex::new(HashMap::new()),
        }
    }

    fn is_active(&self, name: &str) -> bool {
        let components = self.components.lock().unwrap();
        components.get(name).map(|c| !c.handle.is_finished()).unwrap_or(false)
    }

    fn register(&self, name: &'static str, stop_tx: watch::Sender<bool>, handle: JoinHandle<()>) {
        let mut components = self.components.lock().unwrap();
        components.insert(name, ComponentHandle { stop_tx, handle });
    }

    /// Stop one component, waiting up to `LOCAL_JOIN_TIMEOUT` before
    /// aborting it outright.
    pub async fn stop(&self, name: &str) {
        let taken = {
            let mut components = self.components.lock().unwrap();
            components.remove(name)
        };
        let Some(component) = taken else { return };
        let _ = component.stop_tx.send(true);
        if tokio::time::timeout(LOCAL_JOIN_TIMEOUT, component.handle).await.is_err() {
            log::warn!("{name} did not stop within {LOCAL_JOIN_TIMEOUT:?}, task left to finish or be dropped");
        }
    }

    /// Signal every component to stop, then wait up to `GLOBAL_JOIN_TIMEOUT`
    /// in total for all of them, aborting stragglers.
    pub async fn shutdown(self: &std::sync::Arc<Self>) {
        let _ = self.global_stop_tx.send(true);
        let names: Vec<&'static str> = {
            let components = self.components.lock().unwrap();
            components.keys().copied().collect()
        };
        let deadline = tokio::time::Instant::now() + GLOBAL_JOIN_TIMEOUT;
        for name in names {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            let taken = {
                let mut components = self.components.lock().unwrap();
                components.remove(name)
            };
            if let Some(component) = taken {
                if tokio::time::timeout(remaining, component.handle).await.is_err() {
                    log::warn!("{name} did not stop during shutdown, abandoning it");
                }
            }
        }
    }

    pub fn start_network_scanner(&self, config: &Config) {
        if self.is_active(NETWORK_SCANNER) {
            return;
        }
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let mut global_stop_rx = self.global_stop_rx.clone();
        let pool = self.pool.clone();
        let network = config.network.clone();
        let fingerprinting = config.fingerprinting.clone();
        let alerts = config.alerts.clone();
        let telegram = config.telegram.clone();
        let interval = Duration::from_secs(config.general.scan_interval);

        let handle = tokio::spawn(async move {
            log::info!("starting network scanner loop");
            let cache = FingerprintCache::new();
            let mut previous_macs: HashSet<String> = HashSet::new();

            loop {
                if *stop_rx.borrow() || *global_stop_rx.borrow() {
                    break;
                }
                let cfg = CycleConfig {
                    network: &network,
                    fingerprinting: &fingerprinting,
                    alerts: &alerts,
                    telegram: &telegram,
                };
                if let Err(err) = netscan::run_cycle(&pool, &cfg, &cache, &mut previous_macs, false).await {
                    log::error!("network scanner cycle failed: {err}");
                }
                if interruptible_sleep(interval, &mut stop_rx, &mut global_stop_rx).await {
                    break;
                }
            }
            log::info!("network scanner loop stopped");
        });

        self.register(NETWORK_SCANNER, stop_tx, handle);
    }

    pub fn start_internet_health(&self, config: &Config) {
        if self.is_active(INTERNET_HEALTH) {
            return;
        }
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let mut global_stop_rx = self.global_stop_rx.clone();
        let pool = self.pool.clone();
        let alerts = config.alerts.clone();
        let telegram = config.telegram.clone();
        let interval = Duration::from_secs(config.monitoring.internet_health.interval);

        let handle = tokio::spawn(async move {
            log::info!("starting internet health monitor loop");
            loop {
                if *stop_rx.borrow() || *global_stop_rx.borrow() {
                    break;
                }
                monitors::speed::run_cycle(&pool, &alerts, &telegram).await;
                if interruptible_sleep(interval, &mut stop_rx, &mut global_stop_rx).await {
                    break;
                }
            }
            log::info!("internet health monitor loop stopped");
        });

        self.register(INTERNET_HEALTH, stop_tx, handle);
    }

    pub fn start_websites(&self, config: &Config) {
        if self.is_active(WEBSITES) {
            return;
        }
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let mut global_stop_rx = self.global_stop_rx.clone();
        let pool = self.pool.clone();
        let alerts = config.alerts.clone();
        let telegram = config.telegram.clone();
        let urls = config.monitoring.websites.urls.clone();
        let interval = Duration::from_secs(config.monitoring.websites.interval);

        let handle = tokio::spawn(async move {
            log::info!("starting website monitor loop");
            loop {
                if *stop_rx.borrow() || *global_stop_rx.borrow() {
                    break;
                }
                monitors::website::run_cycle(&pool, &alerts, &telegram, &urls).await;
                if interruptible_sleep(interval, &mut stop_rx, &mut global_stop_rx).await {
                    break;
                }
            }
            log::info!("website monitor loop stopped");
        });

        self.register(WEBSITES, stop_tx, handle);
    }

    pub fn start_security(&self, config: &Config) {
        if self.is_active(SECURITY) {
            return;
        }
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let mut global_stop_rx = self.global_stop_rx.clone();
        let pool = self.pool.clone();
        let alerts = config.alerts.clone();
        let telegram = config.telegram.clone();
        let interval = Duration::from_secs(config.monitoring.security.interval);

        let handle = tokio::spawn(async move {
            log::info!("starting security monitor loop");
            loop {
                if *stop_rx.borrow() || *global_stop_rx.borrow() {
                    break;
                }
                monitors::security::run_cycle(&pool, &alerts, &telegram).await;
                if interruptible_sleep(interval, &mut stop_rx, &mut global_stop_rx).await {
                    break;
                }
            }
            log::info!("security monitor loop stopped");
        });

        self.register(SECURITY, stop_tx, handle);
    }

    /// Start every component enabled in `config` that isn't already running.
    pub fn start_all(&self, config: &Config) {
        self.start_network_scanner(config);
        if config.monitoring.internet_health.enabled {
            self.start_internet_health(config);
        }
        if config.monitoring.websites.enabled {
            self.start_websites(config);
        }
        if config.monitoring.security.enabled {
            self.start_security(config);
        }
    }

    /// Reconcile running tasks against a freshly reloaded config: start an
    /// enabled-but-inactive component, stop an active-but-disabled one,
    /// restart the network scanner when its fingerprinting toggle flipped.
    /// Idempotent.
    pub async fn reconcile(&self, previous: &Config, current: &Config) {
        if previous.fingerprinting.enabled != current.fingerprinting.enabled {
            self.stop(NETWORK_SCANNER).await;
        }
        self.start_network_scanner(current);

        reconcile_toggle(
            self,
            INTERNET_HEALTH,
            current.monitoring.internet_health.enabled,
            current,
            Self::start_internet_health,
        )
        .await;
        reconcile_toggle(self, WEBSITES, current.monitoring.websites.enabled, current, Self::start_websites).await;
        reconcile_toggle(self, SECURITY, current.monitoring.security.enabled, current, Self::start_security).await;
    }
}

async fn reconcile_toggle(
    supervisor: &Supervisor,
    name: &'static str,
    enabled: bool,
    config: &Config,
    start: fn(&Supervisor, &Config),
) {
    let active = supervisor.is_active(name);
    if enabled && !active {
        start(supervisor, config);
    } else if !enabled && active {
        supervisor.stop(name).await;
    }
}

/// Sleep for `duration`, waking early if either stop signal fires. Returns
/// `true` if a stop signal caused the early wake.
async fn interruptible_sleep(
    duration: Duration,
    local_stop: &mut watch::Receiver<bool>,
    global_stop: &mut watch::Receiver<bool>,
) -> bool {
    if *local_stop.borrow() || *global_stop.borrow() {
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = local_stop.changed() => true,
        _ = global_stop.changed() => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;

    fn test_config() -> Config {
        let dir = tempfile::tempdir().unwrap();
        Config::load(&dir.path().join("config.json")).unwrap()
    }

    #[tokio::test]
    async fn start_network_scanner_is_idempotent() {
        let pool = open_in_memory();
        let supervisor = Supervisor::new(pool);
        let config = test_config();
        supervisor.start_network_scanner(&config);
        assert!(supervisor.is_active(NETWORK_SCANNER));
        supervisor.start_network_scanner(&config);
        assert!(supervisor.is_active(NETWORK_SCANNER));
        supervisor.stop(NETWORK_SCANNER).await;
        assert!(!supervisor.is_active(NETWORK_SCANNER));
    }

    #[tokio::test]
    async fn reconcile_starts_newly_enabled_monitor() {
        let pool = open_in_memory();
        let supervisor = Supervisor::new(pool);
        let mut previous = test_config();
        previous.monitoring.websites.enabled = false;
        let mut current = test_config();
        current.monitoring.websites.enabled = true;

        supervisor.reconcile(&previous, &current).await;
        assert!(supervisor.is_active(WEBSITES));
    }

    #[tokio::test]
    async fn reconcile_stops_newly_disabled_monitor() {
        let pool = open_in_memory();
        let supervisor = Supervisor::new(pool);
        let mut enabled = test_config();
        enabled.monitoring.security.enabled = true;
        supervisor.start_security(&enabled);
        assert!(supervisor.is_active(SECURITY));

        let mut disabled = test_config();
        disabled.monitoring.security.enabled = false;
        supervisor.reconcile(&enabled, &disabled).await;
        assert!(!supervisor.is_active(SECURITY));
    }
}
