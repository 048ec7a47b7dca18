//! Auxiliary Monitors (C9): internet speed, website uptime, and a
//! per-device open-port security audit. Each runs as one independent
//! periodic cycle, ported from `core/monitoring.py`'s
//! `InternetHealthMonitor`/`WebsiteMonitor`/`SecurityMonitor`.

pub mod security;
pub mod speed;
pub mod website;
