//! Application layer - the per-site polling workers

mod site_monitor;

pub use site_monitor::{CycleSummary, MonitorStats, SiteMonitor, SiteMonitorConfig};
