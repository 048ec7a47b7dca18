//! TCP connect scanning, bounded by a semaphore like `scanner::port` does
//! for the passive/active network scan.

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::time::timeout;

/// Ports the original fingerprinter probed by default across every device
/// family, before signature-specific port lists narrow things down.
pub const DEFAULT_PORTS: &[u16] = &[
    21, 22, 23, 25, 53, 80, 81, 88, 443, 445, 515, 631, 1883, 3000, 3306, 3389, 5000, 5001, 5060,
    5900, 8000, 8080, 8443, 8081, 8123, 8888, 49152, 49153,
];

const MAX_CONCURRENT: usize = 10;

/// Returns the subset of `ports` that accepted a TCP connection within `timeout`.
pub async fn scan_open_ports(ip: &str, ports: &[u16], per_port_timeout: Duration) -> Vec<u16> {
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT));
    let mut handles = Vec::with_capacity(ports.len());

    for &port in ports {
        let ip = ip.to_string();
        let sem = semaphore.clone();
        handles.push(tokio::spawn(async move {
            let _permit = sem.acquire().await.ok()?;
            is_open(&ip, port, per_port_timeout).await.then_some(port)
        }));
    }

    let mut open = Vec::new();
    for handle in handles {
        if let Ok(Some(port)) = handle.await {
            open.push(port);
        }
    }
    open.sort_unstable();
    open
}

async fn is_open(ip: &str, port: u16, connect_timeout: Duration) -> bool {
    let Ok(addr) = format!("{ip}:{port}").parse() else {
        return false;
    };
    matches!(
        timeout(connect_timeout, TcpStream::connect(&addr)).await,
        Ok(Ok(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closed_port_is_not_reported_open() {
        // Port 1 is reserved and practically never listening in CI/dev sandboxes.
        let open = scan_open_ports("127.0.0.1", &[1], Duration::from_millis(200)).await;
        assert!(open.is_empty());
    }

    #[tokio::test]
    async fn unparseable_address_yields_no_open_ports() {
        let open = scan_open_ports("not-an-ip", &[80], Duration::from_millis(100)).await;
        assert!(open.is_empty());
    }
}
