//! SNMP probing via `snmpwalk`, community string `public`. Ported from
//! `SnmpScanner`.

use crate::subprocess::run_with_timeout;
use std::collections::HashMap;
use std::time::Duration;

pub async fn scan_snmp(ip: &str, timeout: Duration) -> HashMap<String, String> {
    let mut data = HashMap::new();

    let args = ["-v2c", "-c", "public", "-t", "1", "-r", "1", ip, "system"];
    let Some(output) = run_with_timeout("snmpwalk", &args, timeout).await else {
        return data;
    };
    if !output.status_success {
        return data;
    }

    for line in output.stdout.lines() {
        if let Some((oid, value)) = line.split_once(" = ") {
            data.insert(oid.trim().to_string(), value.trim().to_string());
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_snmpwalk_binary_yields_empty_map() {
        // snmpwalk is not expected to exist in the sandbox this runs in.
        let data = scan_snmp("192.0.2.1", Duration::from_millis(200)).await;
        assert!(data.is_empty());
    }
}
