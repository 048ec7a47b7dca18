//! Interactive console setup wizard (`--console-setup`), ported from
//! `core/setup_wizard.py`'s `SetupWizard`. Walks through network, Telegram,
//! web interface, fingerprinting, and monitoring sections, then saves.

use crate::config::Config;
use sha2::{Digest, Sha256};
use std::io::{self, Write};

fn prompt(question: &str) -> String {
    print!("{question}");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok();
    line.trim().to_string()
}

fn confirm(question: &str, default_yes: bool) -> bool {
    let hint = if default_yes { "(Y/n)" } else { "(y/N)" };
    let answer = prompt(&format!("{question} {hint}: ")).to_lowercase();
    if answer.is_empty() {
        return default_yes;
    }
    answer == "y" || answer == "yes"
}

/// Run the wizard against an in-memory `Config`, saving it at the end.
/// Returns the finished config so the caller can start the service with it
/// immediately rather than reloading from disk.
pub fn run(mut config: Config) -> crate::error::Result<Config> {
    println!("\n{}", "=".repeat(60));
    println!("netwatch console setup");
    println!("{}\n", "=".repeat(60));
    println!("This wizard configures the essentials. Everything here can be");
    println!("changed later by editing the config file directly.\n");

    setup_network(&mut config);
    setup_telegram(&mut config);
    setup_web_interface(&mut config);
    setup_fingerprinting(&mut config);
    setup_monitoring(&mut config);

    config.general.configured = true;
    config.save()?;

    println!("\nSetup complete. Config saved to {}", config.path().display());
    if config.web_interface.enabled {
        println!("Control API will listen at http://{}:{}", config.web_interface.host, config.web_interface.port);
    }
    Ok(config)
}

fn setup_network(config: &mut Config) {
    println!("--- Network ---");
    while config.network.subnet.is_empty() {
        let subnet = prompt("Subnet to scan, CIDR form: ");
        if !subnet.is_empty() {
            config.network.subnet = subnet;
        } else {
            println!("a subnet is required to continue.");
        }
    }

    let interval = prompt(&format!("Scan interval in seconds (default: {}): ", config.general.scan_interval));
    if let Ok(secs) = interval.parse::<u64>() {
        if secs > 0 {
            config.general.scan_interval = secs;
        }
    }
}

fn setup_telegram(config: &mut Config) {
    println!("\n--- Telegram Alerts ---");
    config.telegram.enabled = confirm("Enable Telegram alerts?", false);
    if config.telegram.enabled {
        let token = prompt("Bot API token: ");
        if !token.is_empty() {
            config.telegram.api_token = token;
        }
        let chat_id = prompt("Chat ID: ");
        if !chat_id.is_empty() {
            config.telegram.chat_id = chat_id;
        }
        if config.telegram.api_token.is_empty() || config.telegram.chat_id.is_empty() {
            println!("warning: Telegram is enabled but incomplete; edit the config to finish it later.");
        }
    }
}

fn setup_web_interface(config: &mut Config) {
    println!("\n--- Web Interface / Control API ---");
    config.web_interface.enabled = confirm("Enable the HTTP control API?", true);
    if !config.web_interface.enabled {
        return;
    }

    let host = prompt(&format!("Host (default: {}): ", config.web_interface.host));
    if !host.is_empty() {
        config.web_interface.host = host;
    }

    let port = prompt(&format!("Port (default: {}): ", config.web_interface.port));
    if let Ok(port) = port.parse::<u16>() {
        if port >= 1024 {
            config.web_interface.port = port;
        }
    }

    if confirm("Set up Basic Auth for the control API?", false) {
        let username = prompt("Username: ");
        if !username.is_empty() {
            config.web_interface.username = username;
        }
        let password = prompt("Password: ");
        if !password.is_empty() {
            let mut hasher = Sha256::new();
            hasher.update(password.as_bytes());
            config.web_interface.password_hash = hex::encode(hasher.finalize());
        }
    }
}

fn setup_fingerprinting(config: &mut Config) {
    println!("\n--- Device Fingerprinting ---");
    config.fingerprinting.enabled = confirm("Enable device fingerprinting?", true);
    if !config.fingerprinting.enabled {
        return;
    }

    let confidence = prompt(&format!(
        "Minimum confidence threshold, 0.1-1.0 (default: {}): ",
        config.fingerprinting.confidence_threshold
    ));
    if let Ok(v) = confidence.parse::<f64>() {
        if (0.1..=1.0).contains(&v) {
            config.fingerprinting.confidence_threshold = v;
        }
    }

    let threads = prompt(&format!("Max concurrent probes, 1-20 (default: {}): ", config.fingerprinting.max_threads));
    if let Ok(v) = threads.parse::<usize>() {
        if (1..=20).contains(&v) {
            config.fingerprinting.max_threads = v;
        }
    }
}

fn setup_monitoring(config: &mut Config) {
    println!("\n--- Auxiliary Monitors ---");

    config.monitoring.internet_health.enabled = confirm("Enable internet health checks (speedtest)?", false);

    config.monitoring.websites.enabled = confirm("Enable website uptime monitoring?", false);
    if config.monitoring.websites.enabled {
        println!("Enter up to 5 URLs to monitor (blank line to stop):");
        let mut urls = Vec::new();
        for i in 1..=5 {
            let url = prompt(&format!("URL #{i}: "));
            if url.is_empty() {
                break;
            }
            urls.push(url);
        }
        config.monitoring.websites.urls = urls;
    }

    config.monitoring.security.enabled = confirm("Enable periodic open-port security scans?", false);
}
