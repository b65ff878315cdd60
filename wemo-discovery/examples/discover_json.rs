//! Simple device discovery that outputs JSON for scripting
//!
//! Usage: cargo run -p wemo-discovery --example discover_json [timeout-secs]

use std::time::Duration;

use wemo_discovery::scan_with_timeout;

fn main() {
    let timeout = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);

    let records = scan_with_timeout(Duration::from_secs(timeout));

    println!("{}", serde_json::to_string_pretty(&records).unwrap());
}
