//! Fuzz target for reply composition.
//!
//! Run with: cargo +nightly fuzz run fuzz_compose
//!
//! The first 16 bytes pick uptime and latency, the rest is parsed as config.
//! Any valid config must compose, and the runtime facts must always be there.

#![no_main]

use libfuzzer_sys::fuzz_target;
use statusbot_config::AppConfig;
use statusbot_core::{BuildIdentity, Responder, RuntimeSnapshot};

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }
    let (uptime, rest) = data.split_at(8);
    let (latency, rest) = rest.split_at(8);
    let runtime = RuntimeSnapshot {
        uptime_seconds: u64::from_le_bytes(uptime.try_into().unwrap()),
        latency_millis: i64::from_le_bytes(latency.try_into().unwrap()),
    };

    let Ok(toml) = std::str::from_utf8(rest) else {
        return;
    };
    let Ok(config) = AppConfig::parse(toml) else {
        return;
    };

    let identity = BuildIdentity {
        version: config.info.title.clone().filter(|t| !t.is_empty()),
        revision: config.links.first().map(|link| link.label.clone()),
    };
    let reply = Responder::new(&config, identity).respond(runtime);

    assert!(reply.document.value_of("Uptime").is_some());
    assert!(reply.document.value_of("Ping").is_some());
    assert_eq!(reply.links.len(), config.links.len());
});
