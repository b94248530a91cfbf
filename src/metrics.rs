use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::{opts, register_int_counter, Encoder, IntCounter, TextEncoder};

pub static CREDENTIALS_ISSUED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "guildgate_credentials_issued_total",
        "Total number of channel credentials issued"
    ))
    .unwrap()
});

pub static MESSAGES_RELAYED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "guildgate_messages_relayed_total",
        "Total number of messages relayed to the transport"
    ))
    .unwrap()
});

pub static MEMBERSHIP_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "guildgate_membership_failures_total",
        "Total number of failed membership resolutions"
    ))
    .unwrap()
});

pub static TRANSPORT_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "guildgate_transport_failures_total",
        "Total number of failed transport operations"
    ))
    .unwrap()
});

pub fn gather_metrics() -> Result<String> {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode(&metric_families, &mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}
