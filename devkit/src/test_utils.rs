/*!
Test harness playing the hub side of the push channel.

- subscribes a mock client to the dashboard's notification topics
- sends hub notifications through it
- collects what the dashboard side would receive
*/

use crate::mqtt_stub::{DashboardMessageBuilder, MockMessage, MockMqttClient};
use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

pub const NOTIFICATION_NAMES: [&str; 5] = [
    "ReceiveScanUpdate",
    "ReceiveStationStatusUpdate",
    "ReceiveStationDiagnostics",
    "UpdateDailyGtinSummary",
    "UpdateHourlyProduction",
];

pub struct TestHarness {
    pub mqtt_client: MockMqttClient,
    pub builder: DashboardMessageBuilder,
    receiver: mpsc::UnboundedReceiver<MockMessage>,
    sent: HashMap<String, usize>,
}

impl TestHarness {
    /// Harness with nothing subscribed yet.
    pub fn new(topic_prefix: &str) -> Self {
        env_logger::try_init().ok();

        let mqtt_client = MockMqttClient::new();
        let receiver = mqtt_client.setup_receiver();
        Self {
            mqtt_client,
            builder: DashboardMessageBuilder::new(topic_prefix),
            receiver,
            sent: HashMap::new(),
        }
    }

    /// Harness subscribed to every notification topic, like a connected
    /// dashboard after its ConnAck.
    pub async fn subscribed(topic_prefix: &str) -> Result<Self> {
        let harness = Self::new(topic_prefix);
        let topics: Vec<String> = NOTIFICATION_NAMES.iter().map(|n| harness.builder.topic(n)).collect();
        harness.mqtt_client.subscribe_many(topics).await?;
        Ok(harness)
    }

    /// Send one notification. Returns whether it reached a subscriber.
    pub async fn send_notification(&mut self, name: &str, payload: &Value) -> Result<bool> {
        let topic = self.builder.topic(name);
        let routed = self.mqtt_client.simulate_incoming(topic, serde_json::to_vec(payload)?).await?;
        *self.sent.entry(name.to_string()).or_insert(0) += 1;
        Ok(routed)
    }

    /// Send raw bytes, e.g. a malformed payload.
    pub async fn send_raw(&mut self, name: &str, payload: &[u8]) -> Result<bool> {
        let topic = self.builder.topic(name);
        let routed = self.mqtt_client.simulate_incoming(topic, payload.to_vec()).await?;
        *self.sent.entry(name.to_string()).or_insert(0) += 1;
        Ok(routed)
    }

    pub async fn send_scan(&mut self, gtin: &str, description: &str, pounds: f64) -> Result<bool> {
        let payload = DashboardMessageBuilder::scan_update(gtin, "N/A", description, pounds);
        log::info!("📦 Sent scan for gtin: {}", gtin);
        self.send_notification("ReceiveScanUpdate", &payload).await
    }

    pub async fn send_station_status(&mut self, station_id: &str, status: &str, ip: &str) -> Result<bool> {
        let payload = DashboardMessageBuilder::station_status(station_id, status, ip);
        self.send_notification("ReceiveStationStatusUpdate", &payload).await
    }

    pub async fn send_diagnostics(&mut self, station_id: &str, uptime_seconds: u64, cpu: f64, memory_mb: f64, scans: u64) -> Result<bool> {
        let payload = DashboardMessageBuilder::station_diagnostics(station_id, uptime_seconds, cpu, memory_mb, scans);
        self.send_notification("ReceiveStationDiagnostics", &payload).await
    }

    /// Collect every routed message until none arrives within `timeout_ms`.
    pub async fn drain(&mut self, timeout_ms: u64) -> Vec<MockMessage> {
        let mut messages = Vec::new();
        while let Ok(Some(msg)) = timeout(Duration::from_millis(timeout_ms), self.receiver.recv()).await {
            messages.push(msg);
        }
        log::info!("🔍 Drained {} messages", messages.len());
        messages
    }

    pub fn sent_count(&self, name: &str) -> usize {
        self.sent.get(name).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.mqtt_client.clear();
        self.sent.clear();
        log::info!("🧹 Test harness reset");
    }
}
