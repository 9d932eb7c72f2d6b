/*!
Mock MQTT client for tests without a broker.

Records every publish and subscription. Simulated incoming messages are
delivered to the receiver only for subscribed topics, the way a broker
would route them.
*/

use anyhow::Result;
use rumqttc::QoS;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct MockMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retain: bool,
}

/// Stand-in for `rumqttc::AsyncClient`.
#[derive(Clone)]
pub struct MockMqttClient {
    published_messages: Arc<Mutex<Vec<MockMessage>>>,
    subscriptions: Arc<Mutex<Vec<String>>>,
    message_sender: Arc<Mutex<Option<mpsc::UnboundedSender<MockMessage>>>>,
}

impl MockMqttClient {
    pub fn new() -> Self {
        Self {
            published_messages: Arc::new(Mutex::new(Vec::new())),
            subscriptions: Arc::new(Mutex::new(Vec::new())),
            message_sender: Arc::new(Mutex::new(None)),
        }
    }

    /// Channel that receives routed incoming messages.
    pub fn setup_receiver(&self) -> mpsc::UnboundedReceiver<MockMessage> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *self.message_sender.lock().unwrap() = Some(sender);
        receiver
    }

    pub async fn publish<S, V>(&self, topic: S, qos: QoS, retain: bool, payload: V) -> Result<()>
    where
        S: Into<String>,
        V: Into<Vec<u8>>,
    {
        let message = MockMessage { topic: topic.into(), payload: payload.into(), qos, retain };
        log::info!("📤 [MOCK] Published to {}: {} bytes", message.topic, message.payload.len());
        self.published_messages.lock().unwrap().push(message);
        Ok(())
    }

    pub async fn subscribe<S: Into<String>>(&self, topic: S, _qos: QoS) -> Result<()> {
        let topic = topic.into();
        log::info!("📥 [MOCK] Subscribed to {}", topic);
        self.subscriptions.lock().unwrap().push(topic);
        Ok(())
    }

    pub async fn subscribe_many<I, S>(&self, topics: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for topic in topics {
            self.subscribe(topic, QoS::AtLeastOnce).await?;
        }
        Ok(())
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.subscriptions.lock().unwrap().iter().any(|t| t == topic)
    }

    /// Simulate a message arriving from the broker. Returns whether it was
    /// routed to the receiver.
    pub async fn simulate_incoming<S, V>(&self, topic: S, payload: V) -> Result<bool>
    where
        S: Into<String>,
        V: Into<Vec<u8>>,
    {
        let message = MockMessage {
            topic: topic.into(),
            payload: payload.into(),
            qos: QoS::AtLeastOnce,
            retain: false,
        };

        if !self.is_subscribed(&message.topic) {
            log::debug!("[MOCK] No subscriber for {}", message.topic);
            return Ok(false);
        }

        let sender = self.message_sender.lock().unwrap();
        let Some(sender) = sender.as_ref() else {
            anyhow::bail!("no receiver set up for incoming messages");
        };
        log::info!("📨 [MOCK] Simulated incoming: {}", message.topic);
        sender.send(message).map_err(|e| anyhow::anyhow!("Send error: {}", e))?;
        Ok(true)
    }

    pub fn get_published_messages(&self) -> Vec<MockMessage> {
        self.published_messages.lock().unwrap().clone()
    }

    pub fn get_subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().unwrap().clone()
    }

    pub fn find_messages_by_topic(&self, topic: &str) -> Vec<MockMessage> {
        self.published_messages
            .lock()
            .unwrap()
            .iter()
            .filter(|msg| msg.topic == topic)
            .cloned()
            .collect()
    }

    /// Last message published on `topic`, parsed as JSON.
    pub fn get_last_json_message<T>(&self, topic: &str) -> Result<Option<T>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        match self.find_messages_by_topic(topic).last() {
            Some(last_msg) => Ok(Some(serde_json::from_slice(&last_msg.payload)?)),
            None => Ok(None),
        }
    }

    pub fn clear(&self) {
        self.published_messages.lock().unwrap().clear();
        self.subscriptions.lock().unwrap().clear();
    }
}

impl Default for MockMqttClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Payloads shaped like the hub's notifications (camelCase JSON).
pub struct DashboardMessageBuilder {
    topic_prefix: String,
}

impl DashboardMessageBuilder {
    pub fn new<S: Into<String>>(topic_prefix: S) -> Self {
        Self { topic_prefix: topic_prefix.into() }
    }

    pub fn topic(&self, notification: &str) -> String {
        format!("{}/{}", self.topic_prefix.trim_end_matches('/'), notification)
    }

    pub fn scan_update(gtin: &str, item_code: &str, description: &str, pounds: f64) -> Value {
        serde_json::json!({
            "gtin": gtin,
            "itemCode": item_code,
            "applicationDescription": description,
            "totalPounds": pounds,
            "scannedAt": chrono::Utc::now().to_rfc3339()
        })
    }

    /// `lastSeen` is stamped with the current time.
    pub fn station_status(station_id: &str, status: &str, ip: &str) -> Value {
        serde_json::json!({
            "stationId": station_id,
            "currentStatus": status,
            "ipAddress": ip,
            "lastSeen": chrono::Utc::now().to_rfc3339()
        })
    }

    pub fn station_diagnostics(station_id: &str, uptime_seconds: u64, cpu: f64, memory_mb: f64, scans: u64) -> Value {
        serde_json::json!({
            "stationId": station_id,
            "uptimeSeconds": uptime_seconds,
            "cpuUsagePercent": cpu,
            "memoryUsageMB": memory_mb,
            "scansSinceBoot": scans
        })
    }

    /// Full-replacement GTIN summary, as the hub broadcasts it.
    pub fn daily_gtin_summary(rows: &[(&str, &str, u32, f64)]) -> Value {
        Value::Array(
            rows.iter()
                .map(|(gtin, description, cases, pounds)| {
                    serde_json::json!({
                        "gtin": gtin,
                        "itemCode": "N/A",
                        "applicationDescription": description,
                        "totalCases": cases,
                        "totalPounds": pounds
                    })
                })
                .collect(),
        )
    }

    pub fn hourly_production(rows: &[(u8, u32, f64)]) -> Value {
        Value::Array(
            rows.iter()
                .map(|(hour, cases, pounds)| serde_json::json!({ "hour": hour, "totalCases": cases, "totalPounds": pounds }))
                .collect(),
        )
    }
}
