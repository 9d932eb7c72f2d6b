//! Push channel: named notifications delivered over MQTT.
//!
//! Each notification lives on `{topic_prefix}/{name}`. The listener decodes
//! payloads into [`PushEvent`]s and forwards them, in arrival order, to a
//! single consumer. Reconnecting is left to the rumqttc event loop: after an
//! error we keep polling and resubscribe on the next ConnAck.

use crate::config::PushConf;
use crate::error::PushError;
use crate::health::ConnectionTracker;
use crate::models::{ScanEvent, StationDiagnosticsUpdate, StationStatus};
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS, SubscribeFilter};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    ScanUpdate,
    StationStatusUpdate,
    StationDiagnostics,
    DailyGtinSummary,
    HourlyProduction,
}

impl Notification {
    pub const ALL: [Notification; 5] = [
        Notification::ScanUpdate,
        Notification::StationStatusUpdate,
        Notification::StationDiagnostics,
        Notification::DailyGtinSummary,
        Notification::HourlyProduction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Notification::ScanUpdate => "ReceiveScanUpdate",
            Notification::StationStatusUpdate => "ReceiveStationStatusUpdate",
            Notification::StationDiagnostics => "ReceiveStationDiagnostics",
            Notification::DailyGtinSummary => "UpdateDailyGtinSummary",
            Notification::HourlyProduction => "UpdateHourlyProduction",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.name() == name)
    }

    pub fn topic(self, prefix: &str) -> String {
        format!("{}/{}", prefix.trim_end_matches('/'), self.name())
    }
}

#[derive(Debug, Clone)]
pub enum PushEvent {
    Scan(ScanEvent),
    StationStatus(StationStatus),
    StationDiagnostics(StationDiagnosticsUpdate),
}

/// Decode one message. `Ok(None)` for notifications we deliberately do
/// not act on: scans are folded incrementally, so the full-replacement
/// summaries are ignored.
pub fn decode_notification(prefix: &str, topic: &str, payload: &[u8]) -> Result<Option<PushEvent>, PushError> {
    let name = topic
        .strip_prefix(prefix.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| PushError::UnknownTopic(topic.to_string()))?;
    let notification = Notification::from_name(name).ok_or_else(|| PushError::UnknownTopic(topic.to_string()))?;

    let event = match notification {
        Notification::ScanUpdate => PushEvent::Scan(parse(notification, payload)?),
        Notification::StationStatusUpdate => PushEvent::StationStatus(parse(notification, payload)?),
        Notification::StationDiagnostics => PushEvent::StationDiagnostics(parse(notification, payload)?),
        Notification::DailyGtinSummary | Notification::HourlyProduction => {
            debug!(notification = notification.name(), "full-replacement notification ignored");
            return Ok(None);
        }
    };
    Ok(Some(event))
}

fn parse<T: DeserializeOwned>(notification: Notification, payload: &[u8]) -> Result<T, PushError> {
    serde_json::from_slice(payload).map_err(|source| PushError::Payload { notification: notification.name(), source })
}

pub fn push_options(cfg: &PushConf, api_key: Option<&str>) -> MqttOptions {
    let client_id = cfg
        .client_id
        .clone()
        .unwrap_or_else(|| format!("line-dashboard-{}", uuid::Uuid::new_v4().simple()));
    let mut opts = MqttOptions::new(client_id, &cfg.host, cfg.port);
    opts.set_keep_alive(Duration::from_secs(cfg.keep_alive_secs.max(5)));
    opts.set_clean_session(true);
    if let Some(key) = api_key {
        opts.set_credentials("line-dashboard", key);
    }
    opts
}

/// Spawn the MQTT listener. It stops when the event receiver is dropped;
/// otherwise abort the returned handle to tear the subscription down.
pub fn spawn_push_listener(
    cfg: PushConf,
    api_key: Option<String>,
    tracker: ConnectionTracker,
    events: mpsc::Sender<PushEvent>,
) -> JoinHandle<()> {
    task::spawn(async move {
        let (client, mut eventloop) = AsyncClient::new(push_options(&cfg, api_key.as_deref()), 10);
        let filters: Vec<SubscribeFilter> = Notification::ALL
            .iter()
            .map(|n| SubscribeFilter::new(n.topic(&cfg.topic_prefix), QoS::AtLeastOnce))
            .collect();

        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                    tracker.mark_connected();
                    info!(host = %cfg.host, port = cfg.port, "push channel connected");
                    // clean session: subscriptions do not survive a reconnect
                    if let Err(e) = client.subscribe_many(filters.clone()).await {
                        error!(error = %e, "push subscribe failed");
                    }
                }
                Ok(Event::Incoming(Incoming::Publish(p))) => {
                    match decode_notification(&cfg.topic_prefix, &p.topic, &p.payload) {
                        Ok(Some(event)) => {
                            if events.send(event).await.is_err() {
                                info!("event consumer gone, stopping push listener");
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!(error = %e, "push message dropped");
                            tracker.record_dropped();
                        }
                    }
                }
                Ok(Event::Incoming(Incoming::Disconnect)) => tracker.mark_disconnected(),
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "push channel error");
                    tracker.increment_reconnects();
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    })
}
