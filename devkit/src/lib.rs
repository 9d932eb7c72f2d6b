/*!
# Dashboard DevKit

Test support for the line dashboard:
- an in-memory MQTT client standing in for the broker
- builders for the hub's notification payloads
- a harness that plays the hub side of the push channel
*/

pub mod mqtt_stub;
pub mod test_utils;

pub use mqtt_stub::{DashboardMessageBuilder, MockMessage, MockMqttClient};
pub use test_utils::TestHarness;
