//! End-to-end tests for the full sprinklerd pipeline.
//!
//! Each test wires the factory zone table, the real controller and dispatcher
//! and the virtual output board against an in-memory broker channel. The
//! tokio clock is paused, so the cooldown elapses instantly.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;

use sprinkler_adapter_virtual::VirtualOutputs;
use sprinkler_app::cooldown::SleepCooldown;
use sprinkler_app::dispatcher::{Dispatcher, Outcome};
use sprinkler_app::ports::{InboundEvent, MessageChannel};
use sprinkler_app::services::zone_controller::ZoneController;
use sprinkler_domain::controller::{ChannelIdentity, ControllerState};
use sprinkler_domain::error::DeliveryError;
use sprinkler_domain::feedback::{BridgeFeedback, OutboundMessage};
use sprinkler_domain::registry::{DEFAULT_ZONE_TABLE, ZoneRegistry};
use sprinkler_domain::zone::{OutputHandle, SignalLevel, ZoneEntry, ZoneId};

const COMMAND_TOPIC: &str = "home/sprinkler";
const BRIDGE_TOPIC: &str = "homebridge/to/set";

#[derive(Default)]
struct Broker {
    subscriptions: Mutex<Vec<String>>,
    published: Mutex<Vec<OutboundMessage>>,
}

impl Broker {
    fn published(&self) -> Vec<OutboundMessage> {
        self.published.lock().unwrap().clone()
    }
}

impl MessageChannel for Broker {
    fn subscribe(&self, topic: &str) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        self.subscriptions.lock().unwrap().push(topic.to_string());
        async { Ok(()) }
    }

    fn publish(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        self.published.lock().unwrap().push(message);
        async { Ok(()) }
    }
}

type Daemon = Dispatcher<Arc<VirtualOutputs>, Arc<Broker>, SleepCooldown>;

struct Stack {
    dispatcher: Daemon,
    outputs: Arc<VirtualOutputs>,
    broker: Arc<Broker>,
}

fn stack() -> Stack {
    let registry = ZoneRegistry::new(
        DEFAULT_ZONE_TABLE.map(|(zone, pin)| ZoneEntry::new(ZoneId::new(zone), OutputHandle::new(pin))),
    )
    .unwrap();
    let outputs = Arc::new(VirtualOutputs::new(registry.outputs()));
    let broker = Arc::new(Broker::default());
    let controller = ZoneController::new(
        registry,
        ChannelIdentity::new(COMMAND_TOPIC, "sprinkler"),
        Arc::clone(&outputs),
    );
    let dispatcher = Dispatcher::new(
        controller,
        BridgeFeedback::new(BRIDGE_TOPIC, "sprinkler"),
        Arc::clone(&broker),
        SleepCooldown,
        Duration::from_millis(100),
    );
    Stack {
        dispatcher,
        outputs,
        broker,
    }
}

fn command(value: &str, zone: u16) -> Vec<u8> {
    json!({ "value": value, "service_name": zone, "characteristic": "On", "name": "sprinkler" })
        .to_string()
        .into_bytes()
}

fn pin(raw: u32) -> OutputHandle {
    OutputHandle::new(raw)
}

// ---------------------------------------------------------------------------
// Command scenarios
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_keep_first_zone_and_correct_second() {
    let mut stack = stack();

    let first = stack
        .dispatcher
        .on_message(COMMAND_TOPIC, &command("true", 2))
        .await
        .unwrap();
    let second = stack
        .dispatcher
        .on_message(COMMAND_TOPIC, &command("true", 5))
        .await
        .unwrap();

    assert!(matches!(first, Outcome::AcceptedOn(zone) if zone == ZoneId::new(2)));
    assert!(matches!(second, Outcome::RejectedBusy(zone) if zone == ZoneId::new(5)));
    assert_eq!(stack.outputs.energized(), vec![pin(26)]);
    assert_eq!(stack.outputs.level(pin(33)), Some(SignalLevel::High));

    let published = stack.broker.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, BRIDGE_TOPIC);
    assert_eq!(
        published[0].encode().unwrap(),
        br#"{"name":"sprinkler","service_name":"Zone5","characteristic":"On","value":false}"#
    );
}

#[tokio::test(start_paused = true)]
async fn should_turn_zone_on_then_off() {
    let mut stack = stack();

    stack
        .dispatcher
        .on_message(COMMAND_TOPIC, &command("true", 2))
        .await
        .unwrap();
    let off = stack
        .dispatcher
        .on_message(COMMAND_TOPIC, &command("false", 2))
        .await
        .unwrap();

    assert!(matches!(off, Outcome::AcceptedOff(zone) if zone == ZoneId::new(2)));
    assert_eq!(stack.dispatcher.state(), ControllerState::Idle);
    assert!(stack.outputs.energized().is_empty());
    assert_eq!(
        stack.outputs.history(),
        vec![(pin(26), SignalLevel::Low), (pin(26), SignalLevel::High)]
    );
    assert!(stack.broker.published().is_empty());
}

#[tokio::test(start_paused = true)]
async fn should_ignore_unknown_zone() {
    let mut stack = stack();

    let outcome = stack
        .dispatcher
        .on_message(COMMAND_TOPIC, &command("true", 3))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::DroppedUnknownZone(zone) if zone == ZoneId::new(3)));
    assert!(stack.outputs.history().is_empty());
    assert!(stack.broker.published().is_empty());
    assert_eq!(stack.dispatcher.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn should_drop_payload_without_zone() {
    let mut stack = stack();
    let payload = json!({ "value": "true", "characteristic": "On" }).to_string();

    let outcome = stack
        .dispatcher
        .on_message(COMMAND_TOPIC, payload.as_bytes())
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::DroppedMalformed(_)));
    assert!(stack.outputs.history().is_empty());
    assert!(stack.broker.published().is_empty());
}

#[tokio::test(start_paused = true)]
async fn should_accept_deactivation_while_idle_without_output_write() {
    let mut stack = stack();

    let outcome = stack
        .dispatcher
        .on_message(COMMAND_TOPIC, &command("false", 7))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::AcceptedOff(zone) if zone == ZoneId::new(7)));
    assert!(stack.outputs.history().is_empty());
    assert_eq!(stack.dispatcher.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn should_wait_cooldown_after_accepted_command() {
    let mut stack = stack();
    let start = tokio::time::Instant::now();

    stack
        .dispatcher
        .on_message(COMMAND_TOPIC, &command("true", 1))
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn should_never_energize_two_zones_across_a_script() {
    let mut stack = stack();
    let script = [
        ("true", 1),
        ("true", 4),
        ("false", 4),
        ("true", 9),
        ("false", 1),
        ("true", 9),
        ("true", 8),
        ("false", 9),
        ("true", 6),
    ];

    for (value, zone) in script {
        stack
            .dispatcher
            .on_message(COMMAND_TOPIC, &command(value, zone))
            .await
            .unwrap();
        assert!(stack.outputs.energized().len() <= 1);
    }

    assert_eq!(stack.outputs.energized(), vec![pin(32)]);
    assert_eq!(
        stack.dispatcher.state(),
        ControllerState::Active(ZoneId::new(6))
    );
}

// ---------------------------------------------------------------------------
// Connection lifecycle
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_subscribe_and_reset_every_zone_on_connect() {
    let stack = stack();

    stack.dispatcher.on_connected().await.unwrap();

    assert_eq!(
        *stack.broker.subscriptions.lock().unwrap(),
        vec![COMMAND_TOPIC.to_string()]
    );
    let labels: Vec<String> = stack
        .broker
        .published()
        .into_iter()
        .inspect(|message| assert!(!message.payload.value))
        .map(|message| message.payload.service_name)
        .collect();
    assert_eq!(
        labels,
        ["Zone1", "Zone2", "Zone4", "Zone5", "Zone6", "Zone7", "Zone8", "Zone9"]
    );
}

#[tokio::test(start_paused = true)]
async fn should_switch_zone_off_when_event_stream_closes() {
    let Stack {
        dispatcher,
        outputs,
        broker,
    } = stack();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(dispatcher.run(rx));

    tx.send(InboundEvent::Connected).await.unwrap();
    tx.send(InboundEvent::Message {
        topic: COMMAND_TOPIC.to_string(),
        payload: command("true", 5),
    })
    .await
    .unwrap();
    drop(tx);

    let dispatcher = task.await.unwrap();

    assert_eq!(dispatcher.state(), ControllerState::Idle);
    assert!(outputs.energized().is_empty());
    assert_eq!(
        outputs.history(),
        vec![(pin(33), SignalLevel::Low), (pin(33), SignalLevel::High)]
    );
    assert_eq!(broker.published().len(), DEFAULT_ZONE_TABLE.len());
}
