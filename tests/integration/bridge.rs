//! Bridge thread integration tests
//!
//! Start, wake, stop, and fatal-error reporting of the worker thread.

use crate::helpers::*;
use seqbridge::prelude::*;
use seqbridge::Error;

fn start(
    builder: seqbridge::PortBridgeBuilder,
) -> (PortBridge, RealtimeEndpoints<GraphPortId>, FakeSequencer, FakeGraph) {
    init_tracing();
    let seq = FakeSequencer::default();
    let graph = FakeGraph::default();
    let (bridge, rt) = builder
        .client_id(BRIDGE_CLIENT)
        .start(seq.clone(), graph.clone())
        .expect("bridge should start");
    (bridge, rt, seq, graph)
}

/// An idle worker blocked on its wake signal still stops promptly.
#[test]
fn test_stop_idle_bridge() {
    let (mut bridge, _rt, _seq, _graph) = start(PortBridge::builder());
    assert!(bridge.is_running());
    assert!(bridge.stop().is_ok());
    assert!(!bridge.is_running());
    assert!(!bridge.has_failed());
}

/// Dropping the bridge joins the worker; the realtime side's posts then go nowhere.
#[test]
fn test_drop_stops_worker() {
    let (bridge, rt, _seq, _graph) = start(PortBridge::builder());
    drop(bridge);
    assert!(!rt.waker().post());
}

/// An announced port shows up on the matching announcement channel.
#[test]
fn test_announced_port_is_adopted() {
    let (mut bridge, mut rt, seq, graph) = start(PortBridge::builder());
    let addr = Address::new(20, 0);
    seq.add(addr, PortType::MIDI_GENERIC, input_caps(), "Keyboard");

    assert!(rt.announce(addr));
    assert!(wait_for(|| rt.pending_ports(Direction::Input) == 1));

    let port = rt.adopt_new_ports(Direction::Input).next().unwrap();
    assert_eq!(port.name(), "Keyboard [20:0] (capture)");
    assert_eq!(port.handle().name, port.name());
    assert_eq!(graph.live().len(), 1);
    assert_eq!(rt.pending_ports(Direction::Output), 0);

    // released before stop, so shutdown frees it right away
    drop(port);
    bridge.stop().unwrap();
    assert!(graph.live().is_empty());
    assert_eq!(graph.freed().len(), 1);
}

/// Hardware export can be switched on while the bridge runs.
#[test]
fn test_hardware_export_toggle() {
    let (mut bridge, mut rt, seq, graph) = start(PortBridge::builder().export_hw_ports(false));
    let addr = Address::new(24, 0);
    seq.add(
        addr,
        PortType::MIDI_GENERIC | PortType::HARDWARE,
        input_caps() | output_caps(),
        "USB MIDI",
    );

    rt.announce(addr);
    bridge.wake();
    // give the worker a chance to (not) act
    std::thread::sleep(std::time::Duration::from_millis(20));
    assert!(graph.live().is_empty());

    bridge.set_export_hw_ports(true);
    rt.announce(addr);
    assert!(wait_for(|| graph.live().len() == 2));
    assert_eq!(rt.adopt_new_ports(Direction::Input).count(), 1);
    assert_eq!(rt.adopt_new_ports(Direction::Output).count(), 1);

    bridge.stop().unwrap();
}

/// Running out of announcement capacity stops the worker and is reported on
/// stop. The port that did get announced is still freed on the way out.
#[test]
fn test_announcement_overflow_fails_bridge() {
    let (mut bridge, mut rt, seq, graph) = start(PortBridge::builder().announcement_capacity(1));
    let first = Address::new(30, 0);
    let second = Address::new(31, 0);
    seq.add(first, PortType::MIDI_GENERIC, input_caps(), "One");
    seq.add(second, PortType::MIDI_GENERIC, input_caps(), "Two");

    rt.announce(first);
    assert!(wait_for(|| rt.pending_ports(Direction::Input) == 1));
    rt.announce(second);
    // nothing gets adopted; the pending port goes away with the endpoints
    drop(rt);

    assert!(wait_for(|| bridge.has_failed()));
    assert!(!bridge.is_running());
    let err = bridge.stop().unwrap_err();
    assert!(matches!(
        err,
        Error::AnnouncementOverflow { direction: Direction::Input, address } if address == second
    ));

    assert!(graph.live().is_empty());
    assert_eq!(graph.freed().len(), 1);
}

/// Invalid configuration is rejected before any thread is spawned.
#[test]
fn test_invalid_config_rejected() {
    let result = PortBridge::builder()
        .deletion_capacity(0)
        .start(FakeSequencer::default(), FakeGraph::default());
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}
