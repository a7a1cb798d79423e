//! Shadow port lifecycle integration tests
//!
//! The test thread acts as the realtime side: it announces, adopts, watches
//! liveness, and retires, while the worker thread does the rest.

use crate::helpers::*;
use seqbridge::prelude::*;
use std::thread;

fn start() -> (PortBridge, RealtimeEndpoints<GraphPortId>, FakeSequencer, FakeGraph) {
    init_tracing();
    let seq = FakeSequencer::default();
    let graph = FakeGraph::default();
    let (bridge, rt) = PortBridge::builder()
        .client_id(BRIDGE_CLIENT)
        .shutdown_timeout(WORKER_TIMEOUT)
        .start(seq.clone(), graph.clone())
        .expect("bridge should start");
    (bridge, rt, seq, graph)
}

fn adopt_one(
    rt: &mut RealtimeEndpoints<GraphPortId>,
    direction: Direction,
) -> AdoptedPort<GraphPortId> {
    assert!(wait_for(|| rt.pending_ports(direction) > 0));
    rt.adopt_new_ports(direction).next().unwrap()
}

/// create -> adopt -> dead -> retire -> destroyed, with the graph port freed exactly once.
#[test]
fn test_lifecycle_across_threads() {
    let (mut bridge, mut rt, seq, graph) = start();
    let addr = Address::new(2, 0);
    seq.add(addr, PortType::MIDI_GENERIC, input_caps(), "Keyboard");

    rt.announce(addr);
    let port = adopt_one(&mut rt, Direction::Input);
    let id = port.handle().id;

    // port loses its subscription capability
    seq.add(addr, PortType::MIDI_GENERIC, PortCaps::READ, "Keyboard");
    rt.announce(addr);
    assert!(wait_for(|| port.is_dead()));
    assert!(graph.freed().is_empty());

    rt.retire(port).unwrap();
    assert!(wait_for(|| graph.freed().len() == 1));
    assert_eq!(graph.freed()[0].id, id);
    assert!(graph.live().is_empty());

    bridge.stop().unwrap();
    assert_eq!(graph.freed().len(), 1, "shutdown must not free it again");
}

/// A port torn down and re-announced at the same address gets a fresh shadow.
#[test]
fn test_same_address_recreated_after_retire() {
    let (mut bridge, mut rt, seq, graph) = start();
    let addr = Address::new(14, 0);
    seq.add(addr, PortType::MIDI_GENERIC, output_caps(), "Through");

    rt.announce(addr);
    let old = adopt_one(&mut rt, Direction::Output);

    // subscription withdrawn
    seq.add(addr, PortType::MIDI_GENERIC, PortCaps::WRITE, "Through");
    rt.announce(addr);
    assert!(wait_for(|| old.is_dead()));

    // retire and re-announce back to back; deletions are drained first
    seq.add(addr, PortType::MIDI_GENERIC, output_caps(), "Through");
    rt.retire(old).unwrap();
    rt.announce(addr);

    let fresh = adopt_one(&mut rt, Direction::Output);
    assert!(!fresh.is_dead());
    assert_eq!(graph.freed().len(), 1);
    assert_eq!(graph.live(), [fresh.handle().clone()]);

    drop(fresh);
    bridge.stop().unwrap();
}

/// Stopping marks every adopted port dead. Ports handed back or dropped while
/// the stop is in progress are each freed exactly once.
#[test]
fn test_stop_reclaims_ports_held_by_realtime_side() {
    let (bridge, mut rt, seq, graph) = start();
    let retired = Address::new(40, 0);
    let dropped = Address::new(41, 0);
    seq.add(retired, PortType::MIDI_GENERIC, input_caps(), "Retired");
    seq.add(dropped, PortType::MIDI_GENERIC, output_caps(), "Dropped");

    rt.announce(retired);
    rt.announce(dropped);
    let to_retire = adopt_one(&mut rt, Direction::Input);
    let to_drop = adopt_one(&mut rt, Direction::Output);

    let stopper = thread::spawn(move || {
        let mut bridge = bridge;
        bridge.stop()
    });

    assert!(wait_for(|| to_retire.is_dead() && to_drop.is_dead()));
    assert!(graph.freed().is_empty());
    rt.retire(to_retire).unwrap();
    drop(to_drop);

    stopper.join().unwrap().unwrap();
    let mut freed: Vec<u32> = graph.freed().iter().map(|port| port.id).collect();
    freed.sort_unstable();
    assert_eq!(freed, [1, 2]);
    assert!(graph.live().is_empty());
}

/// Dropping the realtime endpoints ends the shutdown wait; ports still waiting
/// for adoption are freed with them.
#[test]
fn test_dropping_endpoints_releases_unadopted_ports() {
    let (mut bridge, mut rt, seq, graph) = start();
    let addr = Address::new(42, 0);
    seq.add(addr, PortType::MIDI_GENERIC, input_caps(), "Pending");

    rt.announce(addr);
    assert!(wait_for(|| rt.pending_ports(Direction::Input) == 1));
    drop(rt);

    bridge.stop().unwrap();
    assert_eq!(graph.freed().len(), 1);
    assert!(graph.live().is_empty());
}
