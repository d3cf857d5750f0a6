//! Integration tests for brain-config
//!
//! End-to-end sessions against a simulated unit, following the same steps
//! the CLI takes.

mod common;

use brain_config::fields::parse_assignment;
use brain_config::protocol::{decode_frame, encode_packet, CommandType, HOST_SENDER};
use brain_config::{Brain, BrainError, Namespace};
use common::{sample_tables, SimulatedBrain};

// =============================================================================
// Session Tests
// =============================================================================

#[test]
fn test_write_session_reports_old_and_new() {
    let tables = sample_tables();
    let mut sim = SimulatedBrain::new().with_register(0xFF, 2, 2100);
    let mut brain = Brain::connect(&mut sim).unwrap();

    let (name, value) = parse_assignment("global.GovDiv=42").unwrap();
    let old = brain.read_named(&tables, name).unwrap();
    brain.write_named(&tables, name, value).unwrap();
    let new = brain.read_named(&tables, name).unwrap();
    assert_eq!((old, new), (2100, 42));

    let (name, value) = parse_assignment("global.GovDiv=0x834").unwrap();
    brain.write_named(&tables, name, value).unwrap();
    assert_eq!(brain.read_named(&tables, name).unwrap(), 2100);
    drop(brain);

    let commands: Vec<u8> = sim.requests().iter().map(|p| p.command).collect();
    assert_eq!(commands, vec![1, 3, 4, 3, 4, 3]);
}

#[test]
fn test_read_all_order() {
    let tables = sample_tables();
    let mut sim = SimulatedBrain::new();
    let mut brain = Brain::connect(&mut sim).unwrap();

    for name in tables.qualified_names() {
        brain.read_named(&tables, &name).unwrap();
    }
    drop(brain);

    // One version request, then every global field followed by each setup
    let reads: Vec<(u8, u8)> = sim.requests()[1..]
        .iter()
        .map(|p| (p.payload[0], p.payload[1]))
        .collect();

    let global_len = tables.table(Namespace::Global).len();
    let setup_len = tables.table(Namespace::Setup1).len();
    assert_eq!(reads.len(), global_len + 3 * setup_len);
    assert!(reads[..global_len].iter().all(|&(ns, _)| ns == 0xFF));
    assert_eq!(reads[global_len], (0x00, 0));
    assert_eq!(reads[global_len + setup_len], (0x01, 0));
    assert_eq!(reads[global_len + 2 * setup_len], (0x02, 0));
    assert_eq!(*reads.last().unwrap(), (0x02, setup_len as u8 - 1));
}

#[test]
fn test_negative_write_rejected_before_sending() {
    let tables = sample_tables();
    let mut sim = SimulatedBrain::new();
    let mut brain = Brain::connect(&mut sim).unwrap();

    let (name, value) = parse_assignment("setup1.TailGainA=-5").unwrap();
    let err = brain.write_named(&tables, name, value).unwrap_err();
    assert!(matches!(err, BrainError::Range(-5)));
    drop(brain);

    assert_eq!(sim.requests().len(), 1);
}

#[test]
fn test_failed_write_leaves_session_usable() {
    let tables = sample_tables();
    let mut sim = SimulatedBrain::new()
        .with_register(0x00, 3, 7)
        .echo_write(&[0x00, 0x03, 0x00, 0x00]);
    let mut brain = Brain::connect(&mut sim).unwrap();

    let err = brain.write_named(&tables, "setup1.TailGainB", 500).unwrap_err();
    assert!(matches!(err, BrainError::WriteVerification { expected: 500, actual: 0 }));

    // Caller decides to retry; the tampered echo was one-shot
    brain.write_named(&tables, "setup1.TailGainB", 500).unwrap();
    assert_eq!(brain.read_named(&tables, "setup1.TailGainB").unwrap(), 500);
}

#[test]
fn test_host_frames_use_host_sender() {
    let mut sim = SimulatedBrain::new();
    drop(Brain::connect(&mut sim).unwrap());

    let packet = decode_frame(sim.written(), HOST_SENDER).unwrap();
    assert_eq!(packet.command, CommandType::Version as u8);
    assert_eq!(sim.written(), &encode_packet(1, &[])[..]);
}
