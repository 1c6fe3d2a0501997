//! End-to-end pipeline scenarios, one `#[test]` per numbered case.

use packetguard::config::{Config, ConfigStore};
use packetguard::pipeline::{Pipeline, Verdict};
use packetguard::protocol::AttackKind;

const TARGET: [u8; 4] = [10, 0, 0, 1];
const SOURCE: [u8; 4] = [203, 0, 113, 7];
const SERVER_PORT: u16 = 30120;

fn build_udp_frame(
    src_addr: [u8; 4],
    dest_addr: [u8; 4],
    ip_protocol: u8,
    dest_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut frame = vec![0u8; 14];
    frame[12] = 0x08;
    frame[13] = 0x00;

    let mut ip = vec![0u8; 20];
    ip[0] = 0x45;
    ip[9] = ip_protocol;
    ip[12..16].copy_from_slice(&src_addr);
    ip[16..20].copy_from_slice(&dest_addr);
    frame.extend_from_slice(&ip);

    let mut udp = vec![0u8; 8];
    udp[2..4].copy_from_slice(&dest_port.to_be_bytes());
    let udp_total_len = (8 + payload.len()) as u16;
    udp[4..6].copy_from_slice(&udp_total_len.to_be_bytes());
    frame.extend_from_slice(&udp);
    frame.extend_from_slice(payload);
    frame
}

fn test_pipeline() -> Pipeline {
    // `dev` already disables checksum validation; target_address pins the
    // filter to TARGET as the scenarios in §8 assume.
    let config = Config::dev(u32::from_be_bytes(TARGET));
    Pipeline::new(ConfigStore::new(config))
}

/// Build an ENet-framed payload: 2-byte header, optional 2-byte sequence
/// (bytes 2..4, read only when `reliable`), optional 4-byte message hash
/// (bytes 4..8, read whenever the payload is at least 8 bytes).
fn enet_frame(
    peer_id: u16,
    reliable: bool,
    sequence: Option<u16>,
    message_hash: Option<u32>,
) -> Vec<u8> {
    let flags: u16 = if reliable { 1 } else { 0 };
    let header = (flags << 12) | (peer_id & 0x0FFF);
    // Native byte order: these are payload-internal fields, read by the
    // pipeline via a raw `from_ne_bytes` the same way the original reads
    // them with a raw pointer cast (see `pipeline::process_inner`).
    let mut payload = header.to_ne_bytes().to_vec();
    payload.extend_from_slice(&sequence.unwrap_or(0).to_ne_bytes());
    if let Some(hash) = message_hash {
        payload.extend_from_slice(&hash.to_ne_bytes());
    }
    payload
}

#[test]
fn scenario_1_non_udp_passthrough() {
    let pipeline = test_pipeline();
    let frame = build_udp_frame(SOURCE, TARGET, 6 /* TCP */, SERVER_PORT, &[0u8; 8]);
    assert_eq!(pipeline.process(&frame, 0), Verdict::Forward);
    assert_eq!(pipeline.counters.snapshot().passed, 0);
    assert_eq!(pipeline.counters.snapshot().dropped, 0);
}

#[test]
fn scenario_2_port_outside_configured_set() {
    let pipeline = test_pipeline();
    let frame = build_udp_frame(SOURCE, TARGET, 17, 9999, &[0u8; 8]);
    assert_eq!(pipeline.process(&frame, 0), Verdict::Forward);
}

#[test]
fn scenario_3_valid_oob_handshake() {
    let pipeline = test_pipeline();
    let mut payload = 0xFFFF_FFFFu32.to_ne_bytes().to_vec();
    payload.extend_from_slice(b"connect");
    payload.extend_from_slice(&0xDEAD_BEEFu32.to_ne_bytes());
    let frame = build_udp_frame(SOURCE, TARGET, 17, SERVER_PORT, &payload);

    assert_eq!(pipeline.process(&frame, 0), Verdict::Forward);
}

#[test]
fn scenario_4_full_handshake_reaches_connected() {
    let pipeline = test_pipeline();

    let mut oob = 0xFFFF_FFFFu32.to_ne_bytes().to_vec();
    oob.extend_from_slice(b"hello!!!");
    let frame = build_udp_frame(SOURCE, TARGET, 17, SERVER_PORT, &oob);
    assert_eq!(pipeline.process(&frame, 0), Verdict::Forward);

    let confirm = enet_frame(1, false, None, Some(0xBA96_192A));
    let frame = build_udp_frame(SOURCE, TARGET, 17, SERVER_PORT, &confirm);
    assert_eq!(pipeline.process(&frame, 1), Verdict::Forward);

    let i_host = enet_frame(1, false, None, Some(0xB3EA_30DE));
    let frame = build_udp_frame(SOURCE, TARGET, 17, SERVER_PORT, &i_host);
    assert_eq!(pipeline.process(&frame, 2), Verdict::Forward);
}

#[test]
fn scenario_5_flood_is_roughly_half_forwarded() {
    let config = Config {
        target_address: u32::from_be_bytes(TARGET),
        per_source_limit: 1_000,
        checksum_validation: false,
        ..Config::dev(u32::from_be_bytes(TARGET))
    };
    let pipeline = Pipeline::new(ConfigStore::new(config));

    let payload = enet_frame(1, false, None, Some(0x0976_e783));
    let frame = build_udp_frame(SOURCE, TARGET, 17, SERVER_PORT, &payload);

    let mut forwarded = 0u32;
    // 2000 packets spread evenly across one second of nanosecond timestamps.
    for i in 0..2_000u64 {
        let now_ns = i * (1_000_000_000 / 2_000);
        if pipeline.process(&frame, now_ns) == Verdict::Forward {
            forwarded += 1;
        }
    }

    assert!((900..=1_100).contains(&forwarded), "forwarded={forwarded}");
    assert!(pipeline.counters.snapshot().rate_limited > 0);
}

#[test]
fn scenario_6_bad_message_hash_on_server_port_is_dropped() {
    let pipeline = test_pipeline();
    let payload = enet_frame(1, false, None, Some(0));
    let frame = build_udp_frame(SOURCE, TARGET, 17, SERVER_PORT, &payload);

    assert_eq!(
        pipeline.process(&frame, 0),
        Verdict::Drop(AttackKind::InvalidProtocol)
    );
    assert_eq!(pipeline.counters.snapshot().invalid_protocol, 1);
}

#[test]
fn scenario_7_repeated_huge_sequence_jumps_are_eventually_rejected() {
    let pipeline = test_pipeline();

    let first = enet_frame(1, true, Some(10), None);
    let frame = build_udp_frame(SOURCE, TARGET, 17, SERVER_PORT, &first);
    assert_eq!(pipeline.process(&frame, 0), Verdict::Forward);

    let jump = enet_frame(1, true, Some(20_000), None);
    let frame = build_udp_frame(SOURCE, TARGET, 17, SERVER_PORT, &jump);
    let mut last = Verdict::Forward;
    for i in 1..=11u64 {
        last = pipeline.process(&frame, i);
    }
    assert_eq!(last, Verdict::Drop(AttackKind::SequenceAnomaly));
}

#[test]
fn scenario_8_peer_id_is_masked_to_12_bits() {
    let pipeline = test_pipeline();
    // 0xF000: high 4 bits = flags, low 12 bits = 0x000 (peer-id 0, legal).
    let payload = enet_frame(0x0FFF, false, None, Some(0x0976_e783));
    let frame = build_udp_frame(SOURCE, TARGET, 17, SERVER_PORT, &payload);
    assert_eq!(pipeline.process(&frame, 0), Verdict::Forward);
}
