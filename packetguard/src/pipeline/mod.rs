//! Packet Pipeline (§4.1): the per-packet decision ordering that ties every
//! other module together. `process()` is infallible — it always returns a
//! [`Verdict`], never an error; the crate's only fallible edge is
//! configuration loading (see [`crate::error`]).

mod headers;

use std::time::Instant;

use headers::ParseOutcome;

use crate::attack_log::AttackLog;
use crate::checksum;
use crate::config::ConfigStore;
use crate::protocol::{
    is_allowed_message_hash, AttackKind, MAX_PACKET_SIZE, MAX_VOICE_SIZE, MIN_PACKET_SIZE,
    OOB_PACKET_MARKER,
};
use crate::security::rate_limit::RateLimiter;
use crate::security::sequence::SequenceTracker;
use crate::security::state::{classify_first_word, ConnectionStateMachine};
use crate::security::token::TokenTracker;
use crate::stats::Counters;

/// The minimum bytes a frame must carry to even attempt a header parse:
/// Ethernet (14) + minimum IPv4 (20) + UDP (8).
const MIN_FRAME_LEN: usize = 42;

/// The first word of a minimal token-bearing OOB packet: marker (4) +
/// at least 4 more bytes (§4.1 step 6, "`L >= 8` required").
const MIN_OOB_PAYLOAD_LEN: usize = 8;

/// Payload length at which an OOB packet carries a token fingerprint.
const TOKEN_BEARING_PAYLOAD_LEN: usize = 12;

const ENET_PEER_ID_MASK: u16 = 0x0FFF;
const ENET_RELIABLE_FLAG: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Forward,
    Drop(AttackKind),
    Abort,
}

pub struct Pipeline {
    config: ConfigStore,
    rate_limiter: RateLimiter,
    token_tracker: TokenTracker,
    sequence_tracker: SequenceTracker,
    state_machine: ConnectionStateMachine,
    pub counters: Counters,
    pub attack_log: AttackLog,
}

impl Pipeline {
    pub fn new(config: ConfigStore) -> Self {
        Self {
            config,
            rate_limiter: RateLimiter::new(),
            token_tracker: TokenTracker::new(),
            sequence_tracker: SequenceTracker::new(),
            state_machine: ConnectionStateMachine::new(),
            counters: Counters::new(),
            attack_log: AttackLog::new(),
        }
    }

    /// Run one frame through the full decision ordering, recording stats
    /// and perf data unconditionally before returning.
    pub fn process(&self, frame: &[u8], now_ns: u64) -> Verdict {
        let started = Instant::now();
        let verdict = self.process_inner(frame, now_ns);
        let elapsed_ns = started.elapsed().as_nanos() as u64;

        match verdict {
            Verdict::Forward => self.counters.record_passed(),
            Verdict::Drop(kind) => {
                self.counters.record_attack(kind);
            }
            Verdict::Abort => self.counters.record_dropped(),
        }
        self.counters.perf.record(elapsed_ns, frame.len());
        verdict
    }

    fn process_inner(&self, frame: &[u8], now_ns: u64) -> Verdict {
        // Step 1: size floor.
        if frame.len() < MIN_FRAME_LEN {
            return Verdict::Abort;
        }

        // Step 2: header parse.
        let parsed = match headers::parse(frame) {
            Ok(parsed) => parsed,
            Err(ParseOutcome::TooShort) => return Verdict::Abort,
            Err(ParseOutcome::NotOurTraffic) => return Verdict::Forward,
        };

        let config = self.config.get();

        // Step 3: destination filter.
        if config.target_address != 0 && parsed.destination_address != config.target_address {
            return Verdict::Forward;
        }
        if !config.owns_port(parsed.destination_port) {
            return Verdict::Forward;
        }

        // Step 4: rate limiting.
        let admitted = self.rate_limiter.admit(
            parsed.source_address,
            config.global_limit,
            config.subnet_limit,
            config.per_source_limit,
            now_ns,
        );
        if !admitted {
            self.attack_log.record(parsed.source_address, AttackKind::RateLimit, now_ns);
            return Verdict::Drop(AttackKind::RateLimit);
        }

        // Step 5: payload size window. `headers::parse` guarantees
        // `payload.len() == udp_payload_len` exactly (it rejects any frame
        // whose UDP length field claims more bytes than the frame actually
        // carries), so every unguarded `payload[..]` index below this point
        // is in bounds whenever `payload_len` has already cleared the
        // corresponding length check.
        let payload = parsed.payload;
        let payload_len = parsed.udp_payload_len;
        debug_assert_eq!(payload.len(), payload_len);
        if payload_len < MIN_PACKET_SIZE {
            self.attack_log.record(parsed.source_address, AttackKind::SizeViolation, now_ns);
            return Verdict::Drop(AttackKind::SizeViolation);
        }
        let is_server_port = parsed.destination_port == config.server_port;
        let max_len = if is_server_port { MAX_PACKET_SIZE } else { MAX_VOICE_SIZE };
        if payload_len > max_len {
            self.attack_log.record(parsed.source_address, AttackKind::SizeViolation, now_ns);
            return Verdict::Drop(AttackKind::SizeViolation);
        }

        // Step 6: first-word classification. Payload-internal multi-byte
        // fields are read in the host's native byte order, mirroring the
        // original's raw `*(u32*)payload` pointer dereferences — unlike the
        // Ethernet/IPv4/UDP header fields above, which the wire format fixes
        // as network (big-endian) order and which the original explicitly
        // byte-swaps with `bpf_ntohs`/`bpf_ntohl` before use.
        let first_word =
            u32::from_ne_bytes([payload[0], payload[1], payload[2], payload[3]]);

        if first_word == OOB_PACKET_MARKER {
            if payload_len < MIN_OOB_PAYLOAD_LEN {
                self.attack_log.record(
                    parsed.source_address,
                    AttackKind::InvalidProtocol,
                    now_ns,
                );
                return Verdict::Drop(AttackKind::InvalidProtocol);
            }
            if payload_len >= TOKEN_BEARING_PAYLOAD_LEN {
                let fingerprint = u32::from_ne_bytes([
                    payload[8],
                    payload[9],
                    payload[10],
                    payload[11],
                ]);
                if let Err(kind) =
                    self.token_tracker.check(fingerprint, parsed.source_address, now_ns)
                {
                    self.attack_log.record(parsed.source_address, kind, now_ns);
                    return Verdict::Drop(kind);
                }
            }
            let event = classify_first_word(first_word, None);
            if let Err(kind) = self.state_machine.check(parsed.source_address, event) {
                self.attack_log.record(parsed.source_address, kind, now_ns);
                return Verdict::Drop(kind);
            }
            return Verdict::Forward;
        }

        // Step 7: ENet-framed packet.
        let enet_header = u16::from_ne_bytes([payload[0], payload[1]]);
        let peer_id = enet_header & ENET_PEER_ID_MASK;
        let flags = (enet_header >> 12) as u8;
        // The mask above already bounds peer_id to 0..=4095; this check is
        // kept to match the documented bound verbatim rather than assuming
        // the mask can never be widened elsewhere.
        if peer_id > crate::protocol::ENET_MAX_PEER_ID {
            self.attack_log.record(parsed.source_address, AttackKind::InvalidProtocol, now_ns);
            return Verdict::Drop(AttackKind::InvalidProtocol);
        }
        if payload_len >= 4 && flags & ENET_RELIABLE_FLAG != 0 {
            let sequence = u16::from_ne_bytes([payload[2], payload[3]]);
            if let Err(kind) =
                self.sequence_tracker.check(parsed.source_address, peer_id, sequence)
            {
                self.attack_log.record(parsed.source_address, kind, now_ns);
                return Verdict::Drop(kind);
            }
        }

        // Step 8: checksum.
        if config.checksum_validation && payload_len >= TOKEN_BEARING_PAYLOAD_LEN {
            if !checksum::verify(payload) {
                self.attack_log.record(
                    parsed.source_address,
                    AttackKind::ChecksumFail,
                    now_ns,
                );
                return Verdict::Drop(AttackKind::ChecksumFail);
            }
        }

        // Step 9: message-type hash.
        if payload_len >= MIN_OOB_PAYLOAD_LEN {
            let hash = u32::from_ne_bytes([payload[4], payload[5], payload[6], payload[7]]);
            if is_server_port && !is_allowed_message_hash(hash) {
                self.attack_log.record(
                    parsed.source_address,
                    AttackKind::InvalidProtocol,
                    now_ns,
                );
                return Verdict::Drop(AttackKind::InvalidProtocol);
            }
            let event = classify_first_word(0, Some(hash));
            if let Err(kind) = self.state_machine.check(parsed.source_address, event) {
                self.attack_log.record(parsed.source_address, kind, now_ns);
                return Verdict::Drop(kind);
            }
        }

        // Step 10.
        Verdict::Forward
    }
}
