//! Wire-level constants for the game's connection protocol.
//!
//! Values below are taken verbatim from the protocol's packet-name table and
//! the original filter's framing constants; see the Glossary in
//! `SPEC_FULL.md` for the human names.

/// 32-bit out-of-band marker at offset 0 of a control packet.
pub const OOB_PACKET_MARKER: u32 = 0xFFFF_FFFF;

/// Maximum valid ENet peer identifier (12 bits).
pub const ENET_MAX_PEER_ID: u16 = 0x0FFF;

/// Minimum valid UDP payload length.
pub const MIN_PACKET_SIZE: usize = 4;

/// Maximum payload length on the primary server port.
pub const MAX_PACKET_SIZE: usize = 2_400;

/// Maximum payload length on the auxiliary game ports.
pub const MAX_VOICE_SIZE: usize = 8_192;

/// Token replay window: 2 hours, in nanoseconds.
pub const MAX_TOKEN_AGE_NS: u64 = 7_200_000_000_000;

/// Forward-sequence window tolerated as ordinary reordering.
pub const MAX_SEQUENCE_WINDOW: i32 = 100;

/// `msgConfirm` — OOB_SENT -> CONNECTING.
pub const MSG_CONFIRM_HASH: u32 = 0xba96_192a;
/// `msgIHost` — CONNECTING -> CONNECTED.
pub const MSG_I_HOST_HASH: u32 = 0xb3ea_30de;
/// `msgHeHost` — CONNECTING -> CONNECTED (alternate host message).
pub const MSG_HE_HOST_HASH: u32 = 0x86e9_f87b;

/// The 28 message-type hashes recognized on the primary server port.
///
/// Sourced from the game's packet-name table; order is immaterial, the
/// allow-list is a pure membership check.
pub const MESSAGE_HASH_ALLOWLIST: [u32; 28] = [
    0x0976_e783, // msgArrayUpdate
    0x6acb_d583, // msgConVars
    MSG_CONFIRM_HASH,
    0xca56_9e63, // msgEnd
    0x0f21_6a2a, // msgEntityCreate
    0x53ff_fa3f, // msgFrame
    MSG_HE_HOST_HASH,
    MSG_I_HOST_HASH,
    0x522c_add1, // msgIQuit
    0x7337_fd7a, // msgNetEvent
    0x100d_66a8, // msgNetGameEvent
    0x48e3_9581, // msgObjectIds
    0x258d_fdb4, // msgPackedAcks
    0x81e1_c835, // msgPackedClones
    0x073b_065b, // msgPaymentRequest
    0xb8e6_11cf, // msgRequestObjectIds
    0xafe4_cd4a, // msgResStart
    0x45e8_55d7, // msgResStop
    0xe938_445b, // msgRoute
    0x211c_ab17, // msgRpcNative
    0xb18d_4fc4, // msgServerCommand
    0xfa77_6e18, // msgServerEvent
    0xde3d_1a59, // msgStateBag
    0xe56e_37ed, // msgTimeSync
    0x1c13_03f8, // msgTimeSyncReq
    0x852c_1561, // msgWorldGrid3
    0xa5d4_e2bc, // gameStateAck
    0xd2f8_6a6e, // gameStateNAck
];

/// `true` if `hash` is one of the 28 recognized message types.
#[inline]
pub fn is_allowed_message_hash(hash: u32) -> bool {
    MESSAGE_HASH_ALLOWLIST.contains(&hash)
}

/// The classification an attack-triggering event falls into; also the
/// counter bucket it increments in [`crate::stats::Counters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    RateLimit,
    InvalidProtocol,
    Replay,
    StateViolation,
    ChecksumFail,
    SizeViolation,
    SequenceAnomaly,
    TokenReuse,
}

impl AttackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackKind::RateLimit => "rate_limit",
            AttackKind::InvalidProtocol => "invalid_protocol",
            AttackKind::Replay => "replay",
            AttackKind::StateViolation => "state_violation",
            AttackKind::ChecksumFail => "checksum_fail",
            AttackKind::SizeViolation => "size_violation",
            AttackKind::SequenceAnomaly => "sequence_anomaly",
            AttackKind::TokenReuse => "token_reuse",
        }
    }
}
