//! FNV-1a weak checksum validator (§4.7): a fingerprint used to catch
//! corrupted or truncated control packets, not a cryptographic MAC. Anyone
//! who can see the packet can forge this checksum; it defends against bit
//! errors and naive fuzzing, not an adversary who has read the wire format.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// The hash is computed over at most this many leading bytes of the
/// payload, bounding fast-path cost regardless of packet size.
pub const MAX_CHECKSUM_INPUT: usize = 32;

/// Packets shorter than this carry no trailer and are not checksummed.
pub const MIN_CHECKSUMMED_LEN: usize = 8;

fn fnv1a(data: &[u8]) -> u32 {
    let bounded = &data[..data.len().min(MAX_CHECKSUM_INPUT)];
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bounded {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Validate `payload`'s trailing 4-byte fingerprint against an FNV-1a hash
/// of its leading `min(L-4, 32)` bytes.
///
/// Payloads shorter than [`MIN_CHECKSUMMED_LEN`] are always accepted; there
/// is no trailer to check (§4.7: "a packet of length `L >= 8`").
pub fn verify(payload: &[u8]) -> bool {
    let len = payload.len();
    if len < MIN_CHECKSUMMED_LEN {
        return true;
    }
    let body = &payload[..len - 4];
    // Native byte order: the original reads the trailer via a raw
    // `*(u32*)` cast, the same as every other payload-internal field (see
    // `pipeline::process_inner`'s comment on step 6).
    let trailer = u32::from_ne_bytes(payload[len - 4..].try_into().expect("4 bytes"));
    let hash = fnv1a(body);
    (trailer ^ hash) & 0xFFFF_0000 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_trailer(body: &[u8]) -> Vec<u8> {
        let hash = fnv1a(body);
        let mut packet = body.to_vec();
        packet.extend_from_slice(&hash.to_ne_bytes());
        packet
    }

    #[test]
    fn shorter_than_minimum_is_always_accepted() {
        assert!(verify(&[1, 2, 3]));
    }

    #[test]
    fn a_correctly_computed_trailer_is_accepted() {
        let packet = with_trailer(b"connect token payload");
        assert!(verify(&packet));
    }

    #[test]
    fn a_corrupted_trailer_is_rejected() {
        let mut packet = with_trailer(b"connect token payload");
        let len = packet.len();
        packet[len - 1] ^= 0xFF;
        packet[len - 2] ^= 0xFF;
        assert!(!verify(&packet));
    }

    #[test]
    fn only_the_leading_32_bytes_are_hashed() {
        let short: Vec<u8> = (0..32u8).collect();
        let mut long = short.clone();
        long.extend_from_slice(b"trailing bytes the hash must ignore entirely");
        let packet = with_trailer(&long);
        // Trailer computed over the full `long` body, but verify() only
        // hashes the leading 32 bytes of whatever body it's given, so a
        // trailer built from the same leading bytes still matches.
        let packet_short_body = with_trailer(&short);
        assert_eq!(
            &packet[packet.len() - 4..],
            &packet_short_body[packet_short_body.len() - 4..]
        );
    }
}
