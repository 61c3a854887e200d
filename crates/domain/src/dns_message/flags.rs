use super::Opcode;
use crate::bits::{pack_bits, unpack_bits};
use crate::errors::DecodeError;

/// The second 16-bit word of a DNS header.
///
/// Layout, most-significant bit first:
/// `qr(1) opcode(4) aa(1) tc(1) rd(1) ra(1) reserved(3) rcode(4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderFlags {
    pub is_response: bool,
    pub opcode: Opcode,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    /// 4-bit response code; higher bits are discarded on encode.
    pub response_code: u8,
}

pub fn encode_flags(flags: &HeaderFlags) -> u16 {
    let word = pack_bits(0, 1, flags.is_response as u16);
    let word = pack_bits(word, 4, flags.opcode.to_u8() as u16);
    let word = pack_bits(word, 1, flags.authoritative as u16);
    let word = pack_bits(word, 1, flags.truncated as u16);
    let word = pack_bits(word, 1, flags.recursion_desired as u16);
    let word = pack_bits(word, 1, flags.recursion_available as u16);
    let word = pack_bits(word, 3, 0);
    pack_bits(word, 4, flags.response_code as u16)
}

pub fn decode_flags(word: u16) -> Result<HeaderFlags, DecodeError> {
    let (response_code, word) = unpack_bits(word, 4);
    let (reserved, word) = unpack_bits(word, 3);
    if reserved != 0 {
        return Err(DecodeError::ReservedFlagBits(reserved as u8));
    }
    let (recursion_available, word) = unpack_bits(word, 1);
    let (recursion_desired, word) = unpack_bits(word, 1);
    let (truncated, word) = unpack_bits(word, 1);
    let (authoritative, word) = unpack_bits(word, 1);
    let (opcode, word) = unpack_bits(word, 4);
    let (is_response, _) = unpack_bits(word, 1);

    Ok(HeaderFlags {
        is_response: is_response == 1,
        opcode: Opcode::from_u8(opcode as u8)?,
        authoritative: authoritative == 1,
        truncated: truncated == 1,
        recursion_desired: recursion_desired == 1,
        recursion_available: recursion_available == 1,
        response_code: response_code as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_query_word() {
        let flags = HeaderFlags {
            recursion_desired: true,
            ..HeaderFlags::default()
        };
        assert_eq!(encode_flags(&flags), 0x0100);
    }

    #[test]
    fn test_standard_response_word() {
        let flags = decode_flags(0x8180).unwrap();
        assert!(flags.is_response);
        assert!(flags.recursion_desired);
        assert!(flags.recursion_available);
        assert!(!flags.truncated);
        assert_eq!(flags.opcode, Opcode::Query);
        assert_eq!(flags.response_code, 0);
    }

    #[test]
    fn test_reserved_bits_rejected() {
        assert_eq!(
            decode_flags(0x8190),
            Err(DecodeError::ReservedFlagBits(0b001))
        );
        assert_eq!(
            decode_flags(0x0070),
            Err(DecodeError::ReservedFlagBits(0b111))
        );
    }

    #[test]
    fn test_unknown_opcode_rejected() {
        // opcode 3 is unassigned
        assert_eq!(decode_flags(3 << 11), Err(DecodeError::UnknownOpcode(3)));
    }
}
