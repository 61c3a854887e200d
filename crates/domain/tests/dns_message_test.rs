use uniproxy_domain::dns_message::{decode_flags, encode_flags};
use uniproxy_domain::{
    DecodeError, DnsMessage, HeaderFlags, Opcode, RData, RecordClass, RecordType,
};

mod helpers;
use helpers::{DnsMessageBuilder, RawReply};

// ── round trips ────────────────────────────────────────────────────────────

#[test]
fn test_query_round_trip() {
    let message = DnsMessageBuilder::query("example.test").id(0xBEEF).build();
    let decoded = DnsMessage::decode(&message.encode().unwrap()).unwrap();
    assert_eq!(decoded, message);
}

#[test]
fn test_response_round_trip_all_sections() {
    let message = DnsMessageBuilder::response("www.example.test")
        .answer_cname("www.example.test", "alias.example.test")
        .answer_a("alias.example.test", "93.184.216.34")
        .authority_cname("old.example.test", "www.example.test")
        .additional_a("ns1.example.test", "192.0.2.53")
        .build();

    let decoded = DnsMessage::decode(&message.encode().unwrap()).unwrap();

    assert_eq!(decoded, message);
    assert_eq!(decoded.answers.len(), 2);
    assert_eq!(decoded.authority.len(), 1);
    assert_eq!(decoded.additional.len(), 1);
}

#[test]
fn test_flag_round_trip_all_combinations() {
    for bits in 0u8..64 {
        for opcode in Opcode::ALL {
            for rcode in 0u8..16 {
                let flags = HeaderFlags {
                    is_response: bits & 1 != 0,
                    opcode,
                    authoritative: bits & 2 != 0,
                    truncated: bits & 4 != 0,
                    recursion_desired: bits & 8 != 0,
                    recursion_available: bits & 16 != 0,
                    response_code: rcode,
                };
                assert_eq!(decode_flags(encode_flags(&flags)).unwrap(), flags);
            }
        }
    }
}

#[test]
fn test_flag_bit_positions() {
    let flags = HeaderFlags {
        is_response: true,
        opcode: Opcode::Status,
        authoritative: true,
        truncated: false,
        recursion_desired: false,
        recursion_available: false,
        response_code: 3,
    };
    // 1 0010 1 0 0 0 000 0011
    assert_eq!(encode_flags(&flags), 0b1001_0100_0000_0011);
}

#[test]
fn test_encode_recomputes_counts() {
    let message = DnsMessageBuilder::response("a.test")
        .answer_a("a.test", "10.0.0.1")
        .answer_a("a.test", "10.0.0.2")
        .build();
    let bytes = message.encode().unwrap();
    assert_eq!(&bytes[4..12], &[0, 1, 0, 2, 0, 0, 0, 0]);
}

#[test]
fn test_query_defaults() {
    let message = DnsMessageBuilder::query("example.test").build();
    assert!(!message.flags.is_response);
    assert!(message.flags.recursion_desired);
    assert_eq!(message.flags.opcode, Opcode::Query);
    assert_eq!(message.questions.len(), 1);
    assert_eq!(message.questions[0].class, RecordClass::IN);
    assert!(message.answers.is_empty());
}

// ── compression ────────────────────────────────────────────────────────────

#[test]
fn test_compressed_answer_name_decodes_to_question_name() {
    let reply = RawReply::header(7, 1, 1);
    let question_offset = reply.position() as u16;
    let bytes = reply
        .name("example.test")
        .question_tail(1)
        .pointer(question_offset)
        .record_tail(1, &[93, 184, 216, 34])
        .build();

    let message = DnsMessage::decode(&bytes).unwrap();

    assert_eq!(message.questions[0].name, "example.test");
    assert_eq!(message.answers[0].name, "example.test");
    assert_eq!(
        message.answers[0].rdata,
        RData::A("93.184.216.34".parse().unwrap())
    );
}

#[test]
fn test_compressed_cname_target_inside_rdata() {
    // CNAME rdata is "alias" + pointer to the question name
    let reply = RawReply::header(7, 1, 1);
    let question_offset = reply.position() as u16;
    let mut rdata = vec![5];
    rdata.extend_from_slice(b"alias");
    rdata.extend_from_slice(&(0xC000 | question_offset).to_be_bytes());

    let bytes = reply
        .name("example.test")
        .question_tail(5)
        .pointer(question_offset)
        .record_tail(5, &rdata)
        .build();

    let message = DnsMessage::decode(&bytes).unwrap();
    assert_eq!(
        message.answers[0].rdata,
        RData::Cname("alias.example.test".to_string())
    );
    assert_eq!(message.answers[0].record_type(), RecordType::CNAME);
}

#[test]
fn test_self_referencing_pointer_is_rejected() {
    let reply = RawReply::header(7, 1, 0);
    let own_offset = reply.position() as u16;
    let bytes = reply.pointer(own_offset).question_tail(1).build();

    assert!(matches!(
        DnsMessage::decode(&bytes),
        Err(DecodeError::PointerLoop { .. })
    ));
}

#[test]
fn test_pointer_cycle_is_rejected() {
    // Two names pointing at each other: the second is legal (backwards),
    // the first points forward into it.
    let reply = RawReply::header(7, 2, 0);
    let first = reply.position() as u16;
    let bytes = reply
        .pointer(first + 6)
        .question_tail(1)
        .pointer(first)
        .question_tail(1)
        .build();

    assert!(matches!(
        DnsMessage::decode(&bytes),
        Err(DecodeError::PointerLoop { .. })
    ));
}

// ── strictness ─────────────────────────────────────────────────────────────

#[test]
fn test_unsupported_record_type_fails_decode() {
    // MX preference 10, exchange "mail.test"
    let mut rdata = vec![0, 10];
    rdata.extend_from_slice(b"\x04mail\x04test\x00");
    let bytes = RawReply::header(7, 1, 2)
        .name("example.test")
        .question_tail(15)
        .name("example.test")
        .record_tail(1, &[10, 0, 0, 1])
        .name("example.test")
        .record_tail(15, &rdata)
        .build();

    assert_eq!(
        DnsMessage::decode(&bytes),
        Err(DecodeError::UnsupportedRecordType(15))
    );
}

#[test]
fn test_unknown_question_type_fails_decode() {
    let bytes = RawReply::header(7, 1, 0)
        .name("example.test")
        .question_tail(4242)
        .build();
    assert_eq!(
        DnsMessage::decode(&bytes),
        Err(DecodeError::UnknownRecordType(4242))
    );
}

#[test]
fn test_uname_and_mp_questions_decode() {
    for (code, rtype) in [(110, RecordType::UNAME), (240, RecordType::MP)] {
        let bytes = RawReply::header(7, 1, 0)
            .name("example.test")
            .question_tail(code)
            .build();
        let message = DnsMessage::decode(&bytes).unwrap();
        assert_eq!(message.questions[0].record_type, rtype);
    }
}

#[test]
fn test_short_header_is_truncated() {
    assert_eq!(
        DnsMessage::decode(&[0x12, 0x34, 0x81]),
        Err(DecodeError::Truncated)
    );
}

#[test]
fn test_count_beyond_data_is_truncated() {
    let bytes = RawReply::header(7, 1, 3)
        .name("example.test")
        .question_tail(1)
        .name("example.test")
        .record_tail(1, &[10, 0, 0, 1])
        .build();
    assert_eq!(DnsMessage::decode(&bytes), Err(DecodeError::Truncated));
}

#[test]
fn test_rdata_length_beyond_data_is_truncated() {
    let bytes = RawReply::header(7, 0, 1)
        .name("example.test")
        .raw(&[0, 1, 0, 1, 0, 0, 0, 60, 0, 4, 10, 0])
        .build();
    assert_eq!(DnsMessage::decode(&bytes), Err(DecodeError::Truncated));
}

#[test]
fn test_a_record_with_wrong_length_is_invalid() {
    let bytes = RawReply::header(7, 0, 1)
        .name("example.test")
        .record_tail(1, &[10, 0, 0, 1, 9])
        .build();
    assert_eq!(DnsMessage::decode(&bytes), Err(DecodeError::InvalidRdata));
}

#[test]
fn test_reserved_flag_bits_fail_decode() {
    let mut bytes = DnsMessageBuilder::query("example.test").build().encode().unwrap();
    bytes[3] |= 0b0010_0000;
    assert_eq!(
        DnsMessage::decode(&bytes),
        Err(DecodeError::ReservedFlagBits(0b010))
    );
}

#[test]
fn test_truncated_flag_is_exposed_not_rejected() {
    let mut bytes = DnsMessageBuilder::response("example.test")
        .build()
        .encode()
        .unwrap();
    bytes[2] |= 0b0000_0010;
    let message = DnsMessage::decode(&bytes).unwrap();
    assert!(message.is_truncated());
}

#[test]
fn test_answer_addresses_skip_cnames() {
    let message = DnsMessageBuilder::response("example.test")
        .answer_cname("example.test", "alias.test")
        .answer_a("alias.test", "93.184.216.34")
        .build();
    let addresses: Vec<String> = message
        .answer_addresses()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(addresses, vec!["93.184.216.34"]);
    assert_eq!(message.answer_cnames().collect::<Vec<_>>(), vec!["alias.test"]);
}

#[test]
fn test_record_type_lookup_table() {
    assert_eq!(RecordType::lookup(5), Some("CNAME"));
    assert_eq!(RecordType::lookup(255), Some("ANY"));
    assert_eq!(RecordType::lookup(110), Some("UNAME"));
    assert_eq!(RecordType::lookup(240), Some("MP"));
    assert_eq!(RecordType::lookup(4242), None);
    assert_eq!("mx".parse::<RecordType>().unwrap(), RecordType::MX);
    assert!("BOGUS".parse::<RecordType>().is_err());
    assert_eq!(RecordClass::lookup(1), Some("IN"));
}
