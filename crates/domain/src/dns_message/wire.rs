//! DNS wire format (RFC 1035 §4).
//!
//! Encoding never emits compression pointers. Decoding follows them, but only
//! backwards: a pointer must target an offset strictly before the first byte
//! of the label run that contains it, so every jump lands earlier in the
//! buffer and decoding always terminates. The number of jumps per name is
//! capped as well, so a long chain of pointers to pointers is rejected.
//!
//! Labels are arbitrary octets on the wire. Bytes that are not UTF-8 are
//! decoded lossily into `U+FFFD`.

use super::{decode_flags, encode_flags, DnsMessage, Question};
use crate::dns_record::{RData, RecordClass, RecordType, ResourceRecord};
use crate::errors::DecodeError;
use std::net::Ipv4Addr;

pub const HEADER_LEN: usize = 12;
pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

const POINTER_TAG: u8 = 0b1100_0000;

/// Every hop of a real name crosses at least one two-byte label or pointer.
const MAX_POINTER_HOPS: usize = MAX_NAME_LEN / 2;

/// Encodes a dotted name as length-prefixed labels plus the root label.
pub fn encode_name(name: &str) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(name.len() + 2);
    write_name(&mut out, name)?;
    Ok(out)
}

fn write_name(out: &mut Vec<u8>, name: &str) -> Result<(), DecodeError> {
    let name = name.strip_suffix('.').unwrap_or(name);
    let start = out.len();

    if !name.is_empty() {
        for label in name.split('.') {
            if label.is_empty() {
                return Err(DecodeError::InvalidLabel);
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DecodeError::LabelTooLong);
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
    }
    out.push(0);

    if out.len() - start > MAX_NAME_LEN {
        return Err(DecodeError::NameTooLong);
    }
    Ok(())
}

/// Decodes the name starting at `pos`, returning it with the position just
/// past its encoding in place (after the pointer, if one was followed).
pub fn decode_name(buf: &[u8], pos: usize) -> Result<(String, usize), DecodeError> {
    let mut labels = Vec::new();
    let mut wire_len = 1;
    let mut run_start = pos;
    let mut pos = pos;
    let mut end = None;
    let mut hops = 0;

    loop {
        let len = *buf.get(pos).ok_or(DecodeError::Truncated)?;
        match len & POINTER_TAG {
            POINTER_TAG => {
                let low = *buf.get(pos + 1).ok_or(DecodeError::Truncated)?;
                let pointer = (((len & !POINTER_TAG) as usize) << 8) | low as usize;
                if pointer >= run_start || hops == MAX_POINTER_HOPS {
                    return Err(DecodeError::PointerLoop {
                        pointer,
                        position: pos,
                    });
                }
                hops += 1;
                end.get_or_insert(pos + 2);
                run_start = pointer;
                pos = pointer;
            }
            0 => {
                pos += 1;
                if len == 0 {
                    return Ok((labels.join("."), end.unwrap_or(pos)));
                }
                let len = len as usize;
                wire_len += len + 1;
                if wire_len > MAX_NAME_LEN {
                    return Err(DecodeError::NameTooLong);
                }
                let raw = buf.get(pos..pos + len).ok_or(DecodeError::Truncated)?;
                labels.push(String::from_utf8_lossy(raw).into_owned());
                pos += len;
            }
            _ => return Err(DecodeError::InvalidLabelType(len)),
        }
    }
}

pub fn encode_message(message: &DnsMessage) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(512);

    out.extend_from_slice(&message.id.to_be_bytes());
    out.extend_from_slice(&encode_flags(&message.flags).to_be_bytes());
    for count in [
        message.questions.len(),
        message.answers.len(),
        message.authority.len(),
        message.additional.len(),
    ] {
        let count = u16::try_from(count).map_err(|_| DecodeError::SectionTooLarge)?;
        out.extend_from_slice(&count.to_be_bytes());
    }

    for question in &message.questions {
        write_name(&mut out, &question.name)?;
        out.extend_from_slice(&question.record_type.to_u16().to_be_bytes());
        out.extend_from_slice(&question.class.to_u16().to_be_bytes());
    }

    for record in message
        .answers
        .iter()
        .chain(&message.authority)
        .chain(&message.additional)
    {
        write_record(&mut out, record)?;
    }

    Ok(out)
}

fn write_record(out: &mut Vec<u8>, record: &ResourceRecord) -> Result<(), DecodeError> {
    write_name(out, &record.name)?;
    out.extend_from_slice(&record.record_type().to_u16().to_be_bytes());
    out.extend_from_slice(&record.class.to_u16().to_be_bytes());
    out.extend_from_slice(&record.ttl.to_be_bytes());

    let rdata = match &record.rdata {
        RData::A(addr) => addr.octets().to_vec(),
        RData::Cname(target) => encode_name(target)?,
    };
    out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    out.extend_from_slice(&rdata);
    Ok(())
}

pub fn decode_message(buf: &[u8]) -> Result<DnsMessage, DecodeError> {
    let mut reader = WireReader::new(buf);

    let id = reader.read_u16()?;
    let flags = decode_flags(reader.read_u16()?)?;
    let question_count = reader.read_u16()?;
    let answer_count = reader.read_u16()?;
    let authority_count = reader.read_u16()?;
    let additional_count = reader.read_u16()?;

    let questions = (0..question_count)
        .map(|_| reader.read_question())
        .collect::<Result<Vec<_>, _>>()?;
    let answers = reader.read_records(answer_count)?;
    let authority = reader.read_records(authority_count)?;
    let additional = reader.read_records(additional_count)?;

    Ok(DnsMessage {
        id,
        flags,
        questions,
        answers,
        authority,
        additional,
    })
}

struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let bytes = self
            .buf
            .get(self.pos..self.pos + n)
            .ok_or(DecodeError::Truncated)?;
        self.pos += n;
        Ok(bytes)
    }

    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_name(&mut self) -> Result<String, DecodeError> {
        let (name, end) = decode_name(self.buf, self.pos)?;
        self.pos = end;
        Ok(name)
    }

    fn read_question(&mut self) -> Result<Question, DecodeError> {
        let name = self.read_name()?;
        let type_code = self.read_u16()?;
        let class_code = self.read_u16()?;
        Ok(Question {
            name,
            record_type: RecordType::from_u16(type_code)
                .ok_or(DecodeError::UnknownRecordType(type_code))?,
            class: RecordClass::from_u16(class_code)
                .ok_or(DecodeError::UnknownClass(class_code))?,
        })
    }

    fn read_records(&mut self, count: u16) -> Result<Vec<ResourceRecord>, DecodeError> {
        (0..count).map(|_| self.read_record()).collect()
    }

    fn read_record(&mut self) -> Result<ResourceRecord, DecodeError> {
        let name = self.read_name()?;
        let type_code = self.read_u16()?;
        let class_code = self.read_u16()?;
        let ttl = self.read_u32()?;
        let rdata_len = self.read_u16()? as usize;
        let rdata_start = self.pos;
        let raw = self.read_bytes(rdata_len)?;

        let rdata = match RecordType::from_u16(type_code) {
            Some(RecordType::A) => {
                let octets: [u8; 4] = raw.try_into().map_err(|_| DecodeError::InvalidRdata)?;
                RData::A(Ipv4Addr::from(octets))
            }
            Some(RecordType::CNAME) => {
                // CNAME targets may point back into the message, so decode
                // against the whole buffer rather than the rdata slice.
                let (target, end) = decode_name(self.buf, rdata_start)?;
                if end != rdata_start + rdata_len {
                    return Err(DecodeError::InvalidRdata);
                }
                RData::Cname(target)
            }
            _ => return Err(DecodeError::UnsupportedRecordType(type_code)),
        };

        Ok(ResourceRecord {
            name,
            class: RecordClass::from_u16(class_code)
                .ok_or(DecodeError::UnknownClass(class_code))?,
            ttl,
            rdata,
        })
    }
}
