use crate::errors::DecodeError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Opcode {
    #[default]
    Query,
    IQuery,
    Status,
    Notify,
    Update,
}

impl Opcode {
    pub const ALL: [Opcode; 5] = [
        Opcode::Query,
        Opcode::IQuery,
        Opcode::Status,
        Opcode::Notify,
        Opcode::Update,
    ];

    pub fn to_u8(&self) -> u8 {
        match self {
            Opcode::Query => 0,
            Opcode::IQuery => 1,
            Opcode::Status => 2,
            Opcode::Notify => 4,
            Opcode::Update => 5,
        }
    }

    pub fn from_u8(code: u8) -> Result<Self, DecodeError> {
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.to_u8() == code)
            .ok_or(DecodeError::UnknownOpcode(code))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Opcode::Query => "QUERY",
            Opcode::IQuery => "IQUERY",
            Opcode::Status => "STATUS",
            Opcode::Notify => "NOTIFY",
            Opcode::Update => "UPDATE",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
