use thiserror::Error;

/// Malformed or unsupported DNS wire data. Never tolerated partially.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Message truncated")]
    Truncated,

    #[error("Unsupported record type in resource record: {0}")]
    UnsupportedRecordType(u16),

    #[error("Unknown record type: {0}")]
    UnknownRecordType(u16),

    #[error("Unknown record class: {0}")]
    UnknownClass(u16),

    #[error("Unknown opcode: {0}")]
    UnknownOpcode(u8),

    #[error("Reserved header flag bits set: {0:#05b}")]
    ReservedFlagBits(u8),

    #[error("Compression pointer to {pointer} at position {position} does not point backwards")]
    PointerLoop { pointer: usize, position: usize },

    #[error("Invalid label type octet: {0:#04x}")]
    InvalidLabelType(u8),

    #[error("Invalid label")]
    InvalidLabel,

    #[error("Label exceeds 63 bytes")]
    LabelTooLong,

    #[error("Domain name exceeds 255 bytes")]
    NameTooLong,

    #[error("Invalid record data")]
    InvalidRdata,

    #[error("Section holds more than 65535 entries")]
    SectionTooLarge,
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("DNS decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unexpected end of stream")]
    UnexpectedEof,

    #[error("Transport error talking to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Unknown query protocol: {0}")]
    UnknownProtocol(String),

    #[error("Invalid proxy target: {0}")]
    InvalidTarget(String),

    #[error("Invalid HTTP message: {0}")]
    InvalidHttp(String),

    #[error("Relay I/O error: {0}")]
    Relay(String),

    #[error("Relay timed out")]
    RelayTimeout,

    #[error("No addresses found for {0}")]
    NoAddresses(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn transport(server: impl ToString, reason: impl ToString) -> Self {
        DomainError::Transport {
            server: server.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Maps an I/O error raised while relaying; EOF keeps its own variant.
    pub fn relay(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => DomainError::UnexpectedEof,
            std::io::ErrorKind::TimedOut => DomainError::RelayTimeout,
            _ => DomainError::Relay(err.to_string()),
        }
    }
}
