use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordClass {
    #[default]
    IN,
    CS,
    CH,
    HS,
    ANY,
}

static NAMES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    RecordClass::ALL
        .iter()
        .map(|class| (class.to_u16(), class.as_str()))
        .collect()
});

impl RecordClass {
    pub const ALL: [RecordClass; 5] = [
        RecordClass::IN,
        RecordClass::CS,
        RecordClass::CH,
        RecordClass::HS,
        RecordClass::ANY,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordClass::IN => "IN",
            RecordClass::CS => "CS",
            RecordClass::CH => "CH",
            RecordClass::HS => "HS",
            RecordClass::ANY => "ANY",
        }
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            RecordClass::IN => 1,
            RecordClass::CS => 2,
            RecordClass::CH => 3,
            RecordClass::HS => 4,
            RecordClass::ANY => 255,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        RecordClass::ALL
            .iter()
            .copied()
            .find(|class| class.to_u16() == code)
    }

    pub fn lookup(code: u16) -> Option<&'static str> {
        NAMES.get(&code).copied()
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordClass::ALL
            .iter()
            .copied()
            .find(|class| class.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown record class: {}", s))
    }
}
