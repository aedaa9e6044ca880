use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Electoral committees present in the 2023 Sejm results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
    Ko,
    Konfederacja,
    NowaLewica,
    Pis,
    TrzeciaDroga,
}

impl Party {
    pub const ALL: [Party; 5] = [
        Party::Ko,
        Party::Konfederacja,
        Party::NowaLewica,
        Party::Pis,
        Party::TrzeciaDroga,
    ];

    /// Display name, as used in map titles.
    pub fn name(&self) -> &'static str {
        match self {
            Party::Ko => "KO",
            Party::Konfederacja => "konfederacja",
            Party::NowaLewica => "Nowa Lewica",
            Party::Pis => "PiS",
            Party::TrzeciaDroga => "Trzecia Droga",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Result<Self, UnknownParty> {
        let key = name.trim().to_lowercase();
        Self::ALL.into_iter()
            .find(|party| party.name().to_lowercase() == key)
            .ok_or_else(|| UnknownParty(name.to_string()))
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Party {
    type Err = UnknownParty;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::from_name(s) }
}

/// Party name not in the lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParty(pub String);

impl fmt::Display for UnknownParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = Party::ALL.map(|p| p.name()).join(", ");
        write!(f, "unknown party {:?}; available options: {options}", self.0)
    }
}

impl std::error::Error for UnknownParty {}

/// Column index of each party's vote share in the election table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartyColumns {
    pub ko: usize,
    pub konfederacja: usize,
    pub nowa_lewica: usize,
    pub pis: usize,
    pub trzecia_droga: usize,
}

impl Default for PartyColumns {
    fn default() -> Self {
        Self { ko: 17, konfederacja: 16, nowa_lewica: 14, pis: 15, trzecia_droga: 13 }
    }
}

impl PartyColumns {
    pub fn get(&self, party: Party) -> usize {
        match party {
            Party::Ko => self.ko,
            Party::Konfederacja => self.konfederacja,
            Party::NowaLewica => self.nowa_lewica,
            Party::Pis => self.pis,
            Party::TrzeciaDroga => self.trzecia_droga,
        }
    }
}
