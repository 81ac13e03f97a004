use core::fmt;

/// Supported bus standards.
///
/// A closed enum: converter and bridge selection matches exhaustively over
/// these, so an unsupported combination is a compile error rather than a
/// missing dictionary entry at elaboration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusStandard {
    Wishbone,
    AxiLite,
    Axi,
}

impl BusStandard {
    /// Addressing granularity is a property of the standard.
    pub fn addressing(self) -> Addressing {
        match self {
            BusStandard::Wishbone => Addressing::Word,
            BusStandard::AxiLite | BusStandard::Axi => Addressing::Byte,
        }
    }
}

impl fmt::Display for BusStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusStandard::Wishbone => write!(f, "wishbone"),
            BusStandard::AxiLite => write!(f, "axi-lite"),
            BusStandard::Axi => write!(f, "axi"),
        }
    }
}

/// Address-bus granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    Word,
    Byte,
}

impl fmt::Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addressing::Word => write!(f, "word"),
            Addressing::Byte => write!(f, "byte"),
        }
    }
}
