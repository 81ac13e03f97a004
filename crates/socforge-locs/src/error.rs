use thiserror::Error;

pub type LocResult<T> = Result<T, LocError>;

/// Errors raised while reserving locations or configuring location spaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocError {
    #[error("{name:?} already used as a {kind} name")]
    DuplicateName { kind: &'static str, name: String },

    #[error("{kind} location {slot} already used by {owner:?}")]
    SlotInUse {
        kind: &'static str,
        slot: u32,
        owner: String,
    },

    #[error("not enough {kind} locations (capacity {n_locs})")]
    Exhausted { kind: &'static str, n_locs: u32 },

    #[error("{kind} location {slot} is higher than the maximum {n_locs}")]
    SlotOutOfRange {
        kind: &'static str,
        slot: u32,
        n_locs: u32,
    },

    #[error("{kind} locations are frozen after finalize")]
    Frozen { kind: &'static str },

    #[error("interrupts are not enabled on this SoC")]
    Disabled,

    #[error("unsupported CSR data width {width}, supported: 8, 32")]
    UnsupportedDataWidth { width: u32 },

    #[error("unsupported CSR address width {width}, supported: 14, 15, 16, 17, 18")]
    UnsupportedAddressWidth { width: u32 },

    #[error("unsupported CSR alignment {alignment}, supported: 32")]
    UnsupportedAlignment { alignment: u32 },

    #[error("CSR alignment {alignment} should be >= data width {width}")]
    AlignmentTooSmall { alignment: u32, width: u32 },

    #[error("unsupported CSR paging 0x{paging:x}, supported: 0x400, 0x800, 0x1000, 0x2000, 0x4000")]
    UnsupportedPaging { paging: u32 },

    #[error("unsupported IRQ count {n_irqs}, up to 32 supported")]
    TooManyIrqs { n_irqs: u32 },
}
