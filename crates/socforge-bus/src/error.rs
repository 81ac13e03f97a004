use socforge_regions::RegionError;
use thiserror::Error;

pub type BusResult<T> = Result<T, BusError>;

/// Errors raised while configuring a bus namespace or finalizing its
/// interconnect. All are configuration-time and abort the build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("unsupported bus data width {width}, supported: 32, 64, 128, 256, 512")]
    UnsupportedDataWidth { width: u32 },

    #[error("unsupported bus address width {width}, supported: 32, 64")]
    UnsupportedAddressWidth { width: u32 },

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error("{name:?} already declared as bus master")]
    DuplicateMaster { name: String },

    #[error("{name:?} already declared as bus slave")]
    DuplicateSlave { name: String },

    #[error("bus slave needs a name and/or a region")]
    SlaveNeedsNameOrRegion,

    #[error("no region named {name:?}")]
    RegionNotFound { name: String },

    #[error("region {name:?} has no origin assigned")]
    UnplacedRegion { name: String },

    #[error("region {name:?} origin 0x{origin:x} is not aligned to its decode size 0x{size_pow2:x}")]
    UnalignedOrigin {
        name: String,
        origin: u64,
        size_pow2: u64,
    },

    #[error("region {name:?} disables decoding but other regions need a decoder")]
    DecodeDisableNotExclusive { name: String },

    #[error("bus already finalized")]
    Finalized,
}
