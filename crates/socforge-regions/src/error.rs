use thiserror::Error;

pub type RegionResult<T> = Result<T, RegionError>;

/// Errors raised while declaring or allocating address regions.
///
/// All of these are configuration-time failures: they abort the build and
/// name the entities involved so the configuration can be fixed. Nothing is
/// retried or partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("{name:?} already declared as a region")]
    DuplicateName { name: String },

    #[error("regions {first:?} and {second:?} overlap")]
    Overlap { first: String, second: String },

    #[error("region {name:?} lies in an IO window and cannot be cached")]
    CachedInsideIo { name: String },

    #[error("region {name:?} lies outside every IO window and must be cached")]
    UncachedOutsideIo { name: String },

    #[error("not enough address space to allocate {name:?} (size 0x{size:x})")]
    OutOfSpace { name: String, size: u64 },

    #[error("region {name:?} has zero size")]
    ZeroSize { name: String },

    #[error("IO window {name:?} needs a fixed origin")]
    MissingOrigin { name: String },
}
