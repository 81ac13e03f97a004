use socforge_regions::Region;

use crate::error::BusError;

/// Address decode predicate for one slave, in bus-word granularity.
///
/// Bus fabrics select a slave by comparing a power-of-two-aligned high-bit
/// field of the address, which is why regions decode over their rounded
/// `size_pow2` footprint and why origins must be aligned to it. The window is
/// kept as data (rather than a closure) so interconnect plans can be
/// compared, logged and tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeWindow {
    /// Always matches: decoding disabled, or the region spans the whole
    /// address space.
    Any,
    Window {
        /// Region origin in bus words.
        origin_words: u64,
        /// log2 of the footprint in bus words.
        size_log2: u32,
    },
}

impl DecodeWindow {
    /// Derives the decode window of `region` on a bus of the given widths.
    pub fn for_region(
        name: &str,
        region: &Region,
        address_width: u32,
        data_width: u32,
    ) -> Result<DecodeWindow, BusError> {
        let origin = region.origin.ok_or_else(|| BusError::UnplacedRegion {
            name: name.into(),
        })?;
        let size_pow2 = region.size_pow2;
        if origin & (size_pow2 - 1) != 0 {
            return Err(BusError::UnalignedOrigin {
                name: name.into(),
                origin,
                size_pow2,
            });
        }

        let full_span = origin == 0 && size_pow2 as u128 == 1u128 << address_width;
        if !region.decode || full_span {
            return Ok(DecodeWindow::Any);
        }

        // Bytes to words.
        let shift = (data_width / 8).trailing_zeros();
        let origin_words = origin >> shift;
        // Sub-word regions still decode one full bus word.
        let size_words = (size_pow2 >> shift).max(1);
        Ok(DecodeWindow::Window {
            origin_words,
            size_log2: size_words.trailing_zeros(),
        })
    }

    /// Whether a bus-word address targets this window.
    pub fn matches(&self, addr_words: u64) -> bool {
        match *self {
            DecodeWindow::Any => true,
            DecodeWindow::Window {
                origin_words,
                size_log2,
            } => {
                if size_log2 >= u64::BITS {
                    return true;
                }
                (addr_words >> size_log2) == (origin_words >> size_log2)
            }
        }
    }
}
