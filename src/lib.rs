pub mod address;
pub mod config;

pub use address::{
    derive_normalized_address_slice_id, normalize_address, AddressInterpretationError,
    AddressNormalizer, AddressRules,
};
pub use config::AddressNormalizationConfig;
