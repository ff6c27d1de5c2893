//! Conversion engine: normalization, free-text field extractors, icon
//! resolution, and actor/item document builders.

pub mod actor;
pub mod feature;
pub mod icons;
pub mod jutsu;
pub mod normalize;
pub mod resolve;
pub mod weapon;

pub use actor::{convert_actor, ConvertError};
pub use icons::IconConfig;
pub use normalize::normalize_key;
pub use resolve::{ItemResolver, ResolveError, ResolvedItem};
