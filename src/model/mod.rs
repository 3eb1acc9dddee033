pub mod bundle;
pub mod conversion;
pub mod definition;
pub mod payload;

pub use bundle::*;
pub use conversion::*;
pub use definition::*;
pub use payload::*;
