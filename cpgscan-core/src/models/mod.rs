pub mod record;

// re-export for cleaner imports
pub use self::record::{GAP, HEADER_MARKER, SequenceRecord};
