// ── Domain model ──

mod category;
mod comparison;
mod endpoint;
mod observation;
mod severity;
mod stats;

pub use category::{Category, CategoryMembership};
pub use comparison::{
    ComparisonResult, DetectionState, DiffField, DifferenceMap, FieldValue, ValueChange,
};
pub use endpoint::{MacAddress, Phase};
pub use observation::Observation;
pub use severity::{OverrideRow, Severity, SeverityOverride, SeveritySource};
pub use stats::{BucketId, StatsBucket};
