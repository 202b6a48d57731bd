pub mod improvement;
pub mod record;
pub mod score;
pub mod section;

pub use improvement::{Improvement, ImprovementKind, Priority};
pub use record::{ProcessingRecord, RecordUpdate, SourceFormat};
pub use score::ScoreReport;
pub use section::{Section, SectionKind, SectionMap};
