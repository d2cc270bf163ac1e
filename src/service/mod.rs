pub mod comparator;
pub mod correlator;
pub mod matcher;
pub mod summary;
pub mod workflow;

pub use comparator::check_values;
pub use correlator::find_matching_item;
pub use matcher::{cross_reference, MatchEngine, MatchOptions};
pub use summary::{export_csv, generate_summary};
pub use workflow::{MatchOutcome, ParsedDocuments, ThreeWayWorkflow};
