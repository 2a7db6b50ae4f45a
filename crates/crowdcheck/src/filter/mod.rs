//! Business-rule filtering: scope predicates plus a windowed period join.

mod campaign;
mod window;

pub use campaign::CampaignFilter;
pub use window::{deduplicate_by_period, overlaps, PeriodMatch, TimedRecord};
