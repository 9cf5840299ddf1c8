mod aggregate;
mod category;
mod score;
mod section;

pub use aggregate::{DocumentAggregator, DocumentHit, ItemMatch};
pub use category::{CATEGORIES, Category};
pub use score::{EXACT_MATCH_SCORE, effective_score};
pub use section::{SectionAggregator, SectionHit};
