pub mod bulk;
pub mod pipeline;

pub use bulk::{BulkLoadSummary, load_hospitals};
pub use pipeline::{Pipeline, SubmissionReceipt, SubmissionRejection};
