pub mod loader;
pub mod packager;
pub mod retry;
pub mod writer;

pub use loader::{LoadReport, Loader, RecordError, RecordStats, load_documents, parse_record};
pub use packager::{ContaminationAudit, DroppedDocument, Packaged, Packager, Shard, package, shuffle_key};
pub use retry::{RetryFailure, RetryPolicy, is_retryable};
pub use writer::{ShardWriter, WrittenRun, encode_shard};
