/// Keys derived from a run key.
///
/// The counter lives at `<run>_progress`; the completion flag is field
/// `finished` of the hash at `<run>_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressKeys {
    pub counter: String,
    pub status: String,
}

pub const FINISHED_FIELD: &str = "finished";

impl ProgressKeys {
    pub fn for_run(run_key: &str) -> Self {
        Self {
            counter: format!("{}_progress", run_key),
            status: format!("{}_status", run_key),
        }
    }
}
