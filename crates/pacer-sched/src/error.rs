use crate::job::Job;

#[derive(Debug, thiserror::Error)]
pub enum SchedError {
    #[error("invalid cron expression for {job} ({expression:?}): {source}")]
    InvalidCron {
        job: Job,
        expression: String,
        #[source]
        source: ::cron::error::Error,
    },
    #[error("job table already initialized")]
    AlreadyInitialized,
}
