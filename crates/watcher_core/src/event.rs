use crate::catalog::Status;

/// A semantic change between two snapshots of the same source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    JobAdded {
        name: String,
        status: Status,
        url: String,
    },
    JobRemoved {
        name: String,
        status: Status,
        url: String,
    },
    JobBuildStarted {
        name: String,
        previous_status: Status,
        url: String,
    },
    JobBuildFinished {
        name: String,
        previous_status: Status,
        new_status: Status,
        url: String,
    },
    JobStatusChanged {
        name: String,
        previous_status: Status,
        new_status: Status,
        url: String,
    },
}

impl JobEvent {
    pub fn name(&self) -> &str {
        match self {
            JobEvent::JobAdded { name, .. }
            | JobEvent::JobRemoved { name, .. }
            | JobEvent::JobBuildStarted { name, .. }
            | JobEvent::JobBuildFinished { name, .. }
            | JobEvent::JobStatusChanged { name, .. } => name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            JobEvent::JobAdded { url, .. }
            | JobEvent::JobRemoved { url, .. }
            | JobEvent::JobBuildStarted { url, .. }
            | JobEvent::JobBuildFinished { url, .. }
            | JobEvent::JobStatusChanged { url, .. } => url,
        }
    }

    /// Short headline for a desktop or terminal notification.
    pub fn title(&self) -> String {
        match self {
            JobEvent::JobAdded { name, .. } => format!("Job added: {name}"),
            JobEvent::JobRemoved { name, .. } => format!("Job removed: {name}"),
            JobEvent::JobBuildStarted { name, .. } => format!("Build started: {name}"),
            JobEvent::JobBuildFinished { name, .. } => format!("Build finished: {name}"),
            JobEvent::JobStatusChanged { name, .. } => format!("Status changed: {name}"),
        }
    }

    pub fn body(&self) -> String {
        match self {
            JobEvent::JobAdded { status, .. } => format!("New job, status {status}"),
            JobEvent::JobRemoved { status, .. } => format!("Last status was {status}"),
            JobEvent::JobBuildStarted {
                previous_status, ..
            } => format!("Previous build: {previous_status}"),
            JobEvent::JobBuildFinished {
                previous_status,
                new_status,
                ..
            }
            | JobEvent::JobStatusChanged {
                previous_status,
                new_status,
                ..
            } => format!("{previous_status} -> {new_status}"),
        }
    }
}
