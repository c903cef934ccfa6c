use crate::endpoint::{EndpointError, FixGeometry};
use crate::filetree::FileNode;
use crate::fix::{FixId, FixRecord};

/// Messages from background tasks to the main UI thread
#[derive(Debug)]
pub enum BackgroundMessage {
    FileTreeLoaded(Result<Vec<FileNode>, EndpointError>),
    SourceLoaded {
        file: String,
        ticket: u64,
        result: Result<String, EndpointError>,
    },
    FixListLoaded {
        file: String,
        ticket: u64,
        result: Result<Vec<FixRecord>, EndpointError>,
    },
    FixDrawLoaded {
        id: FixId,
        ticket: u64,
        result: Result<FixGeometry, EndpointError>,
    },
    /// Completion of a request with no payload (cache, clear)
    Acknowledged {
        request: &'static str,
        result: Result<(), EndpointError>,
    },
    /// The close request finished; the surface should go away either way
    Closed(Result<(), EndpointError>),
    /// A background task crashed
    Error(String),
}
