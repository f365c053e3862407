/// Events emitted while a workflow voxelizes one or more structures.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    BatchStart { total_files: u64 },
    FileStart { name: String },
    FileFinish { name: String, occupied_cells: usize },
    FileFailed { name: String, reason: String },
    BatchFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
