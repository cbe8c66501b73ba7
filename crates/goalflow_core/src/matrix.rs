use crate::model::{Rating, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixCategory {
    DoFirst,
    Delegate,
    Schedule,
    DontDo,
}

impl MatrixCategory {
    pub const ALL: [MatrixCategory; 4] = [
        Self::DoFirst,
        Self::Delegate,
        Self::Schedule,
        Self::DontDo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::DoFirst => "Do First",
            Self::Delegate => "Delegate",
            Self::Schedule => "Schedule",
            Self::DontDo => "Don't Do",
        }
    }
}

pub fn categorize(task: &Task) -> MatrixCategory {
    match (task.urgency, task.importance) {
        (Rating::High, Rating::High) => MatrixCategory::DoFirst,
        (Rating::High, Rating::Low) => MatrixCategory::Delegate,
        (Rating::Low, Rating::High) => MatrixCategory::Schedule,
        _ => MatrixCategory::DontDo,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixBuckets {
    pub do_first: Vec<Task>,
    pub delegate: Vec<Task>,
    pub schedule: Vec<Task>,
    pub dont_do: Vec<Task>,
}

impl MatrixBuckets {
    pub fn bucket(&self, category: MatrixCategory) -> &[Task] {
        match category {
            MatrixCategory::DoFirst => &self.do_first,
            MatrixCategory::Delegate => &self.delegate,
            MatrixCategory::Schedule => &self.schedule,
            MatrixCategory::DontDo => &self.dont_do,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MatrixCategory, &[Task])> {
        MatrixCategory::ALL
            .into_iter()
            .map(|category| (category, self.bucket(category)))
    }
}

pub fn partition(tasks: &[Task]) -> MatrixBuckets {
    let mut buckets = MatrixBuckets::default();
    for task in tasks {
        let bucket = match categorize(task) {
            MatrixCategory::DoFirst => &mut buckets.do_first,
            MatrixCategory::Delegate => &mut buckets.delegate,
            MatrixCategory::Schedule => &mut buckets.schedule,
            MatrixCategory::DontDo => &mut buckets.dont_do,
        };
        bucket.push(task.clone());
    }
    buckets
}
