pub mod submission;

pub use submission::{Accepted, ItemRecord, PhotoRef, ScalarFields, Submission, Warning};
