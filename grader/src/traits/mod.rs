pub mod feedback;
pub mod grader;
