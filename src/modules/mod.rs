pub mod lessons;
pub mod levels;
pub mod publication;
pub mod students;
pub mod subjects;
