pub mod design;
pub mod error;
pub mod linalg;
pub mod mixed;
pub mod ols;
pub mod runner;
pub mod summary;
