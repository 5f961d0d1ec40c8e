//! Typed LMS API: models for accounts, courses, lessons, enrollments, and quizzes, and the
//! [`LmsClient`] facade that reaches them through the authenticated gateway.

pub mod account;
pub mod course;
pub mod enrollment;
pub mod id;
pub mod lesson;
pub mod listing;
pub mod quiz;

mod client;

pub use account::*;
pub use client::*;
pub use course::*;
pub use enrollment::*;
pub use id::*;
pub use lesson::*;
pub use listing::*;
pub use quiz::*;
