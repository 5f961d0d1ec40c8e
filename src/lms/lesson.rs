//! Lessons.

// self
use crate::{
	_prelude::*,
	lms::{CourseId, LessonId, LmsClient, Listing},
	transport::HttpTransport,
};

/// Lesson within a course.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
	/// Primary key.
	pub id: LessonId,
	/// Owning course.
	pub course: CourseId,
	/// Title.
	pub title: String,
	/// Body text.
	#[serde(default)]
	pub content: String,
	/// Position within the course.
	#[serde(default)]
	pub order: u32,
}

impl<T> LmsClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists lessons visible to the caller, ordered by course then position.
	pub async fn lessons(&self) -> Result<Listing<Lesson>> {
		let mut listing: Listing<Lesson> = self.get_json("lessons/").await?;

		listing.items.sort_by_key(|l| (l.course, l.order));

		Ok(listing)
	}

	/// Lessons of one course in teaching order.
	pub async fn course_lessons(&self, course: CourseId) -> Result<Vec<Lesson>> {
		Ok(self.lessons().await?.into_iter().filter(|l| l.course == course).collect())
	}

	/// Fetches one lesson.
	pub async fn lesson(&self, id: LessonId) -> Result<Lesson> {
		self.get_json(format!("lessons/{id}/")).await
	}
}
