//! Enrollments: joining courses, a student's own courses, and a course's roster.

// self
use crate::{
	_prelude::*,
	lms::{Course, CourseId, LmsClient, Listing, UserProfile},
	transport::{ApiRequest, HttpTransport},
};

/// Course the authenticated student is enrolled in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentEnrollment {
	/// Enrolled course.
	pub course: Course,
	/// Enrollment timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub enrolled_at: OffsetDateTime,
}

/// Student enrolled in a course, as seen by its teacher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
	/// Enrolled student.
	pub student: UserProfile,
	/// Enrollment timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub enrolled_at: OffsetDateTime,
}

#[derive(Deserialize)]
struct DetailBody {
	#[serde(default)]
	detail: String,
}

impl<T> LmsClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Enrolls the authenticated student in `course` and returns the backend's confirmation.
	///
	/// Enrolling twice is rejected by the backend with `400` and surfaces as [`Error::Api`].
	pub async fn enroll(&self, course: CourseId) -> Result<String> {
		let body: DetailBody = self
			.gateway()
			.execute_json(ApiRequest::post(format!("enrollments/courses/{course}/enroll/")))
			.await?;

		Ok(body.detail)
	}

	/// Lists the authenticated student's enrollments, newest first.
	pub async fn my_enrollments(&self) -> Result<Listing<StudentEnrollment>> {
		let mut listing: Listing<StudentEnrollment> =
			self.get_json("enrollments/my-enrollments/").await?;

		listing.items.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at));

		Ok(listing)
	}

	/// Lists the students enrolled in `course` (teachers and administrators only).
	pub async fn roster(&self, course: CourseId) -> Result<Listing<RosterEntry>> {
		self.get_json(format!("enrollments/courses/{course}/roster/")).await
	}
}
