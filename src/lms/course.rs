//! Courses and their teachers.

// self
use crate::{
	_prelude::*,
	lms::{CourseId, LmsClient, Listing, UserId, UserProfile},
	transport::HttpTransport,
};

/// Teacher reference as it appears on a course.
///
/// Course listings nest the full user object, while some write paths echo only the primary key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeacherRef {
	/// Bare primary key.
	Id(UserId),
	/// Nested account.
	User(Box<UserProfile>),
}
impl TeacherRef {
	/// Teacher's primary key regardless of representation.
	pub fn id(&self) -> UserId {
		match self {
			TeacherRef::Id(id) => *id,
			TeacherRef::User(user) => user.id,
		}
	}

	/// Teacher's login name, when the account is nested.
	pub fn username(&self) -> Option<&str> {
		match self {
			TeacherRef::Id(_) => None,
			TeacherRef::User(user) => Some(&user.username),
		}
	}
}

/// Course as returned by the course endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
	/// Primary key.
	pub id: CourseId,
	/// Title.
	pub title: String,
	/// Free-form description; the backend allows it to be blank or null.
	#[serde(default)]
	pub description: Option<String>,
	/// Assigned teacher, if any.
	#[serde(default)]
	pub teacher: Option<TeacherRef>,
}

/// Course creation body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewCourse {
	/// Title; must not be blank.
	pub title: String,
	/// Optional description; omitted from the body when unset.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Teacher to assign; administrators use this to create courses on a teacher's behalf.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub teacher: Option<UserId>,
}
impl NewCourse {
	/// Builds a course body, trimming the title and dropping a blank description.
	pub fn new(title: impl Into<String>, description: Option<&str>) -> Self {
		let title = title.into().trim().to_owned();
		let description =
			description.map(str::trim).filter(|d| !d.is_empty()).map(ToOwned::to_owned);

		Self { title, description, teacher: None }
	}

	/// Assigns the course to `teacher`.
	pub fn for_teacher(mut self, teacher: UserId) -> Self {
		self.teacher = Some(teacher);

		self
	}
}

/// Groups courses by teacher id; unassigned courses are skipped.
pub fn group_by_teacher<'a, I>(courses: I) -> BTreeMap<UserId, Vec<&'a Course>>
where
	I: IntoIterator<Item = &'a Course>,
{
	let mut grouped = BTreeMap::<UserId, Vec<&Course>>::new();

	for course in courses {
		if let Some(teacher) = &course.teacher {
			grouped.entry(teacher.id()).or_default().push(course);
		}
	}

	grouped
}

impl<T> LmsClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists every course visible to the caller.
	pub async fn courses(&self) -> Result<Listing<Course>> {
		self.get_json("courses/").await
	}

	/// Lists the courses taught by the authenticated teacher.
	pub async fn my_courses(&self) -> Result<Listing<Course>> {
		self.get_json("courses/my/").await
	}

	/// Fetches one course.
	pub async fn course(&self, id: CourseId) -> Result<Course> {
		self.get_json(format!("courses/{id}/")).await
	}

	/// Creates a course.
	pub async fn create_course(&self, course: &NewCourse) -> Result<Course> {
		self.send_json(Method::POST, "courses/", course).await
	}
}
