//! Strongly typed backend identifiers.

// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "u64", into = "u64")]
		pub struct $name(u64);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: u64) -> Result<Self, IdentifierError> {
				validate($kind, value)?;

				Ok(Self(value))
			}

			/// Raw numeric value.
			pub const fn get(self) -> u64 {
				self.0
			}
		}
		impl From<$name> for u64 {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<u64> for $name {
			type Error = IdentifierError;

			fn try_from(value: u64) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				Display::fmt(&self.0, f)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				let value = s
					.trim()
					.parse::<u64>()
					.map_err(|_| IdentifierError::NotNumeric { kind: $kind, value: s.into() })?;

				Self::new(value)
			}
		}
	};
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// Backend primary keys start at 1.
	#[error("{kind} identifier cannot be zero.")]
	Zero {
		/// Kind of identifier (course, lesson, ...).
		kind: &'static str,
	},
	/// The identifier text is not an unsigned integer.
	#[error("{kind} identifier `{value}` is not a number.")]
	NotNumeric {
		/// Kind of identifier (course, lesson, ...).
		kind: &'static str,
		/// Rejected input.
		value: String,
	},
}

def_id! { UserId, "Primary key of a user account.", "User" }
def_id! { CourseId, "Primary key of a course.", "Course" }
def_id! { LessonId, "Primary key of a lesson.", "Lesson" }
def_id! { QuizId, "Primary key of a quiz.", "Quiz" }
def_id! { QuestionId, "Primary key of a quiz question.", "Question" }
def_id! { ChoiceId, "Primary key of a question choice.", "Choice" }
def_id! { AttemptId, "Primary key of a graded quiz attempt.", "Attempt" }

fn validate(kind: &'static str, value: u64) -> Result<(), IdentifierError> {
	if value == 0 { Err(IdentifierError::Zero { kind }) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_zero_and_garbage() {
		assert_eq!(CourseId::new(0), Err(IdentifierError::Zero { kind: "Course" }));
		assert!(matches!("abc".parse::<LessonId>(), Err(IdentifierError::NotNumeric { .. })));

		let lesson: LessonId = " 12 ".parse().expect("Padded numeric id should parse.");

		assert_eq!(lesson.get(), 12);
		assert_eq!(lesson.to_string(), "12");
		assert_eq!(format!("{lesson:?}"), "Lesson(12)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let course: CourseId = serde_json::from_str("7").expect("Course id should deserialize.");

		assert_eq!(u64::from(course), 7);
		assert_eq!(serde_json::to_string(&course).expect("Course id should serialize."), "7");
		assert!(serde_json::from_str::<CourseId>("0").is_err());
		assert!(serde_json::from_str::<CourseId>("-1").is_err());
	}
}
