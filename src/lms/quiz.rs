//! Quizzes: delivery, attempt submission, and graded results.

// self
use crate::{
	_prelude::*,
	lms::{AttemptId, ChoiceId, LessonId, LmsClient, QuestionId, QuizId, UserId},
	transport::HttpTransport,
};

/// Answer option. The answer key is never exposed on delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
	/// Primary key.
	pub id: ChoiceId,
	/// Option text.
	pub text: String,
}

/// Question as delivered to a student.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
	/// Primary key.
	pub id: QuestionId,
	/// Prompt.
	pub text: String,
	/// Answer options.
	#[serde(default)]
	pub choices: Vec<Choice>,
}
impl Question {
	/// Whether `choice` is one of this question's options.
	pub fn offers(&self, choice: ChoiceId) -> bool {
		self.choices.iter().any(|c| c.id == choice)
	}
}

/// Quiz attached to a lesson.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
	/// Primary key.
	pub id: QuizId,
	/// Title.
	pub title: String,
	/// Lesson the quiz belongs to.
	pub lesson: LessonId,
	/// Questions in delivery order.
	#[serde(default)]
	pub questions: Vec<Question>,
}

/// One selected answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
	/// Question being answered.
	pub question: QuestionId,
	/// Chosen option.
	pub selected_choice: ChoiceId,
}

/// Attempt body accepted by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuizSubmission {
	/// Quiz being attempted.
	pub quiz: QuizId,
	/// One answer per question, in question order.
	pub answers: Vec<AnswerSubmission>,
}
impl QuizSubmission {
	/// Builds a submission for `quiz` from `(question, choice)` selections.
	///
	/// Selections for questions outside the quiz, or naming an option the question does not
	/// offer, are dropped. A later selection for the same question replaces an earlier one.
	/// Fails with [`Error::IncompleteSubmission`] unless every question ends up answered.
	pub fn for_quiz<I>(quiz: &Quiz, selections: I) -> Result<Self>
	where
		I: IntoIterator<Item = (QuestionId, ChoiceId)>,
	{
		let mut chosen = HashMap::<QuestionId, ChoiceId>::new();

		for (question, choice) in selections {
			if quiz.questions.iter().any(|q| q.id == question && q.offers(choice)) {
				chosen.insert(question, choice);
			}
		}

		let answers = quiz
			.questions
			.iter()
			.filter_map(|q| {
				chosen
					.get(&q.id)
					.map(|&selected_choice| AnswerSubmission { question: q.id, selected_choice })
			})
			.collect::<Vec<_>>();

		if answers.len() != quiz.questions.len() {
			return Err(Error::IncompleteSubmission {
				answered: answers.len(),
				expected: quiz.questions.len(),
			});
		}

		Ok(Self { quiz: quiz.id, answers })
	}
}

/// Attempt as echoed back after submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttempt {
	/// Attempt id; used to fetch the graded result.
	pub id: AttemptId,
	/// Quiz attempted.
	pub quiz: QuizId,
	/// Submitted answers.
	#[serde(default)]
	pub answers: Vec<AnswerSubmission>,
}

/// Question with its explanation and answer key, shown after grading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
	/// Primary key.
	pub id: QuestionId,
	/// Prompt.
	pub text: String,
	/// Why the correct option is right; may be blank.
	#[serde(default)]
	pub explanation: String,
	/// Answer options.
	#[serde(default)]
	pub choices: Vec<Choice>,
	/// Correct option, when one is configured.
	#[serde(default)]
	pub correct_choice: Option<Choice>,
}

/// Graded answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
	/// Question with its answer key.
	pub question: QuestionResult,
	/// Option the student selected.
	pub selected_choice: ChoiceId,
}
impl AnswerResult {
	/// Whether the selected option is the correct one.
	pub fn is_correct(&self) -> bool {
		self.question.correct_choice.as_ref().is_some_and(|c| c.id == self.selected_choice)
	}
}

/// Graded attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
	/// Attempt id.
	pub id: AttemptId,
	/// Student who made the attempt.
	pub student: UserId,
	/// Title of the attempted quiz.
	pub quiz_title: String,
	/// Percentage score in `0.0..=100.0`.
	pub score: f64,
	/// Grading timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub completed_at: OffsetDateTime,
	/// Graded answers.
	#[serde(default)]
	pub answers: Vec<AnswerResult>,
}
impl QuizResult {
	/// Number of correctly answered questions.
	pub fn correct_count(&self) -> usize {
		self.answers.iter().filter(|a| a.is_correct()).count()
	}

	/// Answers the student got wrong.
	pub fn missed(&self) -> impl Iterator<Item = &AnswerResult> {
		self.answers.iter().filter(|a| !a.is_correct())
	}
}

impl<T> LmsClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Fetches the quiz attached to `lesson`.
	pub async fn quiz_for_lesson(&self, lesson: LessonId) -> Result<Quiz> {
		self.get_json(format!("quizzes/{lesson}/")).await
	}

	/// Submits an attempt for grading.
	pub async fn submit_attempt(&self, submission: &QuizSubmission) -> Result<QuizAttempt> {
		self.send_json(Method::POST, "quizzes/attempt/", submission).await
	}

	/// Fetches the graded result of an attempt.
	pub async fn attempt_result(&self, attempt: AttemptId) -> Result<QuizResult> {
		self.get_json(format!("quizzes/result/{attempt}/")).await
	}
}
