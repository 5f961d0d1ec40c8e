//! Buffered backend responses and their typed decoding.

// self
use crate::_prelude::*;

/// Fully buffered HTTP response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response with empty headers.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Body rendered as (lossy) UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as `T`, reporting the JSON path of any mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { source, status: self.status.as_u16() })
	}

	/// Converts a non-success response into [`Error::Api`], extracting `{"detail": ...}`.
	pub fn into_error(self) -> Error {
		#[derive(Deserialize)]
		struct ErrorBody {
			detail: String,
		}

		let detail = serde_json::from_slice::<ErrorBody>(&self.body).ok().map(|b| b.detail);

		Error::Api { status: self.status.as_u16(), detail, body: self.text() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decode_errors_report_json_path() {
		#[derive(Debug, Deserialize)]
		struct Course {
			#[allow(dead_code)]
			id: u64,
		}

		let response = ApiResponse::new(StatusCode::OK, r#"[{"id":1},{"id":"two"}]"#);
		let err = response.json::<Vec<Course>>().expect_err("String id should fail to decode.");

		match err {
			Error::Decode { source, status } => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "[1].id");
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn into_error_extracts_detail() {
		let response = ApiResponse::new(
			StatusCode::UNAUTHORIZED,
			r#"{"detail":"Given token not valid for any token type"}"#,
		);

		match response.into_error() {
			Error::Api { status, detail, .. } => {
				assert_eq!(status, 401);
				assert_eq!(detail.as_deref(), Some("Given token not valid for any token type"));
			},
			other => panic!("Unexpected error: {other:?}."),
		}

		let plain = ApiResponse::new(StatusCode::BAD_GATEWAY, "upstream down").into_error();

		assert!(matches!(plain, Error::Api { status: 502, detail: None, .. }));
	}
}
