// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

/// A quality rating outside `1..=5`, or one that is not an integer.
#[derive(Clone, Debug, PartialEq)]
pub struct InvalidRatingError {
    /// The rejected input, as the caller supplied it.
    pub input: String,
}

impl InvalidRatingError {
    pub fn new(input: impl Display) -> Self {
        InvalidRatingError {
            input: input.to_string(),
        }
    }
}

impl Display for InvalidRatingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid rating '{}': expected an integer from 1 to 5",
            self.input
        )
    }
}

impl Error for InvalidRatingError {}

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            message: msg.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport {
            message: format!("JSON error: {value}"),
        }
    }
}

impl From<InvalidRatingError> for ErrorReport {
    fn from(value: InvalidRatingError) -> Self {
        ErrorReport {
            message: value.to_string(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: msg.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rating_message() {
        let err = InvalidRatingError::new(6);
        assert_eq!(
            err.to_string(),
            "invalid rating '6': expected an integer from 1 to 5"
        );
        let report: ErrorReport = err.into();
        assert_eq!(
            report.to_string(),
            "error: invalid rating '6': expected an integer from 1 to 5"
        );
    }

    #[test]
    fn test_fail() {
        let result: Fallible<()> = fail("boom");
        assert_eq!(result, Err(ErrorReport::new("boom")));
    }
}
