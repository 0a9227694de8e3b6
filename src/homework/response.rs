//! Structural validation of the homework status payload

use serde_json::Value;

use crate::error::ResponseError;

/// Check the payload shape and return its `homeworks` list unmodified.
///
/// The checks run in a fixed order so each failure is reported precisely:
/// object, non-empty, `homeworks` key, `current_date` key, `homeworks` is a list.
pub fn validate(payload: &Value) -> Result<&Vec<Value>, ResponseError> {
    let map = payload.as_object().ok_or(ResponseError::NotAMapping)?;

    if map.is_empty() {
        return Err(ResponseError::EmptyResponse);
    }
    let homeworks = map
        .get("homeworks")
        .ok_or(ResponseError::MissingHomeworksKey)?;
    if !map.contains_key("current_date") {
        return Err(ResponseError::MissingCurrentDateKey);
    }

    homeworks.as_array().ok_or(ResponseError::HomeworksNotAList)
}

/// A fully validated payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Homework records, most recent first as ordered by the server
    pub homeworks: Vec<Value>,

    /// Server time to use as the next `from_date`
    pub current_date: i64,
}

impl ApiResponse {
    /// Validate `payload` wholesale; nothing is trusted unless every check passes.
    pub fn from_value(payload: Value) -> Result<Self, ResponseError> {
        let homeworks = validate(&payload)?.clone();
        let current_date = payload
            .get("current_date")
            .and_then(Value::as_i64)
            .ok_or(ResponseError::CurrentDateNotAnInteger)?;

        Ok(Self {
            homeworks,
            current_date,
        })
    }

    /// The record the notification is derived from.
    pub fn latest(&self) -> Option<&Value> {
        self.homeworks.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_accepts_well_formed_payload() {
        let payload = json!({
            "homeworks": [
                {"homework_name": "proj2", "status": "reviewing"},
                {"homework_name": "proj1", "status": "approved"}
            ],
            "current_date": 1_700_000_000
        });

        let homeworks = validate(&payload).unwrap();
        assert_eq!(homeworks.len(), 2);
        assert_eq!(homeworks[0]["homework_name"], "proj2");
    }

    #[test]
    fn test_validate_empty_list_is_valid() {
        let payload = json!({"homeworks": [], "current_date": 0});
        assert!(validate(&payload).unwrap().is_empty());
    }

    #[test]
    fn test_validate_not_a_mapping() {
        assert_eq!(validate(&json!([])), Err(ResponseError::NotAMapping));
        assert_eq!(validate(&json!("homeworks")), Err(ResponseError::NotAMapping));
        assert_eq!(validate(&Value::Null), Err(ResponseError::NotAMapping));
    }

    #[test]
    fn test_validate_empty_mapping() {
        assert_eq!(validate(&json!({})), Err(ResponseError::EmptyResponse));
    }

    #[test]
    fn test_validate_missing_homeworks() {
        assert_eq!(
            validate(&json!({"current_date": 1})),
            Err(ResponseError::MissingHomeworksKey)
        );
    }

    #[test]
    fn test_validate_missing_current_date() {
        assert_eq!(
            validate(&json!({"homeworks": []})),
            Err(ResponseError::MissingCurrentDateKey)
        );
    }

    #[test]
    fn test_validate_homeworks_not_a_list() {
        for homeworks in [json!("proj1"), json!(42), json!({"homework_name": "proj1"})] {
            assert_eq!(
                validate(&json!({"homeworks": homeworks, "current_date": 1})),
                Err(ResponseError::HomeworksNotAList)
            );
        }
    }

    #[test]
    fn test_api_response_requires_integer_date() {
        let result = ApiResponse::from_value(json!({"homeworks": [], "current_date": "today"}));
        assert_eq!(result, Err(ResponseError::CurrentDateNotAnInteger));

        let response = ApiResponse::from_value(json!({
            "homeworks": [{"homework_name": "proj1", "status": "approved"}],
            "current_date": 1_700_000_000
        }))
        .unwrap();
        assert_eq!(response.current_date, 1_700_000_000);
        assert_eq!(response.latest().unwrap()["homework_name"], "proj1");
    }
}
