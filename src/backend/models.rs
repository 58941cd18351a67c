use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Student => "Student",
        }
    }
}

/// Who is using the app right now. Serialized as-is under the session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Session {
    pub fn admin() -> Self {
        Self { email: "admin@local".to_string(), role: Role::Admin, name: None }
    }

    pub fn student(email: impl Into<String>, name: Option<String>) -> Self {
        Self { email: email.into(), role: Role::Student, name }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub code: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default)]
    pub credit: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub lecturer_name: String,
}

impl Course {
    /// "CS101 — Algorithms", or just the title when there is no code.
    pub fn display_name(&self) -> String {
        if self.code.is_empty() {
            self.title.clone()
        } else {
            format!("{} — {}", self.code, self.title)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub student_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
}

/// An enrollment as returned by the backend. When embedded in a result it may
/// carry only its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub student_email: String,
    #[serde(default)]
    pub course: Option<Course>,
    #[serde(default)]
    pub enrolled_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: i64,
    #[serde(default)]
    pub enrollment: Option<Enrollment>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ResultRecord {
    pub fn course(&self) -> Option<&Course> {
        self.enrollment.as_ref().and_then(|e| e.course.as_ref())
    }

    pub fn student_email(&self) -> Option<&str> {
        self.enrollment
            .as_ref()
            .map(|e| e.student_email.as_str())
            .filter(|email| !email.is_empty())
    }

    /// Credit weight for GPA purposes; absent credit counts as 1.
    pub fn credit_weight(&self) -> u32 {
        self.course().and_then(|c| c.credit).unwrap_or(1)
    }
}

/// Body for `POST /admin/courses` and `PUT /admin/courses/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    pub code: String,
    pub title: String,
    pub credit: u32,
    pub lecturer_name: String,
}

/// Body for `POST /admin/students` and `PUT /admin/students/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub name: String,
    pub student_id: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_round_trips_with_uppercase_role() {
        let session = Session::student("alice@example.com", None);
        let raw = serde_json::to_string(&session).unwrap();
        assert_eq!(raw, r#"{"email":"alice@example.com","role":"STUDENT"}"#);
        let back: Session = serde_json::from_str(r#"{"email":"a@x","role":"ADMIN","name":"Ann"}"#).unwrap();
        assert_eq!(back.role, Role::Admin);
        assert_eq!(back.name.as_deref(), Some("Ann"));
    }

    #[test]
    fn result_with_id_only_enrollment_and_nulls_parses() {
        let raw = json!({
            "id": 7,
            "enrollment": { "id": 3, "studentEmail": null },
            "grade": null,
            "updatedAt": "2024-05-01T10:00:00Z"
        });
        let result: ResultRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(result.enrollment.as_ref().map(|e| e.id), Some(3));
        assert!(result.course().is_none());
        assert_eq!(result.student_email(), None);
        assert_eq!(result.credit_weight(), 1);
        assert_eq!(result.grade, None);
    }

    #[test]
    fn enrollment_date_is_read_for_display() {
        let raw = json!({
            "id": 4,
            "studentEmail": "ann@uni.edu",
            "enrolledAt": "2024-09-02T08:30:00.123456Z"
        });
        let enrollment: Enrollment = serde_json::from_value(raw).unwrap();
        let shown = enrollment.enrolled_at.as_deref().map(crate::backend::analytics::format_timestamp);
        assert_eq!(shown.as_deref(), Some("2024-09-02 08:30"));

        let bare: Enrollment = serde_json::from_value(json!({ "id": 5 })).unwrap();
        assert_eq!(bare.enrolled_at, None);
    }

    #[test]
    fn course_payload_serializes_camel_case() {
        let payload = CoursePayload {
            code: "CS101".into(),
            title: "Intro".into(),
            credit: 3,
            lecturer_name: "Dr. Lee".into(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["lecturerName"], "Dr. Lee");
        assert_eq!(value["credit"], 3);
    }

    #[test]
    fn course_display_name_skips_missing_code() {
        let course: Course = serde_json::from_value(json!({ "id": 1, "title": "Algebra" })).unwrap();
        assert_eq!(course.display_name(), "Algebra");
        assert_eq!(course.credit, None);
        assert_eq!(course.lecturer_name, "");
    }
}
