//! Form drafts as typed in by the user, and their validation into request
//! payloads. Validation failures never reach the network.

use std::collections::BTreeMap;

use crate::backend::models::{Course, CoursePayload, Student, StudentPayload};

/// Field name → message, rendered inline under each input.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

pub const DEFAULT_CREDIT: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub code: String,
    pub title: String,
    pub credit: String,
    pub lecturer_name: String,
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            code: String::new(),
            title: String::new(),
            credit: DEFAULT_CREDIT.to_string(),
            lecturer_name: String::new(),
        }
    }
}

impl From<&Course> for CourseDraft {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code.clone(),
            title: course.title.clone(),
            credit: course.credit.unwrap_or(DEFAULT_CREDIT).to_string(),
            lecturer_name: course.lecturer_name.clone(),
        }
    }
}

impl CourseDraft {
    pub fn validate(&self) -> Result<CoursePayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.code.trim().is_empty() {
            errors.insert("code", "Code is required");
        }
        if self.title.trim().is_empty() {
            errors.insert("title", "Title is required");
        }
        if self.lecturer_name.trim().is_empty() {
            errors.insert("lecturerName", "Lecturer is required");
        }
        let credit = match self.credit.trim().parse::<u32>() {
            Ok(c) if c >= 1 => Some(c),
            _ => {
                errors.insert("credit", "Credit must be positive");
                None
            }
        };

        match credit {
            Some(credit) if errors.is_empty() => Ok(CoursePayload {
                code: self.code.trim().to_string(),
                title: self.title.trim().to_string(),
                credit,
                lecturer_name: self.lecturer_name.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentDraft {
    pub name: String,
    pub student_id: String,
    pub email: String,
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            student_id: student.student_id.clone(),
            email: student.email.clone(),
        }
    }
}

impl StudentDraft {
    pub fn validate(&self) -> Result<StudentPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required");
        }
        if self.student_id.trim().is_empty() {
            errors.insert("studentId", "Student ID is required");
        }
        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required");
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(StudentPayload {
            name: self.name.trim().to_string(),
            student_id: self.student_id.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }
}
