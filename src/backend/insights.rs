//! Small derivations the dashboards and portal pages show next to the lists.

use std::collections::{HashMap, HashSet};

use crate::backend::analytics::{normalize, GradeLabel};
use crate::backend::models::{Course, Enrollment, ResultRecord, Student};

pub const RECENT_LIMIT: usize = 5;

pub fn distinct_lecturers(courses: &[Course]) -> usize {
    courses
        .iter()
        .map(|c| c.lecturer_name.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Mean credit rounded to one decimal; 0 without courses.
pub fn average_credit(courses: &[Course]) -> f64 {
    if courses.is_empty() {
        return 0.0;
    }
    let total: u64 = courses.iter().map(|c| c.credit.unwrap_or(0) as u64).sum();
    let mean = total as f64 / courses.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Newest first, judged by id.
pub fn recent_courses(courses: &[Course]) -> Vec<Course> {
    let mut sorted = courses.to_vec();
    sorted.sort_by(|a, b| b.id.cmp(&a.id));
    sorted.truncate(RECENT_LIMIT);
    sorted
}

pub fn recent_students(students: &[Student]) -> Vec<Student> {
    let mut sorted = students.to_vec();
    sorted.sort_by(|a, b| b.id.cmp(&a.id));
    sorted.truncate(RECENT_LIMIT);
    sorted
}

/// Grade per enrollment id. Results whose enrollment carries no id are skipped.
pub fn grades_by_enrollment(results: &[ResultRecord]) -> HashMap<i64, GradeLabel> {
    results
        .iter()
        .filter_map(|r| r.enrollment.as_ref().map(|e| (e.id, normalize(r.grade.as_deref()))))
        .collect()
}

/// What the portal shows in the grade column: the grade, or "—" when there is
/// none yet.
pub fn grade_cell(grades: &HashMap<i64, GradeLabel>, enrollment_id: i64) -> String {
    match grades.get(&enrollment_id) {
        Some(GradeLabel::Graded(g)) => g.to_string(),
        _ => "—".to_string(),
    }
}

pub fn enrolled_course_ids(enrollments: &[Enrollment]) -> HashSet<i64> {
    enrollments
        .iter()
        .filter_map(|e| e.course.as_ref().map(|c| c.id))
        .collect()
}

pub fn enrollment_for_course(enrollments: &[Enrollment], course_id: i64) -> Option<&Enrollment> {
    enrollments
        .iter()
        .find(|e| e.course.as_ref().map(|c| c.id) == Some(course_id))
}

pub fn course_matches(course: &Course, query: &str) -> bool {
    let haystack = format!("{} {} {}", course.code, course.title, course.lecturer_name);
    haystack.to_lowercase().contains(&query.to_lowercase())
}

pub fn student_matches(student: &Student, query: &str) -> bool {
    let haystack = format!("{} {} {}", student.name, student.student_id, student.email);
    haystack.to_lowercase().contains(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: i64, lecturer: &str, credit: Option<u32>) -> Course {
        Course {
            id,
            code: format!("C{}", id),
            title: format!("Course {}", id),
            credit,
            lecturer_name: lecturer.to_string(),
        }
    }

    fn student(id: i64) -> Student {
        Student {
            id,
            name: format!("Student {}", id),
            student_id: format!("S{:03}", id),
            email: format!("s{}@uni.edu", id),
        }
    }

    #[test]
    fn dashboard_stats() {
        let courses = vec![
            course(1, "Lee", Some(3)),
            course(2, "Lee", Some(4)),
            course(3, "Kim", Some(4)),
        ];
        assert_eq!(distinct_lecturers(&courses), 2);
        assert_eq!(average_credit(&courses), 3.7);
        assert_eq!(average_credit(&[]), 0.0);
    }

    #[test]
    fn recent_lists_are_newest_first_and_capped() {
        let students: Vec<Student> = (1..=8).map(student).collect();
        let recent = recent_students(&students);
        assert_eq!(recent.iter().map(|s| s.id).collect::<Vec<_>>(), vec![8, 7, 6, 5, 4]);

        let courses = vec![course(2, "a", None), course(9, "b", None)];
        assert_eq!(recent_courses(&courses)[0].id, 9);
    }

    #[test]
    fn portal_grade_lookup() {
        let results = vec![
            ResultRecord {
                id: 1,
                enrollment: Some(Enrollment { id: 10, student_email: String::new(), course: None, enrolled_at: None }),
                grade: Some("b".into()),
                updated_at: None,
            },
            ResultRecord {
                id: 2,
                enrollment: Some(Enrollment { id: 11, student_email: String::new(), course: None, enrolled_at: None }),
                grade: None,
                updated_at: None,
            },
            ResultRecord { id: 3, enrollment: None, grade: Some("A".into()), updated_at: None },
        ];
        let grades = grades_by_enrollment(&results);
        assert_eq!(grades.len(), 2);
        assert_eq!(grade_cell(&grades, 10), "B");
        assert_eq!(grade_cell(&grades, 11), "—");
        assert_eq!(grade_cell(&grades, 99), "—");
    }

    #[test]
    fn enrollment_lookup_by_course() {
        let enrollments = vec![
            Enrollment { id: 5, student_email: "a@x".into(), course: Some(course(1, "Lee", Some(3))), enrolled_at: None },
            Enrollment { id: 6, student_email: "a@x".into(), course: None, enrolled_at: None },
        ];
        let ids = enrolled_course_ids(&enrollments);
        assert!(ids.contains(&1));
        assert_eq!(ids.len(), 1);
        assert_eq!(enrollment_for_course(&enrollments, 1).map(|e| e.id), Some(5));
        assert!(enrollment_for_course(&enrollments, 2).is_none());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let c = course(1, "Grace Hopper", Some(3));
        assert!(course_matches(&c, "hopper"));
        assert!(course_matches(&c, "c1"));
        assert!(course_matches(&c, ""));
        assert!(!course_matches(&c, "turing"));

        let s = student(42);
        assert!(student_matches(&s, "S042"));
        assert!(student_matches(&s, "S42@UNI"));
        assert!(!student_matches(&s, "nobody"));
    }
}
