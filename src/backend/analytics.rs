//! Grade analytics over the flat result list served by `GET /results`.
//!
//! Everything here is recomputed from scratch whenever the rows or filters
//! change; nothing is maintained incrementally.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::DateTime;

use crate::backend::models::{Course, ResultRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    pub const ALL: [Grade; 6] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E, Grade::F];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }

    /// Points on the 4.0 scale.
    pub fn points(&self) -> f64 {
        match self {
            Grade::A => 4.0,
            Grade::B => 3.0,
            Grade::C => 2.0,
            Grade::D => 1.0,
            Grade::E | Grade::F => 0.0,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Grade::A | Grade::B | Grade::C | Grade::D)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            "F" => Ok(Grade::F),
            _ => Err(()),
        }
    }
}

/// A grade after normalization: either a real grade or the "N/A" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GradeLabel {
    Graded(Grade),
    Ungraded,
}

impl GradeLabel {
    pub const ALL: [GradeLabel; 7] = [
        GradeLabel::Graded(Grade::A),
        GradeLabel::Graded(Grade::B),
        GradeLabel::Graded(Grade::C),
        GradeLabel::Graded(Grade::D),
        GradeLabel::Graded(Grade::E),
        GradeLabel::Graded(Grade::F),
        GradeLabel::Ungraded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GradeLabel::Graded(g) => g.as_str(),
            GradeLabel::Ungraded => "N/A",
        }
    }

    fn index(&self) -> usize {
        match self {
            GradeLabel::Graded(g) => *g as usize,
            GradeLabel::Ungraded => 6,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, GradeLabel::Graded(g) if g.is_pass())
    }

    pub fn points(&self) -> f64 {
        match self {
            GradeLabel::Graded(g) => g.points(),
            GradeLabel::Ungraded => 0.0,
        }
    }
}

impl fmt::Display for GradeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trims and upper-cases; anything outside A–F, or nothing at all, is N/A.
pub fn normalize(raw: Option<&str>) -> GradeLabel {
    raw.and_then(|g| g.parse::<Grade>().ok())
        .map(GradeLabel::Graded)
        .unwrap_or(GradeLabel::Ungraded)
}

pub fn label_of(result: &ResultRecord) -> GradeLabel {
    normalize(result.grade.as_deref())
}

/// Active filters on the results view. All of them must pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFilter {
    pub course_id: Option<i64>,
    pub grade: Option<GradeLabel>,
    /// Case-insensitive substring of the student email; empty matches all.
    pub email_query: String,
}

impl ResultFilter {
    pub fn matches(&self, result: &ResultRecord) -> bool {
        if let Some(course_id) = self.course_id {
            if result.course().map(|c| c.id) != Some(course_id) {
                return false;
            }
        }
        if let Some(grade) = self.grade {
            if label_of(result) != grade {
                return false;
            }
        }
        let query = self.email_query.to_lowercase();
        if !query.is_empty() {
            match result.student_email() {
                Some(email) if email.to_lowercase().contains(&query) => {}
                _ => return false,
            }
        }
        true
    }

    /// The working set, in input order.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<&'a ResultRecord>
    where
        I: IntoIterator<Item = &'a ResultRecord>,
    {
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeHistogram {
    counts: [usize; 7],
}

impl GradeHistogram {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a ResultRecord>,
    {
        let mut counts = [0usize; 7];
        for row in rows {
            counts[label_of(row).index()] += 1;
        }
        Self { counts }
    }

    pub fn count(&self, label: GradeLabel) -> usize {
        self.counts[label.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Buckets in display order A..F then N/A.
    pub fn iter(&self) -> impl Iterator<Item = (GradeLabel, usize)> + '_ {
        GradeLabel::ALL.iter().map(move |label| (*label, self.count(*label)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResultsSummary {
    pub total: usize,
    pub histogram: GradeHistogram,
    pub pass: usize,
    pub fail: usize,
    pub gpa: f64,
    pub courses_covered: usize,
}

impl ResultsSummary {
    pub fn from_rows(rows: &[&ResultRecord]) -> Self {
        let histogram = GradeHistogram::from_rows(rows.iter().copied());
        let pass = rows.iter().filter(|r| label_of(r).is_pass()).count();
        Self {
            total: histogram.total(),
            histogram,
            pass,
            fail: rows.len() - pass,
            gpa: weighted_gpa(rows),
            courses_covered: distinct_courses(rows),
        }
    }

    /// Percentage of passing rows, 0 for an empty set.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.pass as f64 / self.total as f64 * 100.0
        }
    }
}

pub fn summarize(rows: &[ResultRecord], filter: &ResultFilter) -> ResultsSummary {
    ResultsSummary::from_rows(&filter.apply(rows))
}

/// Credit-weighted mean on the 4.0 scale.
///
/// Ungraded rows stay in the denominator at zero points, so they pull the
/// average down exactly like a fail.
pub fn weighted_gpa(rows: &[&ResultRecord]) -> f64 {
    let (points, weight) = rows.iter().fold((0.0f64, 0u64), |(points, weight), r| {
        let credit = r.credit_weight();
        (points + label_of(r).points() * credit as f64, weight + credit as u64)
    });
    if weight == 0 {
        0.0
    } else {
        points / weight as f64
    }
}

pub fn distinct_courses(rows: &[&ResultRecord]) -> usize {
    rows.iter()
        .filter_map(|r| r.course().map(|c| c.id))
        .collect::<HashSet<_>>()
        .len()
}

/// Courses referenced by any result, for the course filter. Sorted by code,
/// or by title when a course has no code.
pub fn courses_in(rows: &[ResultRecord]) -> Vec<Course> {
    let mut by_id: BTreeMap<i64, Course> = BTreeMap::new();
    for course in rows.iter().filter_map(|r| r.course()) {
        by_id.insert(course.id, course.clone());
    }
    let mut courses: Vec<Course> = by_id.into_values().collect();
    courses.sort_by(|a, b| sort_key(a).cmp(sort_key(b)));
    courses
}

fn sort_key(course: &Course) -> &str {
    if course.code.is_empty() {
        &course.title
    } else {
        &course.code
    }
}

/// Renders an RFC 3339 timestamp for display; unparsable values pass through.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// CSV export of the working set. Every cell is quoted.
pub fn to_csv(rows: &[&ResultRecord]) -> String {
    let mut lines = vec![csv_line(&[
        "Result ID",
        "Student Email",
        "Course Code",
        "Course Title",
        "Credit",
        "Grade",
        "Updated At",
    ])];
    for r in rows {
        let course = r.course();
        let id = r.id.to_string();
        let credit = course.and_then(|c| c.credit).map(|c| c.to_string()).unwrap_or_default();
        let updated = r.updated_at.as_deref().map(format_timestamp).unwrap_or_default();
        lines.push(csv_line(&[
            &id,
            r.student_email().unwrap_or(""),
            course.map(|c| c.code.as_str()).unwrap_or(""),
            course.map(|c| c.title.as_str()).unwrap_or(""),
            &credit,
            label_of(r).as_str(),
            &updated,
        ]));
    }
    lines.join("\n")
}

fn csv_line(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::models::Enrollment;

    fn course(id: i64, code: &str, credit: Option<u32>) -> Course {
        Course {
            id,
            code: code.to_string(),
            title: format!("Course {}", id),
            credit,
            lecturer_name: "Dr. Who".to_string(),
        }
    }

    fn result(id: i64, grade: Option<&str>, email: &str, course: Option<Course>) -> ResultRecord {
        ResultRecord {
            id,
            enrollment: Some(Enrollment {
                id: id + 100,
                student_email: email.to_string(),
                course,
                enrolled_at: None,
            }),
            grade: grade.map(str::to_string),
            updated_at: None,
        }
    }

    fn sample() -> Vec<ResultRecord> {
        vec![
            result(1, Some("A"), "alice@uni.edu", Some(course(1, "CS101", Some(3)))),
            result(2, Some("F"), "bob@uni.edu", Some(course(1, "CS101", Some(3)))),
            result(3, None, "carol@uni.edu", Some(course(2, "MA201", Some(4)))),
        ]
    }

    #[test]
    fn normalize_handles_case_whitespace_and_junk() {
        assert_eq!(normalize(None), GradeLabel::Ungraded);
        assert_eq!(normalize(Some("a")), GradeLabel::Graded(Grade::A));
        assert_eq!(normalize(Some("Z")), GradeLabel::Ungraded);
        assert_eq!(normalize(Some(" b ")), GradeLabel::Graded(Grade::B));
        assert_eq!(normalize(Some("")), GradeLabel::Ungraded);
        assert_eq!(normalize(Some("AB")), GradeLabel::Ungraded);
        assert_eq!(GradeLabel::Ungraded.to_string(), "N/A");
    }

    #[test]
    fn end_to_end_example() {
        let rows = sample();
        let summary = summarize(&rows, &ResultFilter::default());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.histogram.count(GradeLabel::Graded(Grade::A)), 1);
        assert_eq!(summary.histogram.count(GradeLabel::Graded(Grade::F)), 1);
        assert_eq!(summary.histogram.count(GradeLabel::Ungraded), 1);
        for g in [Grade::B, Grade::C, Grade::D, Grade::E] {
            assert_eq!(summary.histogram.count(GradeLabel::Graded(g)), 0);
        }
        assert_eq!(summary.pass, 1);
        assert_eq!(summary.fail, 2);
        assert!((summary.gpa - 1.2).abs() < 1e-9, "gpa was {}", summary.gpa);
        assert_eq!(summary.courses_covered, 2);
    }

    #[test]
    fn empty_working_set_is_all_zero() {
        let summary = summarize(&[], &ResultFilter::default());
        assert_eq!(summary, ResultsSummary::default());
        assert_eq!(summary.pass_rate(), 0.0);
    }

    #[test]
    fn missing_credit_weighs_one() {
        let rows = vec![
            result(1, Some("A"), "a@x", Some(course(1, "X", None))),
            result(2, Some("C"), "b@x", None),
        ];
        let refs: Vec<&ResultRecord> = rows.iter().collect();
        assert!((weighted_gpa(&refs) - 3.0).abs() < 1e-9);
        assert_eq!(distinct_courses(&refs), 1);
    }

    #[test]
    fn filters_combine_and_are_idempotent() {
        let mut rows = sample();
        rows.push(result(4, Some("b"), "ALICE@uni.edu", Some(course(2, "MA201", Some(4)))));

        let filter = ResultFilter {
            course_id: Some(2),
            grade: None,
            email_query: "alice".to_string(),
        };
        let once = filter.apply(&rows);
        assert_eq!(once.iter().map(|r| r.id).collect::<Vec<_>>(), vec![4]);

        let twice = filter.apply(once.iter().copied());
        assert_eq!(once, twice);

        let by_grade = ResultFilter { grade: Some(GradeLabel::Ungraded), ..Default::default() };
        assert_eq!(by_grade.apply(&rows).iter().map(|r| r.id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn email_filter_excludes_rows_without_email() {
        let rows = vec![ResultRecord { id: 9, enrollment: None, grade: Some("A".into()), updated_at: None }];
        let filter = ResultFilter { email_query: "a".into(), ..Default::default() };
        assert!(filter.apply(&rows).is_empty());
        assert_eq!(ResultFilter::default().apply(&rows).len(), 1);
    }

    #[test]
    fn email_query_is_matched_as_typed() {
        let rows = sample();
        let blank = ResultFilter { email_query: "  ".into(), ..Default::default() };
        assert!(blank.apply(&rows).is_empty());

        let padded = ResultFilter { email_query: " bob@".into(), ..Default::default() };
        assert!(padded.apply(&rows).is_empty());

        let exact = ResultFilter { email_query: "BOB@".into(), ..Default::default() };
        assert_eq!(exact.apply(&rows).iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn invariants_hold_across_generated_inputs() {
        let grades = [Some("A"), Some("b"), Some(" c"), Some("D"), Some("e"), Some("F"), Some("x"), None];
        let mut rows = Vec::new();
        for i in 0..64i64 {
            let grade = grades[(i as usize * 7) % grades.len()];
            let credit = 1 + (i as u32 % 5);
            rows.push(result(i, grade, &format!("s{}@uni.edu", i % 9), Some(course(i % 4, "C", Some(credit)))));
        }

        for course_id in [None, Some(0), Some(3), Some(99)] {
            for query in ["", "s1", "S2@", "nobody"] {
                let filter = ResultFilter { course_id, grade: None, email_query: query.into() };
                let working = filter.apply(&rows);
                let summary = ResultsSummary::from_rows(&working);
                assert_eq!(summary.histogram.total(), working.len());
                assert_eq!(summary.pass + summary.fail, working.len());
                assert!(summary.gpa >= 0.0 && summary.gpa <= 4.0);
                assert_eq!(filter.apply(working.iter().copied()), working);
            }
        }
    }

    #[test]
    fn course_options_are_distinct_and_sorted() {
        let mut rows = sample();
        rows.push(result(5, Some("B"), "d@x", Some(course(3, "", Some(2)))));
        let courses = courses_in(&rows);
        let keys: Vec<&str> = courses.iter().map(|c| sort_key(c)).collect();
        assert_eq!(keys, vec!["CS101", "Course 3", "MA201"]);
    }

    #[test]
    fn csv_quotes_every_cell() {
        let mut rows = sample();
        rows[0].updated_at = Some("2024-05-01T10:30:00Z".into());
        if let Some(c) = rows[0].enrollment.as_mut().and_then(|e| e.course.as_mut()) {
            c.title = "Intro \"Rust\"".into();
        }
        let refs: Vec<&ResultRecord> = rows.iter().collect();
        let csv = to_csv(&refs);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("\"Result ID\",\"Student Email\""));
        assert_eq!(
            lines[1],
            "\"1\",\"alice@uni.edu\",\"CS101\",\"Intro \"\"Rust\"\"\",\"3\",\"A\",\"2024-05-01 10:30\""
        );
        assert!(lines[3].contains("\"N/A\""));
    }
}
