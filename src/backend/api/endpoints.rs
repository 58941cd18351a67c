use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::backend::analytics::Grade;
use crate::backend::api::client::ApiClient;
use crate::backend::error::ApiResult;
use crate::backend::models::{Course, CoursePayload, Enrollment, ResultRecord, Student, StudentPayload};

/// Badge text for views whose backend has no usable `/results`.
pub const RESULTS_UNAVAILABLE: &str = "No /results endpoint found — showing empty analytics.";

/// The two paths that list a student's enrollments. Backends expose one or
/// both; which one works is discovered on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentRoute {
    Primary,
    Fallback,
}

impl EnrollmentRoute {
    pub fn path(&self) -> &'static str {
        match self {
            EnrollmentRoute::Primary => "/enrollments",
            EnrollmentRoute::Fallback => "/me/enrollments",
        }
    }
}

/// Typed access to every backend endpoint the views use.
#[derive(Clone)]
pub struct CourseApi {
    client: ApiClient,
    enrollment_route: Arc<Mutex<Option<EnrollmentRoute>>>,
}

impl CourseApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(ApiClient::new(base_url))
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self {
            client,
            enrollment_route: Arc::new(Mutex::new(None)),
        }
    }

    // Courses

    pub async fn list_courses(&self) -> ApiResult<Vec<Course>> {
        self.client.fetch_json("/courses", &[]).await
    }

    pub async fn create_course(&self, payload: &CoursePayload) -> ApiResult<Option<Course>> {
        let created = self.client.create_json("/admin/courses", payload).await?;
        info!("Created course {}", payload.code);
        Ok(created)
    }

    pub async fn update_course(&self, id: i64, payload: &CoursePayload) -> ApiResult<Option<Course>> {
        let updated = self.client.replace_json(&format!("/admin/courses/{}", id), payload).await?;
        info!("Updated course {}", id);
        Ok(updated)
    }

    pub async fn delete_course(&self, id: i64) -> ApiResult<()> {
        self.client.delete_resource(&format!("/admin/courses/{}", id)).await?;
        info!("Deleted course {}", id);
        Ok(())
    }

    // Students

    pub async fn list_students(&self) -> ApiResult<Vec<Student>> {
        self.client.fetch_json("/students", &[]).await
    }

    pub async fn create_student(&self, payload: &StudentPayload) -> ApiResult<Option<Student>> {
        let created = self.client.create_json("/admin/students", payload).await?;
        info!("Created student {}", payload.student_id);
        Ok(created)
    }

    pub async fn update_student(&self, id: i64, payload: &StudentPayload) -> ApiResult<Option<Student>> {
        let updated = self.client.replace_json(&format!("/admin/students/{}", id), payload).await?;
        info!("Updated student {}", id);
        Ok(updated)
    }

    pub async fn delete_student(&self, id: i64) -> ApiResult<()> {
        self.client.delete_resource(&format!("/admin/students/{}", id)).await?;
        info!("Deleted student {}", id);
        Ok(())
    }

    // Enrollments

    /// Lists a student's enrollments through whichever path this backend
    /// supports, probing primary then fallback only the first time.
    pub async fn list_enrollments(&self, student_email: &str) -> ApiResult<Vec<Enrollment>> {
        if let Some(route) = self.known_enrollment_route() {
            return self.fetch_enrollments(route, student_email).await;
        }

        match self.fetch_enrollments(EnrollmentRoute::Primary, student_email).await {
            Ok(rows) => {
                self.remember_enrollment_route(EnrollmentRoute::Primary);
                Ok(rows)
            }
            Err(primary_err) => {
                debug!("Primary enrollments path failed: {}", primary_err);
                let rows = self.fetch_enrollments(EnrollmentRoute::Fallback, student_email).await?;
                self.remember_enrollment_route(EnrollmentRoute::Fallback);
                Ok(rows)
            }
        }
    }

    pub async fn enroll(&self, student_email: &str, course_id: i64) -> ApiResult<Option<Enrollment>> {
        let query = [
            ("studentEmail", student_email.to_string()),
            ("courseId", course_id.to_string()),
        ];
        let created = self.client.post_query("/enrollments", &query).await?;
        info!("Enrolled {} in course {}", student_email, course_id);
        Ok(created)
    }

    /// Not every backend supports this; callers surface the failure.
    pub async fn unenroll(&self, enrollment_id: i64) -> ApiResult<()> {
        self.client.delete_resource(&format!("/enrollments/{}", enrollment_id)).await?;
        info!("Removed enrollment {}", enrollment_id);
        Ok(())
    }

    // Results

    pub async fn list_results(&self) -> ApiResult<Vec<ResultRecord>> {
        self.client.fetch_json("/results", &[]).await
    }

    /// Some backends ship without `/results`. Any failure there degrades to
    /// no rows plus a notice, so analytics views still render.
    pub async fn results_or_warning(&self) -> (Vec<ResultRecord>, Option<&'static str>) {
        match self.list_results().await {
            Ok(rows) => (rows, None),
            Err(e) => {
                match e.status() {
                    Some(404) => warn!("Backend has no /results endpoint"),
                    _ => warn!("Results unavailable: {}", e),
                }
                (Vec::new(), Some(RESULTS_UNAVAILABLE))
            }
        }
    }

    pub async fn assign_grade(&self, enrollment_id: i64, grade: Grade) -> ApiResult<Option<ResultRecord>> {
        let query = [
            ("enrollmentId", enrollment_id.to_string()),
            ("grade", grade.to_string()),
        ];
        let saved = self.client.post_query("/results", &query).await?;
        info!("Graded enrollment {} with {}", enrollment_id, grade);
        Ok(saved)
    }

    /// Forgets the discovered enrollment path; called whenever the session changes.
    pub fn reset_capabilities(&self) {
        match self.enrollment_route.lock() {
            Ok(mut route) => *route = None,
            Err(_) => warn!("Capability cache lock poisoned"),
        }
    }

    pub fn known_enrollment_route(&self) -> Option<EnrollmentRoute> {
        self.enrollment_route.lock().ok().and_then(|route| *route)
    }

    fn remember_enrollment_route(&self, route: EnrollmentRoute) {
        if let Ok(mut known) = self.enrollment_route.lock() {
            if known.is_none() {
                debug!("Using {} for enrollments", route.path());
            }
            *known = Some(route);
        }
    }

    async fn fetch_enrollments(&self, route: EnrollmentRoute, student_email: &str) -> ApiResult<Vec<Enrollment>> {
        self.client
            .fetch_json(route.path(), &[("studentEmail", student_email.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::analytics::{summarize, ResultFilter, ResultsSummary};
    use crate::backend::error::ApiError;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct Hits {
        primary: Arc<AtomicUsize>,
        fallback: Arc<AtomicUsize>,
    }

    async fn serve(app: Router) -> CourseApi {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        CourseApi::new(&format!("http://{}/api/v1", addr))
    }

    fn enrollment_json(email: &str) -> Value {
        json!([{
            "id": 5,
            "studentEmail": email,
            "course": { "id": 1, "code": "CS101", "title": "Intro", "credit": 3, "lecturerName": "Dr. Lee" }
        }])
    }

    async fn fallback_only(State(hits): State<Hits>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        hits.fallback.fetch_add(1, Ordering::SeqCst);
        Json(enrollment_json(&q["studentEmail"]))
    }

    async fn primary_missing(State(hits): State<Hits>) -> StatusCode {
        hits.primary.fetch_add(1, Ordering::SeqCst);
        StatusCode::NOT_FOUND
    }

    #[tokio::test]
    async fn enrollment_fallback_is_discovered_once() {
        let hits = Hits::default();
        let app = Router::new()
            .route("/api/v1/enrollments", get(primary_missing))
            .route("/api/v1/me/enrollments", get(fallback_only))
            .with_state(hits.clone());
        let api = serve(app).await;

        let rows = api.list_enrollments("ann@uni.edu").await.unwrap();
        assert_eq!(rows[0].student_email, "ann@uni.edu");
        assert_eq!(api.known_enrollment_route(), Some(EnrollmentRoute::Fallback));

        api.list_enrollments("ann@uni.edu").await.unwrap();
        api.list_enrollments("bob@uni.edu").await.unwrap();
        assert_eq!(hits.primary.load(Ordering::SeqCst), 1);
        assert_eq!(hits.fallback.load(Ordering::SeqCst), 3);

        // a new session probes again
        api.reset_capabilities();
        api.list_enrollments("ann@uni.edu").await.unwrap();
        assert_eq!(hits.primary.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn primary_enrollment_path_is_preferred() {
        let app = Router::new().route(
            "/api/v1/enrollments",
            get(|Query(q): Query<HashMap<String, String>>| async move { Json(enrollment_json(&q["studentEmail"])) }),
        );
        let api = serve(app).await;
        let rows = api.list_enrollments("cy@uni.edu").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].course.as_ref().map(|c| c.credit), Some(Some(3)));
        assert_eq!(api.known_enrollment_route(), Some(EnrollmentRoute::Primary));
    }

    #[tokio::test]
    async fn both_enrollment_paths_failing_is_not_cached() {
        let api = serve(Router::new()).await;
        let err = api.list_enrollments("x@uni.edu").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(api.known_enrollment_route(), None);
    }

    #[tokio::test]
    async fn enroll_conflict_surfaces_server_text() {
        let app = Router::new().route(
            "/api/v1/enrollments",
            post(|| async { (StatusCode::CONFLICT, "Already enrolled") }),
        );
        let api = serve(app).await;
        let err = api.enroll("ann@uni.edu", 1).await.unwrap_err();
        assert_eq!(err.user_message("Failed to enroll"), "Already enrolled");
    }

    #[tokio::test]
    async fn assign_grade_sends_query_parameters() {
        let app = Router::new().route(
            "/api/v1/results",
            post(|Query(q): Query<HashMap<String, String>>| async move {
                (
                    StatusCode::CREATED,
                    Json(json!({
                        "id": 1,
                        "enrollment": { "id": q["enrollmentId"].parse::<i64>().unwrap() },
                        "grade": q["grade"],
                    })),
                )
            }),
        );
        let api = serve(app).await;
        let saved = api.assign_grade(12, Grade::B).await.unwrap().unwrap();
        assert_eq!(saved.grade.as_deref(), Some("B"));
        assert_eq!(saved.enrollment.map(|e| e.id), Some(12));
    }

    #[tokio::test]
    async fn missing_results_endpoint_gives_empty_analytics() {
        let api = serve(Router::new()).await;
        let (rows, notice) = api.results_or_warning().await;
        assert!(rows.is_empty());
        assert_eq!(notice, Some(RESULTS_UNAVAILABLE));

        let summary = summarize(&rows, &ResultFilter::default());
        assert_eq!(summary, ResultsSummary::default());
        assert_eq!(summary.pass_rate(), 0.0);
    }

    #[tokio::test]
    async fn malformed_results_give_empty_analytics() {
        let app = Router::new().route("/api/v1/results", get(|| async { "<html>oops</html>" }));
        let api = serve(app).await;
        let (rows, notice) = api.results_or_warning().await;
        assert!(rows.is_empty());
        assert_eq!(notice, Some(RESULTS_UNAVAILABLE));
        assert_eq!(summarize(&rows, &ResultFilter::default()), ResultsSummary::default());
    }

    #[tokio::test]
    async fn available_results_carry_no_notice() {
        let app = Router::new().route(
            "/api/v1/results",
            get(|| async {
                Json(json!([{
                    "id": 1,
                    "enrollment": { "id": 5, "studentEmail": "ann@uni.edu" },
                    "grade": "A"
                }]))
            }),
        );
        let api = serve(app).await;
        let (rows, notice) = api.results_or_warning().await;
        assert_eq!(notice, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(summarize(&rows, &ResultFilter::default()).pass, 1);
    }

    #[tokio::test]
    async fn unsupported_unenroll_is_an_error_not_a_panic() {
        let app = Router::new().route(
            "/api/v1/enrollments/{id}",
            delete(|| async { StatusCode::METHOD_NOT_ALLOWED }),
        );
        let api = serve(app).await;
        let err = api.unenroll(5).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 405, .. }));
        assert_eq!(err.user_message("Unenroll not supported"), "Unenroll not supported");
    }

    #[tokio::test]
    async fn course_crud_round() {
        let app = Router::new()
            .route(
                "/api/v1/courses",
                get(|| async { Json(json!([{ "id": 1, "code": "CS101", "title": "Intro", "credit": 3, "lecturerName": null }])) }),
            )
            .route(
                "/api/v1/admin/courses",
                post(|Json(body): Json<Value>| async move {
                    let mut created = body;
                    created["id"] = json!(2);
                    (StatusCode::CREATED, Json(created))
                }),
            )
            .route("/api/v1/admin/courses/{id}", delete(|| async { StatusCode::NO_CONTENT }));
        let api = serve(app).await;

        let courses = api.list_courses().await.unwrap();
        assert_eq!(courses[0].lecturer_name, "");

        let payload = CoursePayload {
            code: "CS102".into(),
            title: "Data Structures".into(),
            credit: 4,
            lecturer_name: "Dr. Kim".into(),
        };
        let created = api.create_course(&payload).await.unwrap().unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(created.lecturer_name, "Dr. Kim");

        api.delete_course(2).await.unwrap();
    }
}
