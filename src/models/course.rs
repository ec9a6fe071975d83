use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub credit_hours: i32,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub max_students: i32,
    #[serde(default)]
    pub current_student_count: i32,
    #[serde(default)]
    pub teacher: Option<CourseTeacher>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseTeacher {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
}
