//! Course endpoints

use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, RequestDescriptor, query_pairs};
use crate::error::{Result, require};
use crate::models::Course;
use crate::pagination::{Page, decode, unwrap_data};

/// Filters for `GET /courses`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    /// ISO country code
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

impl ApiClient {
    /// List courses available to the partner.
    pub async fn list_courses(&self, params: &ListParams) -> Result<Page<Course>> {
        let request = RequestDescriptor::get("/courses").with_query(query_pairs(params)?);
        Page::from_response(self.execute(request).await?)
    }

    pub async fn get_course(&self, course_id: &str) -> Result<Course> {
        let course_id = require(course_id, "course id")?;
        decode(
            self.execute(RequestDescriptor::get(format!("/courses/{course_id}")))
                .await?,
        )
    }

    /// Facilities for a course, passed through as returned.
    pub async fn get_course_facilities(&self, course_id: &str) -> Result<Value> {
        let course_id = require(course_id, "course id")?;
        let body = self
            .execute(RequestDescriptor::get(format!(
                "/courses/{course_id}/facilities"
            )))
            .await?;
        Ok(unwrap_data(body))
    }
}
