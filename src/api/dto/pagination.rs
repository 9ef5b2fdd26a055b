//! Pagination-related DTOs for API requests and responses.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::envelope::now_timestamp;
use super::user::UserResponse;
use crate::services::{ListUsersQuery, UserPage};

/// Query parameters of `GET /users`.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Zero-based page index
    #[serde(default)]
    #[validate(range(min = 0, message = "Page index must not be less than zero"))]
    #[param(minimum = 0, example = 0)]
    pub page: i64,

    /// Number of users per page
    #[serde(default = "default_size")]
    #[validate(range(min = 1, message = "Page size must not be less than one"))]
    #[param(minimum = 1, example = 20)]
    pub size: i64,

    /// Inclusive lower birthdate bound (YYYY-MM-DD); used only together with `to`
    #[param(value_type = Option<String>, format = Date, example = "2000-01-01")]
    pub from: Option<Date>,

    /// Exclusive upper birthdate bound (YYYY-MM-DD); used only together with `from`
    #[param(value_type = Option<String>, format = Date, example = "2001-01-01")]
    pub to: Option<Date>,
}

fn default_size() -> i64 {
    20
}

impl ListUsersParams {
    pub fn into_query(self) -> ListUsersQuery {
        ListUsersQuery::new(self.page, self.size).with_range(self.from, self.to)
    }
}

/// Paging metadata of a list response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    #[schema(example = 0)]
    pub page: i64,
    #[schema(example = 20)]
    pub size: i64,
    #[schema(example = 42)]
    pub total_elements: i64,
}

/// Neighbouring page links; absent directions are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PageLinksResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// Envelope of `GET /users`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PagedResponse<T> {
    pub status: u16,
    pub timestamp: String,
    pub pagination: PaginationMeta,
    pub links: PageLinksResponse,
    pub data: Vec<T>,
}

impl From<UserPage> for PagedResponse<UserResponse> {
    fn from(page: UserPage) -> Self {
        Self {
            status: 200,
            timestamp: now_timestamp(),
            pagination: PaginationMeta {
                page: page.page,
                size: page.size,
                total_elements: page.total_elements,
            },
            links: PageLinksResponse {
                next: page.links.next,
                prev: page.links.prev,
            },
            data: page.users.into_iter().map(UserResponse::from).collect(),
        }
    }
}
