use serde::Deserialize;
use utoipa::IntoParams;

use crate::common::error::{AppError, AppResult};

/// Ride history is always served in pages of this size.
pub const PAGE_SIZE: i64 = 4;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RidePageQuery {
    /// Field to sort rides by (default: id)
    #[param(example = "id")]
    pub sort_by: Option<String>,
    /// Page number, starting from 0
    #[param(example = 0)]
    pub page_number: Option<i64>,
}

/// Sort keys a caller may ask for. Anything else never reaches a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideSortField {
    Id,
    Status,
    Fare,
    AcceptedAt,
    StartedAt,
    EndedAt,
}

impl RideSortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(Self::Id),
            "status" => Some(Self::Status),
            "fare" => Some(Self::Fare),
            "acceptedAt" | "accepted_at" => Some(Self::AcceptedAt),
            "startedAt" | "started_at" => Some(Self::StartedAt),
            "endedAt" | "ended_at" => Some(Self::EndedAt),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Status => "status",
            Self::Fare => "fare",
            Self::AcceptedAt => "accepted_at",
            Self::StartedAt => "started_at",
            Self::EndedAt => "ended_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: i64,
    pub sort: RideSortField,
}

impl PageRequest {
    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        self.page_number * PAGE_SIZE
    }
}

impl TryFrom<RidePageQuery> for PageRequest {
    type Error = AppError;

    fn try_from(query: RidePageQuery) -> AppResult<Self> {
        let sort_by = query.sort_by.as_deref().unwrap_or("id");
        let sort = RideSortField::parse(sort_by)
            .ok_or_else(|| AppError::validation(format!("Unsupported sort field: {}", sort_by)))?;

        let page_number = query.page_number.unwrap_or(0);
        if page_number < 0 || page_number.checked_mul(PAGE_SIZE).is_none() {
            return Err(AppError::validation("Page number must be a non-negative integer"));
        }

        Ok(Self { page_number, sort })
    }
}
