//! `GET /healthcheck`

use crate::envelope::{ApiResponse, Empty};

pub async fn check() -> ApiResponse<Empty> { ApiResponse::ok(Empty::default(), "OK") }
