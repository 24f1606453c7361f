use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct Driver {
    pub user_id: i64,
    pub license_number: String,
    pub vehicle_number: String,
    pub vehicle_type: Option<String>,
    /// Cleared while the driver holds an accepted or started ride.
    pub available: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewDriver {
    pub license_number: String,
    pub vehicle_number: String,
    pub vehicle_type: Option<String>,
}
