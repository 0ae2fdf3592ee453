use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Cleaning,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Cleaning => "cleaning",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "cleaning" => Some(Self::Cleaning),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Single,
    Double,
    Suite,
    Family,
    Matrimonial,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Suite => "suite",
            Self::Family => "family",
            Self::Matrimonial => "matrimonial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "double" => Some(Self::Double),
            "suite" => Some(Self::Suite),
            "family" => Some(Self::Family),
            "matrimonial" => Some(Self::Matrimonial),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: String,
    pub number: String,
    pub room_type: String,
    pub nightly_price: f64,
    pub status: String,
    pub capacity: i64,
    pub description: Option<String>,
    pub private_bathroom: bool,
    pub balcony: bool,
    pub sea_view: bool,
    pub pets_allowed: bool,
    pub wifi: bool,
    pub air_conditioning: bool,
    pub television: bool,
    pub minibar: bool,
    pub safe_box: bool,
    pub laundry_service: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Room {
    pub fn status_enum(&self) -> RoomStatus {
        RoomStatus::parse(&self.status).unwrap_or(RoomStatus::Maintenance)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub number: String,
    pub room_type: String,
    pub nightly_price: f64,
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub private_bathroom: bool,
    #[serde(default)]
    pub balcony: bool,
    #[serde(default)]
    pub sea_view: bool,
    #[serde(default)]
    pub pets_allowed: bool,
    #[serde(default = "default_true")]
    pub wifi: bool,
    #[serde(default = "default_true")]
    pub air_conditioning: bool,
    #[serde(default = "default_true")]
    pub television: bool,
    #[serde(default)]
    pub minibar: bool,
    #[serde(default)]
    pub safe_box: bool,
    #[serde(default = "default_true")]
    pub laundry_service: bool,
    pub notes: Option<String>,
}

fn default_capacity() -> i64 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRoomRequest {
    pub room_type: Option<String>,
    pub nightly_price: Option<f64>,
    pub capacity: Option<i64>,
    pub description: Option<String>,
    pub private_bathroom: Option<bool>,
    pub balcony: Option<bool>,
    pub sea_view: Option<bool>,
    pub pets_allowed: Option<bool>,
    pub wifi: Option<bool>,
    pub air_conditioning: Option<bool>,
    pub television: Option<bool>,
    pub minibar: Option<bool>,
    pub safe_box: Option<bool>,
    pub laundry_service: Option<bool>,
    pub notes: Option<String>,
}

/// Administrative status change (cleaning -> available, -> maintenance).
/// Check-in and check-out drive the other transitions.
#[derive(Debug, Deserialize)]
pub struct UpdateRoomStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Guests & stays
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Guest {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StayStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl StayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "checked_in" => Some(Self::CheckedIn),
            "checked_out" => Some(Self::CheckedOut),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for StayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One occupancy record for a room. Guest and pricing fields are snapshots
/// taken at creation so the history survives later room or rate edits.
/// `departure_at` is NULL while the stay is open.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stay {
    pub id: String,
    pub guest_id: Option<String>,
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub guest_document: Option<String>,
    pub room_number: String,
    pub room_type: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub nightly_price: f64,
    pub nights: i64,
    pub total: f64,
    pub status: String,
    pub departure_at: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Stay {
    pub fn status_enum(&self) -> StayStatus {
        StayStatus::parse(&self.status).unwrap_or(StayStatus::Pending)
    }
}

#[derive(Debug, Deserialize)]
pub struct GuestInfo {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub guest: GuestInfo,
    /// Planned departure date; defaults to tomorrow.
    pub check_out_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// A reservation record created ahead of arrival.
#[derive(Debug, Deserialize)]
pub struct CreateStayRequest {
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub guest_document: Option<String>,
    pub room_number: String,
    pub room_type: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub nightly_price: f64,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStayRequest {
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub guest_document: Option<String>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub nightly_price: Option<f64>,
    pub nights: Option<i64>,
    pub total: Option<f64>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Products & rates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    /// NULL means a service without stock tracking
    pub stock: Option<i64>,
    pub active: bool,
    pub barcode: Option<String>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub stock: Option<i64>,
    #[serde(default = "default_true")]
    pub active: bool,
    pub barcode: Option<String>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub active: Option<bool>,
    pub barcode: Option<String>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rate {
    pub id: String,
    pub name: String,
    pub room_type: String,
    pub price: f64,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    /// Comma-separated ISO weekday numbers ("1,2,3,4,5"); NULL = every day
    pub weekdays: Option<String>,
    pub active: bool,
    pub priority: i64,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRateRequest {
    pub name: String,
    pub room_type: String,
    pub price: f64,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub weekdays: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_priority")]
    pub priority: i64,
    pub description: Option<String>,
}

fn default_priority() -> i64 {
    1
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRateRequest {
    pub name: Option<String>,
    pub room_type: Option<String>,
    pub price: Option<f64>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub weekdays: Option<String>,
    pub active: Option<bool>,
    pub priority: Option<i64>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    Closed,
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A room-attached tab of consumed products.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: String,
    pub stay_id: Option<String>,
    pub room_number: String,
    pub status: String,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Order {
    pub fn status_enum(&self) -> OrderStatus {
        OrderStatus::parse(&self.status).unwrap_or(OrderStatus::Open)
    }
}

/// Line items snapshot product name and price at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub line_subtotal: f64,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub stay_id: Option<String>,
    pub room_number: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddOrderLineRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    pub notes: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct CloseOrderRequest {
    pub payment_method: Option<String>,
}

// ---------------------------------------------------------------------------
// Users & auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub position: Option<String>,
    pub department: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// User shape returned by the API; never exposes the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub position: Option<String>,
    pub department: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            position: user.position,
            department: user.department,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
    pub position: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
    pub position: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// `username` is accepted as an alias for OAuth2-style form logins
    #[serde(alias = "username")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Read-only aggregate numbers for the back-office dashboard.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardReport {
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub cleaning_rooms: i64,
    pub maintenance_rooms: i64,
    pub available_rooms: i64,
    pub occupancy_percent: f64,
    pub open_stays: i64,
    pub active_products: i64,
    pub revenue_today: f64,
    pub generated_at: String,
}
