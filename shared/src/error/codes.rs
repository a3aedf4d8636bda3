//! Unified error codes for the suds platform
//!
//! This module defines all error codes used across the cloud service and the
//! dashboard frontend. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission / data-scope errors
//! - 3xxx: Merchant and store errors
//! - 4xxx: Order errors
//! - 5xxx: Balance and payment errors
//! - 6xxx: Device errors
//! - 7xxx: Device telemetry errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,
    /// Password too short
    PasswordTooShort = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Request targets data outside the caller's scope
    DataScopeDenied = 2003,
    /// Staff may only mutate their own profile
    SelfServiceOnly = 2004,

    // ==================== 3xxx: Merchant / Store ====================
    /// Merchant not found
    MerchantNotFound = 3001,
    /// Merchant is disabled
    MerchantDisabled = 3002,
    /// Store not found
    StoreNotFound = 3101,
    /// Store is disabled
    StoreDisabled = 3102,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order state transition not allowed
    InvalidTransition = 4002,
    /// Order number already exists
    DuplicateOrderNo = 4003,
    /// Order belongs to another user
    NotOrderOwner = 4004,

    // ==================== 5xxx: Balance / Payment ====================
    /// Balance is insufficient for this order
    InsufficientBalance = 5001,
    /// Invalid payment method
    PaymentInvalidMethod = 5002,

    // ==================== 6xxx: Device ====================
    /// Device not found
    DeviceNotFound = 6001,
    /// Device is not available for orders
    DeviceUnavailable = 6002,
    /// Device iccid already exists
    DeviceIccidExists = 6003,

    // ==================== 7xxx: Telemetry ====================
    /// Unknown device event type
    UnknownEventType = 7001,
    /// Event payload failed validation
    InvalidEventPayload = 7002,
    /// Callback signature verification failed
    InvalidSignature = 7003,
    /// Callback timestamp outside the accepted window
    StaleTimestamp = 7004,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already exists
    UsernameExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::DataScopeDenied => "Requested data is outside your scope",
            ErrorCode::SelfServiceOnly => "Staff may only modify their own profile",

            // Merchant / Store
            ErrorCode::MerchantNotFound => "Merchant not found",
            ErrorCode::MerchantDisabled => "Merchant is disabled",
            ErrorCode::StoreNotFound => "Store not found",
            ErrorCode::StoreDisabled => "Store is disabled",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidTransition => "Order state transition not allowed",
            ErrorCode::DuplicateOrderNo => "Order number already exists",
            ErrorCode::NotOrderOwner => "Order belongs to another user",

            // Balance / Payment
            ErrorCode::InsufficientBalance => "Insufficient balance",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            // Device
            ErrorCode::DeviceNotFound => "Device not found",
            ErrorCode::DeviceUnavailable => "Device is not available",
            ErrorCode::DeviceIccidExists => "Device iccid already exists",

            // Telemetry
            ErrorCode::UnknownEventType => "Unknown device event type",
            ErrorCode::InvalidEventPayload => "Invalid event payload",
            ErrorCode::InvalidSignature => "Callback signature verification failed",
            ErrorCode::StaleTimestamp => "Callback timestamp is too old",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),
            1006 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::DataScopeDenied),
            2004 => Ok(ErrorCode::SelfServiceOnly),

            // Merchant / Store
            3001 => Ok(ErrorCode::MerchantNotFound),
            3002 => Ok(ErrorCode::MerchantDisabled),
            3101 => Ok(ErrorCode::StoreNotFound),
            3102 => Ok(ErrorCode::StoreDisabled),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::DuplicateOrderNo),
            4004 => Ok(ErrorCode::NotOrderOwner),

            // Balance / Payment
            5001 => Ok(ErrorCode::InsufficientBalance),
            5002 => Ok(ErrorCode::PaymentInvalidMethod),

            // Device
            6001 => Ok(ErrorCode::DeviceNotFound),
            6002 => Ok(ErrorCode::DeviceUnavailable),
            6003 => Ok(ErrorCode::DeviceIccidExists),

            // Telemetry
            7001 => Ok(ErrorCode::UnknownEventType),
            7002 => Ok(ErrorCode::InvalidEventPayload),
            7003 => Ok(ErrorCode::InvalidSignature),
            7004 => Ok(ErrorCode::StaleTimestamp),

            // User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UsernameExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
