use std::{fmt::Display, str::FromStr};

use cfs_common::Rupees;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------      FeeType       ----------------------------------------------------------
/// The closed set of university charges. Each fee type has a fixed total ceiling in the fee catalog; anything
/// arriving at the system boundary that does not parse into this enum is rejected before it reaches the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    Tuition,
    Bus,
    Hostel,
    Supply,
    Condonation,
    #[sqlx(rename = "idcard")]
    #[serde(rename = "idcard")]
    IdCard,
    Crt,
    Uniform,
    #[sqlx(rename = "other_registrations")]
    #[serde(rename = "other_registrations")]
    OtherRegistrations,
}

pub const ALL_FEE_TYPES: [FeeType; 9] = [
    FeeType::Tuition,
    FeeType::Bus,
    FeeType::Hostel,
    FeeType::Supply,
    FeeType::Condonation,
    FeeType::IdCard,
    FeeType::Crt,
    FeeType::Uniform,
    FeeType::OtherRegistrations,
];

impl Display for FeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FeeType::Tuition => "tuition",
            FeeType::Bus => "bus",
            FeeType::Hostel => "hostel",
            FeeType::Supply => "supply",
            FeeType::Condonation => "condonation",
            FeeType::IdCard => "idcard",
            FeeType::Crt => "crt",
            FeeType::Uniform => "uniform",
            FeeType::OtherRegistrations => "other_registrations",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid fee type: {0}")]
pub struct InvalidFeeType(pub String);

impl FromStr for FeeType {
    type Err = InvalidFeeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tuition" => Ok(Self::Tuition),
            "bus" => Ok(Self::Bus),
            "hostel" => Ok(Self::Hostel),
            "supply" => Ok(Self::Supply),
            "condonation" => Ok(Self::Condonation),
            "idcard" => Ok(Self::IdCard),
            "crt" => Ok(Self::Crt),
            "uniform" => Ok(Self::Uniform),
            "other_registrations" => Ok(Self::OtherRegistrations),
            s => Err(InvalidFeeType(s.to_string())),
        }
    }
}

//--------------------------------------    PaymentStatus    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// A gateway order exists and we are waiting for the signed payment callback.
    Pending,
    /// The callback signature checked out. Terminal.
    Completed,
    /// The callback signature did not check out. Terminal; kept for the audit trail.
    Failed,
    /// Administrative refund, applied outside of this engine. Never produced by the verification flow.
    Refunded,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Completed => write!(f, "Completed"),
            PaymentStatus::Failed => write!(f, "Failed"),
            PaymentStatus::Refunded => write!(f, "Refunded"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment status: {0}")]
pub struct StatusConversionError(String);

impl FromStr for PaymentStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Failed" => Ok(Self::Failed),
            "Refunded" => Ok(Self::Refunded),
            s => Err(StatusConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------       OrderId       ---------------------------------------------------------
/// The order identifier assigned by the payment gateway. Unique across all payment records, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------    PaymentRecord    ---------------------------------------------------------
/// The central entity of the engine. Created as `Pending` by the order issuer, finalized exactly once by the
/// verification engine, read afterwards by reporting. Never hard-deleted here.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub student_id: String,
    pub fee_type: FeeType,
    pub amount: Rupees,
    pub order_id: OrderId,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------  NewPaymentRecord   ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewPaymentRecord {
    /// The student this record belongs to. Immutable after creation.
    pub student_id: String,
    pub fee_type: FeeType,
    /// The amount requested for this specific order. May be a partial payment toward the fee-type ceiling.
    pub amount: Rupees,
    /// The order id returned by the gateway.
    pub order_id: OrderId,
}

impl NewPaymentRecord {
    pub fn new<S: Into<String>>(student_id: S, fee_type: FeeType, amount: Rupees, order_id: OrderId) -> Self {
        Self { student_id: student_id.into(), fee_type, amount, order_id }
    }
}

//-------------------------------------- VerificationOutcome ---------------------------------------------------------
/// The single permitted transition away from `Pending`, applied by the verification engine.
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    Completed { gateway_payment_id: String, gateway_signature: String },
    Failed,
}

impl VerificationOutcome {
    pub fn status(&self) -> PaymentStatus {
        match self {
            VerificationOutcome::Completed { .. } => PaymentStatus::Completed,
            VerificationOutcome::Failed => PaymentStatus::Failed,
        }
    }
}

//--------------------------------------        Role         ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "Student"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

//--------------------------------------        User         ---------------------------------------------------------
/// The slice of the user model the engine needs: identity for authorization claims, role for access control, and
/// a mobile number for the notification sink. Profile management lives elsewhere.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub reg_no: String,
    pub name: String,
    pub role: Role,
    pub mobile: Option<String>,
    pub created_at: DateTime<Utc>,
}
