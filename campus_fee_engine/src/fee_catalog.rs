//! The fee catalog: a static mapping from fee type to the total payable ceiling.
//!
//! The ceiling is the maximum *cumulative* amount a student can pay for one fee type. Partial payments are
//! allowed; the ledger guard in the payment flow compares the completed total against this table at order
//! creation. The table is the server-side source of truth — client-supplied fee amounts are never trusted.

use cfs_common::Rupees;

use crate::db_types::FeeType;

/// Total payable amount for the given fee type, in whole rupees.
pub fn ceiling_for(fee_type: FeeType) -> Rupees {
    let amount = match fee_type {
        FeeType::Tuition => 50_000,
        FeeType::Bus => 20_000,
        FeeType::Hostel => 50_000,
        FeeType::Supply => 500,
        FeeType::Condonation => 300,
        FeeType::IdCard => 200,
        FeeType::Crt => 3_000,
        FeeType::Uniform => 2_500,
        FeeType::OtherRegistrations => 1_000,
    };
    Rupees::from(amount)
}
