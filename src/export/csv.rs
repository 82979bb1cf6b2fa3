//! CSV export of the roster and fee structure

use std::io::Write;

use crate::error::FeeDeskResult;
use crate::storage::Storage;

/// Export the roster to CSV, one row per student in roster order
pub fn export_students_csv<W: Write>(storage: &Storage, writer: W) -> FeeDeskResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record([
        "ID",
        "Name",
        "Gender",
        "Class",
        "Section",
        "Date of Birth",
        "Guardian",
        "Relationship",
        "Guardian Mobile",
        "Address",
        "Mobile",
        "Email",
        "Fees Status",
        "Arrears",
        "Optional Fees",
    ])?;

    for student in storage.students.get_all()? {
        csv.write_record([
            student.id.to_string(),
            student.name.clone(),
            student.gender.to_string(),
            student.class.clone(),
            student.section.clone(),
            student.date_of_birth.to_string(),
            student.guardian.name.clone(),
            student.guardian.relationship.to_string(),
            student.guardian.mobile.clone(),
            student.address.clone(),
            student.mobile.clone(),
            student.email.clone(),
            student.fees_status.to_string(),
            student.arrears.format_plain(),
            student.optional_fees.join("; "),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Export the fee structure to CSV
pub fn export_fees_csv<W: Write>(storage: &Storage, writer: W) -> FeeDeskResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(["Name", "USD", "ZIG", "Frequency", "Required"])?;

    for fee in storage.fees.get_all()? {
        csv.write_record([
            fee.name.clone(),
            fee.amount_usd.format_plain(),
            fee.amount_zig.format_plain(),
            fee.frequency.to_string(),
            fee.required.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}
